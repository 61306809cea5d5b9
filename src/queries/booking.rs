//! Booking persistence and the lifecycle operations built on top of it.
//!
//! Every mutating operation takes the acting user id explicitly; ownership
//! and transition rules come from `chefbook_booking`. The default scope of
//! each query excludes archived (`is_deleted`) rows — admin listings opt in.

use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;

use chefbook_booking::{BookingStatus, Slot};

use crate::error::AppError;

use super::chef::ChefRow;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: String,
    pub customer_id: String,
    pub chef_id: String,
    pub date: String,
    pub time: String,
    pub person: i64,
    pub total_price: f64,
    pub status: String,
    pub is_deleted: bool,
    pub deleted_at: Option<i64>,
    pub deleted_by: Option<String>,
}

impl BookingRow {
    pub fn status(&self) -> BookingStatus {
        self.status.parse().unwrap_or(BookingStatus::Pending)
    }

    pub fn slot(&self) -> Option<Slot> {
        Slot::parse(&self.date, &self.time).ok()
    }

    pub fn is_past(&self, now: OffsetDateTime) -> bool {
        self.slot().map(|slot| slot.is_past(now)).unwrap_or(false)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct BookingWithOwnerRow {
    #[sqlx(flatten)]
    booking: BookingRow,
    chef_owner_id: String,
}

/// Customer-facing dashboard row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerBookingRow {
    pub id: String,
    pub chef_id: String,
    pub chef_name: String,
    pub date: String,
    pub time: String,
    pub person: i64,
    pub total_price: f64,
    pub status: String,
    pub review_id: Option<String>,
}

/// Chef-facing dashboard row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefBookingRow {
    pub id: String,
    pub customer_id: String,
    pub customer_username: String,
    pub date: String,
    pub time: String,
    pub person: i64,
    pub total_price: f64,
    pub status: String,
}

/// Back-office row; includes archival audit fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminBookingRow {
    pub id: String,
    pub customer_username: String,
    pub chef_name: String,
    pub date: String,
    pub time: String,
    pub person: i64,
    pub total_price: f64,
    pub status: String,
    pub is_deleted: bool,
    pub deleted_at: Option<i64>,
    pub deleted_by: Option<String>,
}

/// Booking joined with its chef's identity, for review authorization.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingContextRow {
    pub id: String,
    pub customer_id: String,
    pub chef_id: String,
    pub chef_name: String,
    pub chef_owner_id: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

/// Create a booking request for `customer_id` with `chef`.
///
/// Validates the request, prices it at `price_per_person * person`, and
/// stores it Pending. The total is never recomputed afterwards.
pub async fn create_booking(
    pool: &SqlitePool,
    customer_id: &str,
    chef: &ChefRow,
    slot: Slot,
    person: u32,
    now: OffsetDateTime,
) -> Result<BookingRow, AppError> {
    chefbook_booking::validate_request(customer_id, &chef.user_id, slot, person, now)?;

    let id = Ulid::new().to_string();
    let total_price = chefbook_booking::total_price(chef.price_per_person, person);

    sqlx::query(
        "INSERT INTO bookings (id, customer_id, chef_id, date, time, person, total_price, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(customer_id)
    .bind(&chef.id)
    .bind(slot.date_string())
    .bind(slot.time_string())
    .bind(i64::from(person))
    .bind(total_price)
    .bind(BookingStatus::Pending.to_string())
    .execute(pool)
    .await?;

    tracing::info!(booking_id = %id, chef_id = %chef.id, "Booking request created");

    Ok(BookingRow {
        id,
        customer_id: customer_id.to_string(),
        chef_id: chef.id.clone(),
        date: slot.date_string(),
        time: slot.time_string(),
        person: i64::from(person),
        total_price,
        status: BookingStatus::Pending.to_string(),
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    })
}

pub async fn get_booking(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<BookingRow>> {
    sqlx::query_as("SELECT * FROM bookings WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Any state, archived included.
pub async fn get_booking_any(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<BookingRow>> {
    sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_booking_context(
    pool: &SqlitePool,
    id: &str,
) -> sqlx::Result<Option<BookingContextRow>> {
    sqlx::query_as(
        "SELECT b.id, b.customer_id, b.chef_id, c.name AS chef_name,
                c.user_id AS chef_owner_id, b.date, b.time, b.status
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         WHERE b.id = ? AND b.is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Accept or reject a pending booking, as the owning chef.
pub async fn decide_booking(
    pool: &SqlitePool,
    booking_id: &str,
    new_status: BookingStatus,
    actor_id: &str,
) -> Result<BookingRow, AppError> {
    let row: Option<BookingWithOwnerRow> = sqlx::query_as(
        "SELECT b.*, c.user_id AS chef_owner_id
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         WHERE b.id = ? AND b.is_deleted = 0",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(AppError::NotFound);
    };

    chefbook_booking::authorize_decision(actor_id, &row.chef_owner_id)?;
    row.booking.status().transition(new_status)?;

    // Guard on the stored status so a concurrent decision loses cleanly.
    let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
        .bind(new_status.to_string())
        .bind(booking_id)
        .bind(BookingStatus::Pending.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::InvalidTransition(
            "This booking has already been decided.".to_string(),
        ));
    }

    tracing::info!(booking_id = %booking_id, status = %new_status, "Booking decided");

    Ok(BookingRow {
        status: new_status.to_string(),
        ..row.booking
    })
}

/// Administrative status change; the same Pending-only guard as
/// `decide_booking` but without the ownership rule.
pub async fn set_status_admin(
    pool: &SqlitePool,
    booking_id: &str,
    new_status: BookingStatus,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
        .bind(new_status.to_string())
        .bind(booking_id)
        .bind(BookingStatus::Pending.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Archive a booking. Idempotent: an already-archived row keeps its original
/// `deleted_at`/`deleted_by` stamp and the call reports `false`.
pub async fn soft_delete_booking(
    pool: &SqlitePool,
    booking_id: &str,
    deleted_by: Option<&str>,
    now: OffsetDateTime,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE bookings SET is_deleted = 1, deleted_at = ?, deleted_by = ?
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(now.unix_timestamp())
    .bind(deleted_by)
    .bind(booking_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Self-service removal: the customer archives their own past booking.
pub async fn remove_own_booking(
    pool: &SqlitePool,
    booking_id: &str,
    actor_id: &str,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    let Some(booking) = get_booking(pool, booking_id).await? else {
        return Err(AppError::NotFound);
    };

    chefbook_booking::authorize_self_removal(actor_id, &booking.customer_id, booking.is_past(now))?;

    soft_delete_booking(pool, booking_id, Some(actor_id), now).await?;
    Ok(())
}

/// Archive all of the customer's past bookings, reporting how many changed.
pub async fn clear_past_bookings(
    pool: &SqlitePool,
    customer_id: &str,
    now: OffsetDateTime,
) -> sqlx::Result<u64> {
    let cutoff = Slot::from_datetime(now);

    let result = sqlx::query(
        "UPDATE bookings SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2
         WHERE customer_id = ?3 AND is_deleted = 0
           AND (date < ?4 OR (date = ?4 AND time < ?5))",
    )
    .bind(now.unix_timestamp())
    .bind(customer_id)
    .bind(customer_id)
    .bind(cutoff.date_string())
    .bind(cutoff.time_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Permanent removal, allowed only for rows that are already archived.
pub async fn hard_delete_booking(pool: &SqlitePool, booking_id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = ? AND is_deleted = 1")
        .bind(booking_id)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        tracing::info!(booking_id = %booking_id, "Booking permanently deleted");
        return Ok(());
    }

    match get_booking_any(pool, booking_id).await? {
        Some(_) => Err(AppError::Validation(
            "Only archived bookings can be permanently deleted.".to_string(),
        )),
        None => Err(AppError::NotFound),
    }
}

pub async fn customer_bookings(
    pool: &SqlitePool,
    customer_id: &str,
    now: OffsetDateTime,
    past: bool,
) -> sqlx::Result<Vec<CustomerBookingRow>> {
    let cutoff = Slot::from_datetime(now);

    let sql = if past {
        "SELECT b.id, b.chef_id, c.name AS chef_name, b.date, b.time, b.person,
                b.total_price, b.status, r.id AS review_id
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         LEFT JOIN reviews r ON r.booking_id = b.id
         WHERE b.customer_id = ?1 AND b.is_deleted = 0
           AND (b.date < ?2 OR (b.date = ?2 AND b.time < ?3))
         ORDER BY b.date DESC, b.time DESC"
    } else {
        "SELECT b.id, b.chef_id, c.name AS chef_name, b.date, b.time, b.person,
                b.total_price, b.status, r.id AS review_id
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         LEFT JOIN reviews r ON r.booking_id = b.id
         WHERE b.customer_id = ?1 AND b.is_deleted = 0
           AND NOT (b.date < ?2 OR (b.date = ?2 AND b.time < ?3))
         ORDER BY b.date DESC, b.time DESC"
    };

    sqlx::query_as(sql)
        .bind(customer_id)
        .bind(cutoff.date_string())
        .bind(cutoff.time_string())
        .fetch_all(pool)
        .await
}

pub async fn chef_bookings(
    pool: &SqlitePool,
    chef_user_id: &str,
    now: OffsetDateTime,
    past: bool,
) -> sqlx::Result<Vec<ChefBookingRow>> {
    let cutoff = Slot::from_datetime(now);

    let sql = if past {
        "SELECT b.id, b.customer_id, u.username AS customer_username, b.date, b.time,
                b.person, b.total_price, b.status
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         JOIN users u ON u.id = b.customer_id
         WHERE c.user_id = ?1 AND b.is_deleted = 0
           AND (b.date < ?2 OR (b.date = ?2 AND b.time < ?3))
         ORDER BY b.date DESC, b.time DESC"
    } else {
        "SELECT b.id, b.customer_id, u.username AS customer_username, b.date, b.time,
                b.person, b.total_price, b.status
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         JOIN users u ON u.id = b.customer_id
         WHERE c.user_id = ?1 AND b.is_deleted = 0
           AND NOT (b.date < ?2 OR (b.date = ?2 AND b.time < ?3))
         ORDER BY b.date DESC, b.time DESC"
    };

    sqlx::query_as(sql)
        .bind(chef_user_id)
        .bind(cutoff.date_string())
        .bind(cutoff.time_string())
        .fetch_all(pool)
        .await
}

/// Upcoming requests still awaiting the chef's decision.
pub async fn pending_count_for_chef(
    pool: &SqlitePool,
    chef_user_id: &str,
    now: OffsetDateTime,
) -> sqlx::Result<i64> {
    let cutoff = Slot::from_datetime(now);

    sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM bookings b
         JOIN chefs c ON c.id = b.chef_id
         WHERE c.user_id = ?1 AND b.is_deleted = 0 AND b.status = 'Pending'
           AND NOT (b.date < ?2 OR (b.date = ?2 AND b.time < ?3))",
    )
    .bind(chef_user_id)
    .bind(cutoff.date_string())
    .bind(cutoff.time_string())
    .fetch_one(pool)
    .await
}

/// Back-office listing. Searches customer username and chef name; archived
/// rows are included only when requested.
pub async fn list_bookings_admin(
    pool: &SqlitePool,
    q: &str,
    include_archived: bool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<AdminBookingRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    let sql = if include_archived {
        "SELECT b.id, u.username AS customer_username, c.name AS chef_name, b.date, b.time,
                b.person, b.total_price, b.status, b.is_deleted, b.deleted_at, b.deleted_by
         FROM bookings b
         JOIN users u ON u.id = b.customer_id
         JOIN chefs c ON c.id = b.chef_id
         WHERE lower(u.username) LIKE ?1 OR lower(c.name) LIKE ?1
         ORDER BY b.date DESC, b.time DESC
         LIMIT ?2 OFFSET ?3"
    } else {
        "SELECT b.id, u.username AS customer_username, c.name AS chef_name, b.date, b.time,
                b.person, b.total_price, b.status, b.is_deleted, b.deleted_at, b.deleted_by
         FROM bookings b
         JOIN users u ON u.id = b.customer_id
         JOIN chefs c ON c.id = b.chef_id
         WHERE b.is_deleted = 0 AND (lower(u.username) LIKE ?1 OR lower(c.name) LIKE ?1)
         ORDER BY b.date DESC, b.time DESC
         LIMIT ?2 OFFSET ?3"
    };

    sqlx::query_as(sql)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn get_booking_admin(
    pool: &SqlitePool,
    id: &str,
) -> sqlx::Result<Option<AdminBookingRow>> {
    sqlx::query_as(
        "SELECT b.id, u.username AS customer_username, c.name AS chef_name, b.date, b.time,
                b.person, b.total_price, b.status, b.is_deleted, b.deleted_at, b.deleted_by
         FROM bookings b
         JOIN users u ON u.id = b.customer_id
         JOIN chefs c ON c.id = b.chef_id
         WHERE b.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Active bookings only, for the dashboard counters.
pub async fn count_bookings(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE is_deleted = 0")
        .fetch_one(pool)
        .await
}
