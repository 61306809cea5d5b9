//! Back-office booking management: listing with archived visibility, status
//! changes, archival without the past-only rule, and permanent removal of
//! archived rows.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use time::OffsetDateTime;

use chefbook_booking::BookingStatus;

use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries::booking;
use crate::routes::{render_template, AppState, PageContext};

const PER_PAGE: i64 = 15;

#[derive(askama::Template)]
#[template(path = "pages/admin/booking_list.html")]
struct AdminBookingListTemplate {
    ctx: PageContext,
    bookings: Vec<booking::AdminBookingRow>,
    q: String,
    page: i64,
    has_more: bool,
    archived: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/booking_view.html")]
struct AdminBookingViewTemplate {
    ctx: PageContext,
    booking: booking::AdminBookingRow,
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_page")]
    page: i64,
    /// Include archived rows in the listing.
    #[serde(default)]
    archived: bool,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    status: String,
}

/// GET /myadmin/bookings
pub async fn get_booking_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.max(1);
    let bookings = booking::list_bookings_admin(
        &state.pool,
        params.q.trim(),
        params.archived,
        PER_PAGE,
        (page - 1) * PER_PAGE,
    )
    .await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminBookingListTemplate {
            ctx: PageContext::new(Some(user), notices),
            has_more: bookings.len() as i64 == PER_PAGE,
            bookings,
            q: params.q,
            page,
            archived: params.archived,
        }),
    ))
}

/// GET /myadmin/bookings/view/{booking_id}
pub async fn get_booking_view(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(row) = booking::get_booking_admin(&state.pool, &booking_id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminBookingViewTemplate {
            ctx: PageContext::new(Some(user), notices),
            booking: row,
        }),
    ))
}

/// POST /myadmin/bookings/update-status/{booking_id}
///
/// Same state machine as the chef-facing endpoint: Pending only, one way.
pub async fn post_booking_update_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(new_status) = form.status.parse::<BookingStatus>() else {
        let jar = flash::error(jar, "Invalid booking status.");
        return Ok((jar, Redirect::to("/myadmin/bookings")));
    };

    let Some(row) = booking::get_booking(&state.pool, &booking_id).await? else {
        return Err(AppError::NotFound);
    };

    let jar = match row.status().transition(new_status) {
        Ok(_) => {
            booking::set_status_admin(&state.pool, &booking_id, new_status).await?;
            flash::success(jar, &format!("Booking marked as {new_status}."))
        }
        Err(e) => flash::error(jar, &e.to_string()),
    };

    Ok((jar, Redirect::to("/myadmin/bookings")))
}

/// POST /myadmin/bookings/delete/{booking_id} - Archive (no past-only rule).
pub async fn post_booking_delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if booking::get_booking_any(&state.pool, &booking_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let archived =
        booking::soft_delete_booking(&state.pool, &booking_id, Some(&user.id), OffsetDateTime::now_utc())
            .await?;

    let jar = if archived {
        flash::success(jar, "Booking removed.")
    } else {
        flash::info(jar, "Booking was already archived.")
    };
    Ok((jar, Redirect::to("/myadmin/bookings")))
}

/// POST /myadmin/bookings/hard-delete/{booking_id}
///
/// Permanent, and only for rows that were archived first.
pub async fn post_booking_hard_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match booking::hard_delete_booking(&state.pool, &booking_id).await {
        Ok(()) => {
            let jar = flash::success(jar, "Booking permanently deleted.");
            Ok((jar, Redirect::to("/myadmin/bookings?archived=true")))
        }
        Err(AppError::Validation(message)) => {
            let jar = flash::error(jar, &message);
            Ok((jar, Redirect::to("/myadmin/bookings")))
        }
        Err(other) => Err(other),
    }
}
