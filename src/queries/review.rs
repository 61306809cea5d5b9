use sqlx::SqlitePool;
use ulid::Ulid;

use super::now_ts;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub booking_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefResponseRow {
    pub id: String,
    pub review_id: String,
    pub response: String,
    pub responded_at: i64,
}

pub async fn get_review(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<ReviewRow>> {
    sqlx::query_as("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_review_by_booking(
    pool: &SqlitePool,
    booking_id: &str,
) -> sqlx::Result<Option<ReviewRow>> {
    sqlx::query_as("SELECT * FROM reviews WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_optional(pool)
        .await
}

/// At most one review per booking; the UNIQUE constraint backs this up under
/// concurrent submissions.
pub async fn create_review(
    pool: &SqlitePool,
    booking_id: &str,
    rating: u8,
    comment: &str,
) -> sqlx::Result<ReviewRow> {
    let id = Ulid::new().to_string();
    let created_at = now_ts();

    sqlx::query("INSERT INTO reviews (id, booking_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(booking_id)
        .bind(i64::from(rating))
        .bind(comment)
        .bind(created_at)
        .execute(pool)
        .await?;

    Ok(ReviewRow {
        id,
        booking_id: booking_id.to_string(),
        rating: i64::from(rating),
        comment: comment.to_string(),
        created_at,
    })
}

pub async fn get_response_by_review(
    pool: &SqlitePool,
    review_id: &str,
) -> sqlx::Result<Option<ChefResponseRow>> {
    sqlx::query_as("SELECT * FROM chef_responses WHERE review_id = ?")
        .bind(review_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_response(
    pool: &SqlitePool,
    review_id: &str,
    response: &str,
) -> sqlx::Result<ChefResponseRow> {
    let id = Ulid::new().to_string();
    let responded_at = now_ts();

    sqlx::query("INSERT INTO chef_responses (id, review_id, response, responded_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(review_id)
        .bind(response)
        .bind(responded_at)
        .execute(pool)
        .await?;

    Ok(ChefResponseRow {
        id,
        review_id: review_id.to_string(),
        response: response.to_string(),
        responded_at,
    })
}
