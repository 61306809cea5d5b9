use sqlx::SqlitePool;
use ulid::Ulid;

use super::now_ts;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactQueryRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: i64,
    pub is_deleted: bool,
    pub deleted_at: Option<i64>,
}

pub async fn submit_query(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> sqlx::Result<ContactQueryRow> {
    let id = Ulid::new().to_string();
    let created_at = now_ts();

    sqlx::query(
        "INSERT INTO contact_queries (id, name, email, subject, message, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(subject)
    .bind(message)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(ContactQueryRow {
        id,
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
        created_at,
        is_deleted: false,
        deleted_at: None,
    })
}

/// Inbox listing: active queries only, newest first.
pub async fn list_queries(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<ContactQueryRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    sqlx::query_as(
        "SELECT * FROM contact_queries
         WHERE is_deleted = 0
           AND (lower(name) LIKE ?1 OR lower(email) LIKE ?1 OR lower(subject) LIKE ?1)
         ORDER BY created_at DESC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_query(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<ContactQueryRow>> {
    sqlx::query_as("SELECT * FROM contact_queries WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Idempotent archival; the first stamp wins.
pub async fn soft_delete_query(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE contact_queries SET is_deleted = 1, deleted_at = ?
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(now_ts())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_queries(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM contact_queries WHERE is_deleted = 0")
        .fetch_one(pool)
        .await
}
