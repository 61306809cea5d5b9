use sqlx::SqlitePool;
use ulid::Ulid;

use super::now_ts;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: i64,
}

/// Admin listing row: identity joined with profile contact fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserListRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub name: String,
    pub location: String,
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> sqlx::Result<UserRow> {
    let id = Ulid::new().to_string();
    let created_at = now_ts();

    sqlx::query(
        "INSERT INTO users (id, username, email, hashed_password, is_superuser, is_active, created_at)
         VALUES (?, ?, ?, ?, 0, 1, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(UserRow {
        id,
        username: username.to_string(),
        email: email.to_string(),
        hashed_password: hashed_password.to_string(),
        is_superuser: false,
        is_active: true,
        created_at,
    })
}

pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn count_users(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// Case-insensitive substring search over username and profile location.
/// An empty query lists everyone.
pub async fn list_users(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<UserListRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    sqlx::query_as(
        "SELECT u.id, u.username, u.email, u.is_superuser, u.is_active,
                COALESCE(p.name, '') AS name, COALESCE(p.location, '') AS location
         FROM users u
         LEFT JOIN profiles p ON p.user_id = u.id
         WHERE lower(u.username) LIKE ?1
            OR lower(COALESCE(p.location, '')) LIKE ?1
         ORDER BY u.created_at DESC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    email: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET username = ?, email = ? WHERE id = ?")
        .bind(username)
        .bind(email)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_active(pool: &SqlitePool, id: &str, active: bool) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes the account and, via cascading foreign keys, its profile, chef
/// record, bookings, and authored posts.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
