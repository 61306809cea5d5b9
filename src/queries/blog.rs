use sqlx::SqlitePool;
use ulid::Ulid;

use super::now_ts;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub author_id: String,
    pub created_at: i64,
    pub is_published: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogListRow {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub author_id: String,
    pub author_username: String,
    pub created_at: i64,
    pub is_published: bool,
}

pub async fn published_posts(pool: &SqlitePool) -> sqlx::Result<Vec<BlogListRow>> {
    sqlx::query_as(
        "SELECT b.*, u.username AS author_username
         FROM blog_posts b
         JOIN users u ON u.id = b.author_id
         WHERE b.is_published = 1
         ORDER BY b.created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_published_post(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<BlogListRow>> {
    sqlx::query_as(
        "SELECT b.*, u.username AS author_username
         FROM blog_posts b
         JOIN users u ON u.id = b.author_id
         WHERE b.id = ? AND b.is_published = 1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Admin listing, drafts included; searches title and content.
pub async fn list_posts(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<BlogListRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    sqlx::query_as(
        "SELECT b.*, u.username AS author_username
         FROM blog_posts b
         JOIN users u ON u.id = b.author_id
         WHERE lower(b.title) LIKE ?1 OR lower(b.content) LIKE ?1
         ORDER BY b.created_at DESC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_post(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<BlogPostRow>> {
    sqlx::query_as("SELECT * FROM blog_posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_post(
    pool: &SqlitePool,
    author_id: &str,
    title: &str,
    content: &str,
    image: Option<&str>,
    is_published: bool,
) -> sqlx::Result<BlogPostRow> {
    let id = Ulid::new().to_string();
    let created_at = now_ts();

    sqlx::query(
        "INSERT INTO blog_posts (id, title, image, content, author_id, created_at, is_published)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(title)
    .bind(image)
    .bind(content)
    .bind(author_id)
    .bind(created_at)
    .bind(is_published)
    .execute(pool)
    .await?;

    Ok(BlogPostRow {
        id,
        title: title.to_string(),
        image: image.map(str::to_string),
        content: content.to_string(),
        author_id: author_id.to_string(),
        created_at,
        is_published,
    })
}

pub async fn update_post(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    content: &str,
    image: Option<&str>,
    is_published: bool,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE blog_posts
         SET title = ?, content = ?, image = COALESCE(?, image), is_published = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(content)
    .bind(image)
    .bind(is_published)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn toggle_publish(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE blog_posts SET is_published = NOT is_published WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_post(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
