use sqlx::SqlitePool;
use ulid::Ulid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub specialty: String,
    pub experience: i64,
    pub team_members: Option<i64>,
    pub price_per_person: f64,
    pub image: Option<String>,
}

/// Listing row carrying the owner's username for profile links.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefListRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub specialty: String,
    pub experience: i64,
    pub team_members: Option<i64>,
    pub price_per_person: f64,
    pub image: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct ChefInput {
    pub name: String,
    pub specialty: String,
    pub experience: i64,
    pub team_members: Option<i64>,
    pub price_per_person: f64,
}

pub async fn create_chef(
    pool: &SqlitePool,
    user_id: &str,
    input: &ChefInput,
    image: Option<&str>,
) -> sqlx::Result<ChefRow> {
    let id = Ulid::new().to_string();

    sqlx::query(
        "INSERT INTO chefs (id, user_id, name, specialty, experience, team_members, price_per_person, image)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(&input.name)
    .bind(&input.specialty)
    .bind(input.experience)
    .bind(input.team_members)
    .bind(input.price_per_person)
    .bind(image)
    .execute(pool)
    .await?;

    Ok(ChefRow {
        id,
        user_id: user_id.to_string(),
        name: input.name.clone(),
        specialty: input.specialty.clone(),
        experience: input.experience,
        team_members: input.team_members,
        price_per_person: input.price_per_person,
        image: image.map(str::to_string),
    })
}

pub async fn get_chef_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<ChefRow>> {
    sqlx::query_as("SELECT * FROM chefs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_chef_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<ChefRow>> {
    sqlx::query_as("SELECT * FROM chefs WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive substring search over name, specialty, and experience;
/// an empty query lists every chef.
pub async fn search_chefs(pool: &SqlitePool, q: &str) -> sqlx::Result<Vec<ChefListRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    sqlx::query_as(
        "SELECT c.*, u.username
         FROM chefs c
         JOIN users u ON u.id = c.user_id
         WHERE lower(c.name) LIKE ?1
            OR lower(c.specialty) LIKE ?1
            OR CAST(c.experience AS TEXT) LIKE ?1
         ORDER BY c.name",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

/// Admin listing: name/specialty search, newest first.
pub async fn list_chefs(
    pool: &SqlitePool,
    q: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<ChefListRow>> {
    let pattern = format!("%{}%", q.to_lowercase());

    sqlx::query_as(
        "SELECT c.*, u.username
         FROM chefs c
         JOIN users u ON u.id = c.user_id
         WHERE lower(c.name) LIKE ?1 OR lower(c.specialty) LIKE ?1
         ORDER BY c.id DESC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn update_chef(
    pool: &SqlitePool,
    chef_id: &str,
    input: &ChefInput,
    image: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE chefs
         SET name = ?, specialty = ?, experience = ?, team_members = ?, price_per_person = ?,
             image = COALESCE(?, image)
         WHERE id = ?",
    )
    .bind(&input.name)
    .bind(&input.specialty)
    .bind(input.experience)
    .bind(input.team_members)
    .bind(input.price_per_person)
    .bind(image)
    .bind(chef_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_chef(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM chefs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_chefs(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chefs")
        .fetch_one(pool)
        .await
}
