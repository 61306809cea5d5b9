use sqlx::SqlitePool;
use ulid::Ulid;

use super::now_ts;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub location: String,
    pub education: String,
    pub experience: i64,
    pub speciality: String,
    pub bio: String,
    pub dishes: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkImageRow {
    pub id: String,
    pub profile_id: String,
    pub image: String,
    pub uploaded_at: i64,
}

/// Editable profile fields, mirrored by the edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub location: String,
    pub education: String,
    pub experience: i64,
    pub speciality: String,
    pub bio: String,
    pub dishes: String,
}

/// Created alongside signup with contact fields seeded from the account.
pub async fn create_profile(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    email: &str,
) -> sqlx::Result<ProfileRow> {
    let id = Ulid::new().to_string();

    sqlx::query(
        "INSERT INTO profiles (id, user_id, name, email, dishes)
         VALUES (?, ?, ?, ?, 'Not specified')",
    )
    .bind(&id)
    .bind(user_id)
    .bind(name)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(ProfileRow {
        id,
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        mobile_number: None,
        location: String::new(),
        education: String::new(),
        experience: 0,
        speciality: String::new(),
        bio: String::new(),
        dishes: "Not specified".to_string(),
        profile_image: None,
    })
}

pub async fn get_profile_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_profile_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as(
        "SELECT p.* FROM profiles p
         JOIN users u ON u.id = p.user_id
         WHERE u.username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn update_profile(
    pool: &SqlitePool,
    profile_id: &str,
    update: &ProfileUpdate,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE profiles
         SET name = ?, email = ?, mobile_number = ?, location = ?, education = ?,
             experience = ?, speciality = ?, bio = ?, dishes = ?
         WHERE id = ?",
    )
    .bind(&update.name)
    .bind(&update.email)
    .bind(&update.mobile_number)
    .bind(&update.location)
    .bind(&update.education)
    .bind(update.experience)
    .bind(&update.speciality)
    .bind(&update.bio)
    .bind(&update.dishes)
    .bind(profile_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_profile_image(
    pool: &SqlitePool,
    profile_id: &str,
    image: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE profiles SET profile_image = ? WHERE id = ?")
        .bind(image)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_profiles(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await
}

pub async fn list_work_images(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<WorkImageRow>> {
    sqlx::query_as(
        "SELECT * FROM work_images WHERE profile_id = ? ORDER BY uploaded_at DESC, id DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

pub async fn add_work_image(
    pool: &SqlitePool,
    profile_id: &str,
    image: &str,
) -> sqlx::Result<WorkImageRow> {
    let id = Ulid::new().to_string();
    let uploaded_at = now_ts();

    sqlx::query("INSERT INTO work_images (id, profile_id, image, uploaded_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(profile_id)
        .bind(image)
        .bind(uploaded_at)
        .execute(pool)
        .await?;

    Ok(WorkImageRow {
        id,
        profile_id: profile_id.to_string(),
        image: image.to_string(),
        uploaded_at,
    })
}

pub async fn get_work_image(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<WorkImageRow>> {
    sqlx::query_as("SELECT * FROM work_images WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_work_image(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM work_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
