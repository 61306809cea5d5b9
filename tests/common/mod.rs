//! Shared harness for integration tests: in-memory database, real router,
//! and cookie-carrying request helpers.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

use chefbook::config::{
    BookingConfig, Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig,
    ServerConfig,
};

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub fn test_config(media_root: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
            issuer: "chefbook".to_string(),
            audience: "chefbook-web".to_string(),
        },
        media: MediaConfig {
            root: media_root.to_string(),
        },
        booking: BookingConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub config: Config,
    _media: temp_dir::TempDir,
}

pub async fn create_test_app(pool: SqlitePool) -> TestApp {
    let media = temp_dir::TempDir::new().unwrap();
    let config = test_config(&media.path().display().to_string());

    TestApp {
        router: chefbook::create_app(pool.clone(), config.clone()),
        pool,
        config,
        _media: media,
    }
}

impl TestApp {
    /// Insert a user directly; password is always "password123".
    pub async fn seed_user(&self, username: &str) -> String {
        let hashed = chefbook::auth::hash_password("password123").unwrap();
        let user = chefbook::queries::user::create_user(
            &self.pool,
            username,
            &format!("{username}@example.com"),
            &hashed,
        )
        .await
        .unwrap();
        chefbook::queries::profile::create_profile(
            &self.pool,
            &user.id,
            username,
            &format!("{username}@example.com"),
        )
        .await
        .unwrap();
        user.id
    }

    pub async fn seed_superuser(&self, username: &str) -> String {
        let id = self.seed_user(username).await;
        sqlx::query("UPDATE users SET is_superuser = 1 WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await
            .unwrap();
        id
    }

    /// Give the user a chef record and return the chef id.
    pub async fn seed_chef(&self, user_id: &str, name: &str, price_per_person: f64) -> String {
        let chef = chefbook::queries::chef::create_chef(
            &self.pool,
            user_id,
            &chefbook::queries::chef::ChefInput {
                name: name.to_string(),
                specialty: "Pasta".to_string(),
                experience: 5,
                team_members: None,
                price_per_person,
            },
            None,
        )
        .await
        .unwrap();
        chef.id
    }

    /// Insert a booking row as-is, bypassing create-time validation (used to
    /// seed past bookings).
    pub async fn seed_booking(
        &self,
        customer_id: &str,
        chef_id: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> String {
        let id = ulid_like();
        sqlx::query(
            "INSERT INTO bookings (id, customer_id, chef_id, date, time, person, total_price, status)
             VALUES (?, ?, ?, ?, ?, 2, 50.0, ?)",
        )
        .bind(&id)
        .bind(customer_id)
        .bind(chef_id)
        .bind(date)
        .bind(time)
        .bind(status)
        .execute(&self.pool)
        .await
        .unwrap();
        id
    }

    /// Session cookie value for `user_id`.
    pub fn auth_cookie(&self, user_id: &str) -> String {
        let token = chefbook::auth::generate_token(&self.config.jwt, user_id.to_string()).unwrap();
        format!("auth_token={token}")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }
}

/// Collision-free row id for seeded data.
fn ulid_like() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("TESTROW{:019}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Days offset from now, as (date, time) strings matching the stored format.
pub fn slot_days_from_now(days: i64) -> (String, String) {
    let at = time::OffsetDateTime::now_utc() + time::Duration::days(days);
    let slot = chefbook_booking::Slot::from_datetime(at);
    (slot.date_string(), slot.time_string())
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

/// The redirect target of a 303 response.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .map(|value| value.to_str().unwrap_or_default().to_string())
        .unwrap_or_default()
}
