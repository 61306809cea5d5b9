pub mod auth;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod flash;
pub mod media;
pub mod middleware;
pub mod observability;
pub mod queries;
pub mod routes;

pub use routes::AppState;

use media::MediaStore;

/// Create the app router.
///
/// Builds the Axum router with all routes configured; also the entry point
/// integration tests use to exercise the app without binding a socket.
pub fn create_app(pool: sqlx::SqlitePool, config: config::Config) -> axum::Router {
    let media = MediaStore::new(config.media.root.clone());

    routes::router(AppState {
        pool,
        config,
        media,
    })
}
