mod admin;
mod auth;

pub use admin::admin_middleware;
pub use auth::{auth_middleware, CurrentUser};
