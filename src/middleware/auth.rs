use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::auth::{validate_token, AUTH_COOKIE_NAME};
use crate::routes::AppState;

/// Authenticated caller, resolved once per request and passed explicitly to
/// every operation that needs it.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub is_superuser: bool,
}

/// Authentication middleware that validates the JWT cookie.
///
/// Redirects to /login if the token is missing or invalid, or if the user no
/// longer exists (deleted) or has been deactivated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(AUTH_COOKIE_NAME).map(|cookie| cookie.value()) else {
        return (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response();
    };

    let claims = match validate_token(&state.config.jwt, token) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Invalid auth token: {e}, redirecting to login");
            return (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response();
        }
    };

    match crate::queries::user::get_user_by_id(&state.pool, &claims.sub).await {
        Ok(Some(user)) if user.is_active => {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
                is_superuser: user.is_superuser,
            });
            next.run(req).await
        }
        Ok(Some(user)) => {
            tracing::warn!(user_id = %user.id, "Deactivated user rejected, redirecting to login");
            (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response()
        }
        Ok(None) => {
            tracing::warn!(user_id = %claims.sub, "Unknown user in token, redirecting to login");
            (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response()
        }
        Err(e) => {
            tracing::error!("Database error resolving user: {e:?}, redirecting to login");
            (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response()
        }
    }
}
