use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use super::CurrentUser;
use crate::flash;

/// Back-office gate: requires an authenticated superuser.
///
/// Runs behind `auth_middleware`, so a missing extension means the request
/// never authenticated. Non-superusers get a notice and land back on the
/// public site rather than an error page.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<CurrentUser>().cloned() else {
        warn!("Admin request without authenticated user");
        return (StatusCode::SEE_OTHER, [("Location", "/login")]).into_response();
    };

    if !user.is_superuser {
        warn!(user_id = %user.id, "Non-superuser attempted to access the admin module");
        let jar = flash::error(
            CookieJar::new(),
            "You do not have permission to access the admin area.",
        );
        return (jar, Redirect::to("/")).into_response();
    }

    next.run(request).await
}
