//! Login and logout.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{build_auth_cookie, clear_auth_cookie, verify_password};
use crate::error::AppError;
use crate::flash;
use crate::queries::user::get_user_by_username;
use crate::routes::{render_template, AppState, OptionalUser, PageContext};

#[derive(askama::Template)]
#[template(path = "pages/auth/login.html")]
struct LoginPageTemplate {
    ctx: PageContext,
    error: Option<String>,
    username: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// GET /login - Show login form
pub async fn get_login(OptionalUser(user): OptionalUser, jar: CookieJar) -> impl IntoResponse {
    if user.is_some() {
        // Already signed in
        return Redirect::to("/chefs").into_response();
    }

    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(LoginPageTemplate {
            ctx: PageContext::new(None, notices),
            error: None,
            username: String::new(),
        }),
    )
        .into_response()
}

/// POST /login - Verify credentials and start a session.
///
/// Superusers land in the back-office, everyone else on the chef list.
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let failed = |jar: CookieJar, username: String| {
        (
            jar,
            render_template(LoginPageTemplate {
                ctx: PageContext::default(),
                error: Some("Invalid username or password.".to_string()),
                username,
            }),
        )
            .into_response()
    };

    let Some(user) = get_user_by_username(&state.pool, &form.username).await? else {
        warn!(username = %form.username, "Login attempt for unknown user");
        return Ok(failed(jar, form.username));
    };

    if !user.is_active {
        warn!(user_id = %user.id, "Login attempt for deactivated account");
        return Ok(failed(jar, form.username));
    }

    match verify_password(&form.password, &user.hashed_password) {
        Ok(true) => {}
        _ => {
            warn!(user_id = %user.id, "Password verification failed");
            return Ok(failed(jar, form.username));
        }
    }

    let cookie = build_auth_cookie(&state.config.jwt, user.id.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let jar = jar.add(cookie);

    info!(user_id = %user.id, "User logged in");

    let destination = if user.is_superuser { "/myadmin" } else { "/chefs" };
    Ok((jar, Redirect::to(destination)).into_response())
}

/// POST /logout - Clear the session cookie
pub async fn post_logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(clear_auth_cookie());
    let jar = flash::info(jar, "You have been signed out.");
    (jar, Redirect::to("/"))
}
