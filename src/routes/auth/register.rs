//! Signup.
//!
//! Creates the account and its profile row in one step, then signs the new
//! user in.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::{build_auth_cookie, hash_password};
use crate::error::AppError;
use crate::flash;
use crate::queries::{profile, user};
use crate::routes::contact::first_error;
use crate::routes::{render_template, AppState, PageContext};

#[derive(askama::Template)]
#[template(path = "pages/auth/signup.html")]
struct SignupPageTemplate {
    ctx: PageContext,
    error: Option<String>,
    form: SignupForm,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 3, max = 150, message = "Username must be at least 3 characters."))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password1: String,
    pub password2: String,
}

/// GET /signup - Show signup form
pub async fn get_register(jar: CookieJar) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(SignupPageTemplate {
            ctx: PageContext::new(None, notices),
            error: None,
            form: SignupForm::default(),
        }),
    )
}

/// POST /signup - Create the account, its profile, and a session.
pub async fn post_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, AppError> {
    let rerender = |jar: CookieJar, error: String, form: SignupForm| {
        (
            jar,
            render_template(SignupPageTemplate {
                ctx: PageContext::default(),
                error: Some(error),
                form,
            }),
        )
            .into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rerender(jar, first_error(&errors), form));
    }

    if form.password1 != form.password2 {
        return Ok(rerender(jar, "Passwords do not match.".to_string(), form));
    }

    if user::get_user_by_username(&state.pool, &form.username)
        .await?
        .is_some()
    {
        return Ok(rerender(
            jar,
            "That username is already taken.".to_string(),
            form,
        ));
    }

    let hashed = hash_password(&form.password1).map_err(|e| AppError::Internal(e.to_string()))?;
    let account = user::create_user(&state.pool, &form.username, &form.email, &hashed).await?;
    profile::create_profile(&state.pool, &account.id, &account.username, &account.email).await?;

    let cookie = build_auth_cookie(&state.config.jwt, account.id.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let jar = jar.add(cookie);
    let jar = flash::success(jar, "Welcome! Account created successfully.");

    info!(user_id = %account.id, "User registered");

    Ok((jar, Redirect::to("/chefs")).into_response())
}
