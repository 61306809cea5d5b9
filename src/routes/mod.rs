use askama::Template;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    middleware as axum_middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{validate_token, AUTH_COOKIE_NAME};
use crate::config::Config;
use crate::error::AppError;
use crate::flash::FlashMessage;
use crate::media::MediaStore;
use crate::middleware::{admin_middleware, auth_middleware, CurrentUser};

pub mod admin;
pub mod assets;
pub mod auth;
pub mod blog;
pub mod bookings;
pub mod chefs;
pub mod contact;
pub mod forms;
pub mod health;
pub mod home;
pub mod profile;
pub mod reviews;

pub use assets::AssetsService;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub media: MediaStore,
}

/// Everything the base layout needs: the viewer (if any), pending notices,
/// and whether the viewer already has a chef profile.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub notices: Vec<FlashMessage>,
    pub is_chef: bool,
}

impl PageContext {
    pub fn new(user: Option<CurrentUser>, notices: Vec<FlashMessage>) -> Self {
        Self {
            user,
            notices,
            is_chef: false,
        }
    }

    pub fn with_chef(mut self, is_chef: bool) -> Self {
        self.is_chef = is_chef;
        self
    }
}

/// Helper to render templates
pub(crate) fn render_template<T: Template>(t: T) -> Response {
    match t.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred.",
            )
                .into_response()
        }
    }
}

/// Best-effort viewer resolution for public pages: a bad or missing token is
/// simply an anonymous visitor, never a redirect.
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(OptionalUser(Some(user.clone())));
        }

        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = jar.get(AUTH_COOKIE_NAME).map(|cookie| cookie.value()) else {
            return Ok(OptionalUser(None));
        };

        let Ok(claims) = validate_token(&state.config.jwt, token) else {
            return Ok(OptionalUser(None));
        };

        let user = crate::queries::user::get_user_by_id(&state.pool, &claims.sub)
            .await
            .ok()
            .flatten()
            .filter(|user| user.is_active)
            .map(|user| CurrentUser {
                id: user.id,
                username: user.username,
                is_superuser: user.is_superuser,
            });

        Ok(OptionalUser(user))
    }
}

pub async fn fallback() -> Response {
    AppError::NotFound.into_response()
}

pub fn router(state: AppState) -> Router {
    // Self-service routes require a session
    let protected_routes = Router::new()
        .route("/chefs", get(chefs::get_chef_list))
        .route(
            "/become-chef",
            get(chefs::get_become_chef).post(chefs::post_become_chef),
        )
        .route("/dashboard", get(bookings::get_dashboard))
        .route(
            "/book/{chef_id}",
            get(bookings::get_book_chef).post(bookings::post_book_chef),
        )
        .route(
            "/update-booking/{booking_id}/{status}",
            post(bookings::post_update_status),
        )
        .route(
            "/bookings/remove/{booking_id}",
            post(bookings::post_remove_booking),
        )
        .route("/bookings/clear-past", post(bookings::post_clear_past))
        .route("/user_profile", get(profile::get_user_profile))
        .route(
            "/profile/edit",
            get(profile::get_edit_profile).post(profile::post_edit_profile),
        )
        .route(
            "/profile/{username}/upload-images",
            get(profile::get_upload_work_images).post(profile::post_upload_work_images),
        )
        .route(
            "/profile/{username}/work-images/{image_id}/delete",
            post(profile::post_delete_work_image),
        )
        .route(
            "/reviews/submit/{booking_id}",
            get(reviews::get_submit_review).post(reviews::post_submit_review),
        )
        .route(
            "/reviews/{review_id}",
            get(reviews::get_view_review).post(reviews::post_review_response),
        )
        .route("/logout", post(auth::post_logout))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Back-office: session + superuser
    let admin_routes = admin::router()
        .route_layer(axum_middleware::from_fn(admin_middleware))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/", get(home::get_home))
                .route("/about", get(home::get_about))
                .route("/blog", get(blog::get_blog_list))
                .route("/blog/{post_id}", get(blog::get_blog_detail))
                .route("/contact", get(contact::get_contact))
                .route("/contact/submit", post(contact::post_contact))
                .route(
                    "/signup",
                    get(auth::get_register).post(auth::post_register),
                )
                .route("/login", get(auth::get_login).post(auth::post_login))
                .route("/profile/{username}", get(profile::get_profile_detail))
                .merge(protected_routes)
                .nest("/myadmin", admin_routes)
                .nest_service("/static", AssetsService::new())
                .nest_service("/media", ServeDir::new(state.media.root()))
                .fallback(fallback)
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http())
}
