//! Back-office routes, nested under `/myadmin` behind the superuser gate.

mod blogs;
mod bookings;
mod chefs;
mod contact;
mod users;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::{render_template, AppState, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries;

/// Shared list-page query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

impl ListQuery {
    pub fn offset(&self, per_page: i64) -> i64 {
        (self.page.max(1) - 1) * per_page
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard))
        .route("/chefs", get(chefs::get_chef_list))
        .route("/chefs/add", get(chefs::get_chef_add).post(chefs::post_chef_add))
        .route(
            "/chefs/edit/{chef_id}",
            get(chefs::get_chef_edit).post(chefs::post_chef_edit),
        )
        .route(
            "/chefs/delete/{chef_id}",
            get(chefs::get_chef_delete).post(chefs::post_chef_delete),
        )
        .route("/bookings", get(bookings::get_booking_list))
        .route("/bookings/view/{booking_id}", get(bookings::get_booking_view))
        .route(
            "/bookings/update-status/{booking_id}",
            post(bookings::post_booking_update_status),
        )
        .route(
            "/bookings/delete/{booking_id}",
            post(bookings::post_booking_delete),
        )
        .route(
            "/bookings/hard-delete/{booking_id}",
            post(bookings::post_booking_hard_delete),
        )
        .route("/blogs", get(blogs::get_blog_list))
        .route("/blogs/add", get(blogs::get_blog_add).post(blogs::post_blog_add))
        .route(
            "/blogs/edit/{post_id}",
            get(blogs::get_blog_edit).post(blogs::post_blog_edit),
        )
        .route(
            "/blogs/toggle-publish/{post_id}",
            post(blogs::post_blog_toggle_publish),
        )
        .route("/blogs/delete/{post_id}", post(blogs::post_blog_delete))
        .route("/users", get(users::get_user_list))
        .route("/users/view/{user_id}", get(users::get_user_view))
        .route(
            "/users/edit/{user_id}",
            get(users::get_user_edit).post(users::post_user_edit),
        )
        .route(
            "/users/toggle-active/{user_id}",
            post(users::post_user_toggle_active),
        )
        .route("/users/delete/{user_id}", post(users::post_user_delete))
        .route("/contact-queries", get(contact::get_contact_list))
        .route("/contact-queries/view/{query_id}", get(contact::get_contact_view))
        .route(
            "/contact-queries/delete/{query_id}",
            post(contact::post_contact_delete),
        )
}

#[derive(askama::Template)]
#[template(path = "pages/admin/dashboard.html")]
struct AdminDashboardTemplate {
    ctx: PageContext,
    chefs_count: i64,
    bookings_count: i64,
    users_count: i64,
    queries_count: i64,
}

/// GET /myadmin - Entity counters.
pub async fn get_dashboard(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let chefs_count = queries::chef::count_chefs(&state.pool).await?;
    let bookings_count = queries::booking::count_bookings(&state.pool).await?;
    let users_count = queries::profile::count_profiles(&state.pool).await?;
    let queries_count = queries::contact::count_queries(&state.pool).await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminDashboardTemplate {
            ctx: PageContext::new(Some(user), notices),
            chefs_count,
            bookings_count,
            users_count,
            queries_count,
        }),
    ))
}
