//! Booking flows: request a chef, the shared dashboard, chef decisions, and
//! self-service archival.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use time::OffsetDateTime;

use chefbook_booking::{BookingStatus, Slot};

use super::{render_template, AppState, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries::{booking, chef};

#[derive(askama::Template)]
#[template(path = "pages/bookings/book.html")]
struct BookChefTemplate {
    ctx: PageContext,
    chef: chef::ChefRow,
    error: Option<String>,
    form: BookingForm,
}

#[derive(askama::Template)]
#[template(path = "pages/bookings/dashboard.html")]
struct DashboardTemplate {
    ctx: PageContext,
    bookings: Vec<booking::ChefBookingRow>,
    past_bookings: Vec<booking::ChefBookingRow>,
    cos_bookings: Vec<booking::CustomerBookingRow>,
    past_cos_bookings: Vec<booking::CustomerBookingRow>,
    pending_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingForm {
    pub date: String,
    pub time: String,
    pub person: u32,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            time: String::new(),
            person: 1,
        }
    }
}

/// GET /book/{chef_id} - Booking form for one chef.
pub async fn get_book_chef(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(chef) = chef::get_chef_by_id(&state.pool, &chef_id).await? else {
        return Err(AppError::NotFound);
    };

    if chef.user_id == user.id {
        let jar = flash::error(jar, "You cannot book your own chef profile.");
        return Ok((jar, Redirect::to("/chefs")).into_response());
    }

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(BookChefTemplate {
            ctx: PageContext::new(Some(user), notices),
            chef,
            error: None,
            form: BookingForm::default(),
        }),
    )
        .into_response())
}

/// POST /book/{chef_id} - Submit a booking request.
///
/// Invalid input re-renders the form with what the customer typed; success
/// lands on the dashboard as a Pending request.
pub async fn post_book_chef(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
    Form(form): Form<BookingForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(chef) = chef::get_chef_by_id(&state.pool, &chef_id).await? else {
        return Err(AppError::NotFound);
    };

    if chef.user_id == user.id {
        let jar = flash::error(jar, "You cannot book your own chef profile.");
        return Ok((jar, Redirect::to("/chefs")).into_response());
    }

    let now = OffsetDateTime::now_utc();
    let outcome = match Slot::parse(&form.date, &form.time) {
        Ok(slot) => booking::create_booking(&state.pool, &user.id, &chef, slot, form.person, now)
            .await
            .map(|_| ()),
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(()) => {
            let jar = flash::success(jar, "Booking request submitted successfully.");
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::Validation(message)) => {
            let (jar, notices) = flash::take(jar);
            Ok((
                jar,
                render_template(BookChefTemplate {
                    ctx: PageContext::new(Some(user), notices),
                    chef,
                    error: Some(message),
                    form,
                }),
            )
                .into_response())
        }
        Err(other) => Err(other),
    }
}

/// GET /dashboard - Upcoming and past bookings for both roles the caller
/// holds, plus the chef's pending-request counter.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let now = OffsetDateTime::now_utc();

    let cos_bookings = booking::customer_bookings(&state.pool, &user.id, now, false).await?;
    let past_cos_bookings = booking::customer_bookings(&state.pool, &user.id, now, true).await?;
    let bookings = booking::chef_bookings(&state.pool, &user.id, now, false).await?;
    let past_bookings = booking::chef_bookings(&state.pool, &user.id, now, true).await?;
    let pending_count = booking::pending_count_for_chef(&state.pool, &user.id, now).await?;
    let is_chef = chef::get_chef_by_user_id(&state.pool, &user.id)
        .await?
        .is_some();

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(DashboardTemplate {
            ctx: PageContext::new(Some(user), notices).with_chef(is_chef),
            bookings,
            past_bookings,
            cos_bookings,
            past_cos_bookings,
            pending_count,
        }),
    ))
}

/// POST /update-booking/{booking_id}/{status} - Chef accepts or rejects.
pub async fn post_update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path((booking_id, status)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(new_status) = status.parse::<BookingStatus>() else {
        let jar = flash::error(jar, "Invalid booking status.");
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    };

    if !new_status.is_decided() {
        let jar = flash::error(jar, "Invalid booking status.");
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    match booking::decide_booking(&state.pool, &booking_id, new_status, &user.id).await {
        Ok(_) => {
            let jar = flash::success(
                jar,
                &format!("Booking marked as {}.", status.to_lowercase()),
            );
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::PermissionDenied(message)) | Err(AppError::InvalidTransition(message)) => {
            let jar = flash::error(jar, &message);
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(other) => Err(other),
    }
}

/// POST /bookings/remove/{booking_id} - Customer archives a past booking.
pub async fn post_remove_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let now = OffsetDateTime::now_utc();

    match booking::remove_own_booking(&state.pool, &booking_id, &user.id, now).await {
        Ok(()) => {
            let jar = flash::success(jar, "Booking removed from your list.");
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::PermissionDenied(message)) | Err(AppError::Validation(message)) => {
            let jar = flash::error(jar, &message);
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(other) => Err(other),
    }
}

/// POST /bookings/clear-past - Archive every past booking in one go.
pub async fn post_clear_past(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let now = OffsetDateTime::now_utc();
    let cleared = booking::clear_past_bookings(&state.pool, &user.id, now).await?;

    let jar = if cleared > 0 {
        flash::success(
            jar,
            &format!("{cleared} past booking(s) removed from your list."),
        )
    } else {
        flash::info(jar, "No past bookings were available to remove.")
    };

    Ok((jar, Redirect::to("/dashboard")))
}
