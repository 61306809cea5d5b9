//! Reviews: one per booking, with an optional single response from the chef.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use super::contact::first_error;
use super::{render_template, AppState, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries::{booking, review};

#[derive(askama::Template)]
#[template(path = "pages/reviews/submit.html")]
struct SubmitReviewTemplate {
    ctx: PageContext,
    booking_id: String,
    chef_name: String,
    error: Option<String>,
    form: ReviewForm,
}

#[derive(askama::Template)]
#[template(path = "pages/reviews/view.html")]
struct ViewReviewTemplate {
    ctx: PageContext,
    review: review::ReviewRow,
    chef_name: String,
    response: Option<review::ChefResponseRow>,
    can_respond: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: u8,
    #[validate(length(min = 1, message = "Please write a comment."))]
    pub comment: String,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            rating: 5,
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResponseForm {
    #[validate(length(min = 1, message = "Please write a response."))]
    pub response: String,
}

/// GET /reviews/submit/{booking_id} - Review form for a completed booking.
///
/// A booking that already has a review redirects to it instead.
pub async fn get_submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(context) = booking::get_booking_context(&state.pool, &booking_id).await? else {
        return Err(AppError::NotFound);
    };

    if context.customer_id != user.id {
        let jar = flash::error(jar, "You can only review your own bookings.");
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    if let Some(existing) = review::get_review_by_booking(&state.pool, &booking_id).await? {
        return Ok(Redirect::to(&format!("/reviews/{}", existing.id)).into_response());
    }

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(SubmitReviewTemplate {
            ctx: PageContext::new(Some(user), notices),
            booking_id,
            chef_name: context.chef_name,
            error: None,
            form: ReviewForm::default(),
        }),
    )
        .into_response())
}

/// POST /reviews/submit/{booking_id} - Create the booking's review.
pub async fn post_submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(booking_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(context) = booking::get_booking_context(&state.pool, &booking_id).await? else {
        return Err(AppError::NotFound);
    };

    if context.customer_id != user.id {
        let jar = flash::error(jar, "You can only review your own bookings.");
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    // Second submission: hand back the existing review, no duplicate row.
    if let Some(existing) = review::get_review_by_booking(&state.pool, &booking_id).await? {
        return Ok(Redirect::to(&format!("/reviews/{}", existing.id)).into_response());
    }

    if let Err(errors) = form.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(SubmitReviewTemplate {
                ctx: PageContext::new(Some(user), notices),
                booking_id,
                chef_name: context.chef_name,
                error: Some(first_error(&errors)),
                form,
            }),
        )
            .into_response());
    }

    let created = review::create_review(&state.pool, &booking_id, form.rating, &form.comment).await?;

    let jar = flash::success(jar, "Thanks for your review!");
    Ok((jar, Redirect::to(&format!("/reviews/{}", created.id))).into_response())
}

/// GET /reviews/{review_id} - Review with the chef's response, if any.
pub async fn get_view_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(review_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(review_row) = review::get_review(&state.pool, &review_id).await? else {
        return Err(AppError::NotFound);
    };
    let Some(context) = booking::get_booking_context(&state.pool, &review_row.booking_id).await?
    else {
        return Err(AppError::NotFound);
    };

    let response = review::get_response_by_review(&state.pool, &review_id).await?;
    let can_respond = context.chef_owner_id == user.id && response.is_none();

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(ViewReviewTemplate {
            ctx: PageContext::new(Some(user), notices),
            review: review_row,
            chef_name: context.chef_name,
            response,
            can_respond,
        }),
    ))
}

/// POST /reviews/{review_id} - The owning chef responds, once.
pub async fn post_review_response(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(review_id): Path<String>,
    Form(form): Form<ResponseForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(review_row) = review::get_review(&state.pool, &review_id).await? else {
        return Err(AppError::NotFound);
    };
    let Some(context) = booking::get_booking_context(&state.pool, &review_row.booking_id).await?
    else {
        return Err(AppError::NotFound);
    };

    if context.chef_owner_id != user.id {
        let jar = flash::error(jar, "Only the reviewed chef can respond to this review.");
        return Ok((jar, Redirect::to(&format!("/reviews/{review_id}"))));
    }

    if review::get_response_by_review(&state.pool, &review_id)
        .await?
        .is_some()
    {
        let jar = flash::info(jar, "This review already has a response.");
        return Ok((jar, Redirect::to(&format!("/reviews/{review_id}"))));
    }

    if let Err(errors) = form.validate() {
        let jar = flash::error(jar, &first_error(&errors));
        return Ok((jar, Redirect::to(&format!("/reviews/{review_id}"))));
    }

    review::create_response(&state.pool, &review_id, &form.response).await?;

    let jar = flash::success(jar, "Response published.");
    Ok((jar, Redirect::to(&format!("/reviews/{review_id}"))))
}
