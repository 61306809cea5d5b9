use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use super::{render_template, AppState, OptionalUser, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::queries::contact;

#[derive(askama::Template)]
#[template(path = "pages/contact.html")]
struct ContactTemplate {
    ctx: PageContext,
    error: Option<String>,
    form: ContactForm,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Please tell us your name."))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide a subject."))]
    pub subject: String,
    #[validate(length(min = 1, message = "Please write a message."))]
    pub message: String,
}

/// GET /contact
pub async fn get_contact(OptionalUser(user): OptionalUser, jar: CookieJar) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(ContactTemplate {
            ctx: PageContext::new(user, notices),
            error: None,
            form: ContactForm::default(),
        }),
    )
}

/// POST /contact/submit
pub async fn post_contact(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
    Form(form): Form<ContactForm>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(errors) = form.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(ContactTemplate {
                ctx: PageContext::new(user, notices),
                error: Some(first_error(&errors)),
                form,
            }),
        )
            .into_response());
    }

    contact::submit_query(&state.pool, &form.name, &form.email, &form.subject, &form.message)
        .await?;

    let jar = flash::success(jar, "Thanks for reaching out. We'll get back to you soon.");
    Ok((jar, Redirect::to("/contact")).into_response())
}

/// First human-readable message out of a validator error set.
pub(crate) fn first_error(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|err| err.message.as_ref())
        .map(|msg| msg.to_string())
        .next()
        .unwrap_or_else(|| "Please fix the errors below.".to_string())
}
