//! Chef discovery and the become-chef flow.

use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::contact::first_error;
use super::forms::MultipartForm;
use super::{render_template, AppState, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::media::MediaStore;
use crate::middleware::CurrentUser;
use crate::queries::{chef, profile};

#[derive(askama::Template)]
#[template(path = "pages/chefs/list.html")]
struct ChefListTemplate {
    ctx: PageContext,
    chefs: Vec<chef::ChefListRow>,
    query: String,
}

#[derive(askama::Template)]
#[template(path = "pages/chefs/become.html")]
struct BecomeChefTemplate {
    ctx: PageContext,
    error: Option<String>,
    form: ChefFormInput,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ChefFormInput {
    #[validate(length(min = 1, message = "Please provide a display name."))]
    pub name: String,
    #[validate(length(min = 1, message = "Please provide a specialty."))]
    pub specialty: String,
    #[validate(range(min = 0, message = "Experience cannot be negative."))]
    pub experience: i64,
    #[validate(range(min = 2, message = "A team must have at least 2 members."))]
    pub team_members: Option<i64>,
    #[validate(range(min = 0.0, message = "Price per person cannot be negative."))]
    pub price_per_person: f64,
}

impl ChefFormInput {
    pub fn from_multipart(form: &MultipartForm) -> Self {
        Self {
            name: form.text("name").trim().to_string(),
            specialty: form.text("specialty").trim().to_string(),
            experience: form.integer("experience").unwrap_or(0),
            team_members: form.integer("team_members"),
            price_per_person: form.decimal("price_per_person").unwrap_or(0.0),
        }
    }

    pub fn as_chef_input(&self) -> chef::ChefInput {
        chef::ChefInput {
            name: self.name.clone(),
            specialty: self.specialty.clone(),
            experience: self.experience,
            team_members: self.team_members,
            price_per_person: self.price_per_person,
        }
    }
}

/// GET /chefs - Browse chefs; `q` filters name, specialty, and experience.
pub async fn get_chef_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.q.trim().to_string();
    let chefs = chef::search_chefs(&state.pool, &query).await?;
    let is_chef = chef::get_chef_by_user_id(&state.pool, &user.id)
        .await?
        .is_some();

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(ChefListTemplate {
            ctx: PageContext::new(Some(user), notices).with_chef(is_chef),
            chefs,
            query,
        }),
    ))
}

/// GET /become-chef - Chef signup form, pre-filled from the profile.
pub async fn get_become_chef(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if chef::get_chef_by_user_id(&state.pool, &user.id)
        .await?
        .is_some()
    {
        let jar = flash::info(jar, "You already have a chef profile.");
        return Ok((jar, Redirect::to("/chefs")).into_response());
    }

    let existing = profile::get_profile_by_user_id(&state.pool, &user.id).await?;
    let form = ChefFormInput {
        name: existing
            .as_ref()
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user.username.clone()),
        experience: existing.as_ref().map(|p| p.experience).unwrap_or(0),
        ..ChefFormInput::default()
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(BecomeChefTemplate {
            ctx: PageContext::new(Some(user), notices),
            error: None,
            form,
        }),
    )
        .into_response())
}

/// POST /become-chef - Create the caller's chef profile (at most one).
pub async fn post_become_chef(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if chef::get_chef_by_user_id(&state.pool, &user.id)
        .await?
        .is_some()
    {
        let jar = flash::info(jar, "You already have a chef profile.");
        return Ok((jar, Redirect::to("/chefs")).into_response());
    }

    let form = MultipartForm::read(multipart).await?;
    let input = ChefFormInput::from_multipart(&form);

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(BecomeChefTemplate {
                ctx: PageContext::new(Some(user), notices),
                error: Some(first_error(&errors)),
                form: input,
            }),
        )
            .into_response());
    }

    let image = match form.file("image") {
        Some(upload) => {
            let path = MediaStore::chef_image_path(&upload.filename);
            state
                .media
                .save(&path, &upload.bytes)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Some(path)
        }
        None => None,
    };

    let created = chef::create_chef(&state.pool, &user.id, &input.as_chef_input(), image.as_deref())
        .await?;
    info!(chef_id = %created.id, user_id = %user.id, "Chef profile created");

    let jar = flash::success(jar, "Chef profile created successfully.");
    Ok((jar, Redirect::to("/chefs")).into_response())
}
