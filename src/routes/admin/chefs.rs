//! Back-office chef CRUD.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;
use validator::Validate;

use super::ListQuery;
use crate::error::AppError;
use crate::flash;
use crate::media::MediaStore;
use crate::middleware::CurrentUser;
use crate::queries::chef;
use crate::routes::chefs::ChefFormInput;
use crate::routes::contact::first_error;
use crate::routes::forms::MultipartForm;
use crate::routes::{render_template, AppState, PageContext};

const PER_PAGE: i64 = 12;

#[derive(askama::Template)]
#[template(path = "pages/admin/chef_list.html")]
struct AdminChefListTemplate {
    ctx: PageContext,
    chefs: Vec<chef::ChefListRow>,
    q: String,
    page: i64,
    has_more: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/chef_form.html")]
struct AdminChefFormTemplate {
    ctx: PageContext,
    action: &'static str,
    chef_id: Option<String>,
    error: Option<String>,
    form: ChefFormInput,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/chef_confirm_delete.html")]
struct AdminChefDeleteTemplate {
    ctx: PageContext,
    chef: chef::ChefRow,
}

/// GET /myadmin/chefs
pub async fn get_chef_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let chefs = chef::list_chefs(
        &state.pool,
        params.q.trim(),
        PER_PAGE,
        params.offset(PER_PAGE),
    )
    .await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminChefListTemplate {
            ctx: PageContext::new(Some(user), notices),
            has_more: chefs.len() as i64 == PER_PAGE,
            chefs,
            q: params.q,
            page: params.page.max(1),
        }),
    ))
}

/// GET /myadmin/chefs/add
pub async fn get_chef_add(
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(AdminChefFormTemplate {
            ctx: PageContext::new(Some(user), notices),
            action: "Add",
            chef_id: None,
            error: None,
            form: ChefFormInput::default(),
        }),
    )
}

/// POST /myadmin/chefs/add - Create a chef record for an existing user.
pub async fn post_chef_add(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let input = ChefFormInput::from_multipart(&form);
    let username = form.text("username").trim().to_string();

    let rerender = |jar: CookieJar,
                    notices,
                    error: String,
                    input: ChefFormInput,
                    user: CurrentUser| {
        (
            jar,
            render_template(AdminChefFormTemplate {
                ctx: PageContext::new(Some(user), notices),
                action: "Add",
                chef_id: None,
                error: Some(error),
                form: input,
            }),
        )
            .into_response()
    };

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok(rerender(jar, notices, first_error(&errors), input, user));
    }

    let Some(owner) = crate::queries::user::get_user_by_username(&state.pool, &username).await?
    else {
        let (jar, notices) = flash::take(jar);
        return Ok(rerender(
            jar,
            notices,
            format!("No user named \"{username}\"."),
            input,
            user,
        ));
    };

    if chef::get_chef_by_user_id(&state.pool, &owner.id).await?.is_some() {
        let (jar, notices) = flash::take(jar);
        return Ok(rerender(
            jar,
            notices,
            "That user already has a chef profile.".to_string(),
            input,
            user,
        ));
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

    let created =
        chef::create_chef(&state.pool, &owner.id, &input.as_chef_input(), image.as_deref()).await?;
    info!(chef_id = %created.id, admin = %user.id, "Chef created from admin");

    let jar = flash::success(jar, "Chef created successfully.");
    Ok((jar, Redirect::to("/myadmin/chefs")).into_response())
}

/// GET /myadmin/chefs/edit/{chef_id}
pub async fn get_chef_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(row) = chef::get_chef_by_id(&state.pool, &chef_id).await? else {
        return Err(AppError::NotFound);
    };

    let form = ChefFormInput {
        name: row.name.clone(),
        specialty: row.specialty.clone(),
        experience: row.experience,
        team_members: row.team_members,
        price_per_person: row.price_per_person,
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminChefFormTemplate {
            ctx: PageContext::new(Some(user), notices),
            action: "Edit",
            chef_id: Some(chef_id),
            error: None,
            form,
        }),
    ))
}

/// POST /myadmin/chefs/edit/{chef_id}
pub async fn post_chef_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if chef::get_chef_by_id(&state.pool, &chef_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let form = MultipartForm::read(multipart).await?;
    let input = ChefFormInput::from_multipart(&form);

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(AdminChefFormTemplate {
                ctx: PageContext::new(Some(user), notices),
                action: "Edit",
                chef_id: Some(chef_id),
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

    chef::update_chef(&state.pool, &chef_id, &input.as_chef_input(), image.as_deref()).await?;

    let jar = flash::success(jar, "Chef updated successfully.");
    Ok((jar, Redirect::to("/myadmin/chefs")).into_response())
}

/// GET /myadmin/chefs/delete/{chef_id} - Confirmation page.
pub async fn get_chef_delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(row) = chef::get_chef_by_id(&state.pool, &chef_id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminChefDeleteTemplate {
            ctx: PageContext::new(Some(user), notices),
            chef: row,
        }),
    ))
}

/// POST /myadmin/chefs/delete/{chef_id}
pub async fn post_chef_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chef_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !chef::delete_chef(&state.pool, &chef_id).await? {
        return Err(AppError::NotFound);
    }

    let jar = flash::success(jar, "Chef deleted.");
    Ok((jar, Redirect::to("/myadmin/chefs")))
}
