//! Profiles: public detail pages, owner editing, and work-image management.

use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;
use validator::Validate;

use super::contact::first_error;
use super::forms::MultipartForm;
use super::{render_template, AppState, OptionalUser, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::media::MediaStore;
use crate::middleware::CurrentUser;
use crate::queries::{chef, profile, user};

#[derive(askama::Template)]
#[template(path = "pages/profile/detail.html")]
struct ProfileDetailTemplate {
    ctx: PageContext,
    profile: profile::ProfileRow,
    profile_username: String,
    work_images: Vec<profile::WorkImageRow>,
    is_owner: bool,
    profile_is_chef: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/profile/edit.html")]
struct EditProfileTemplate {
    ctx: PageContext,
    error: Option<String>,
    form: ProfileFormInput,
}

#[derive(askama::Template)]
#[template(path = "pages/profile/work_images.html")]
struct WorkImagesTemplate {
    ctx: PageContext,
    profile_username: String,
    work_images: Vec<profile::WorkImageRow>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileFormInput {
    #[validate(length(min = 1, message = "Please provide a name."))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    pub mobile_number: String,
    pub location: String,
    pub education: String,
    #[validate(range(min = 0, message = "Experience cannot be negative."))]
    pub experience: i64,
    pub speciality: String,
    pub bio: String,
    pub dishes: String,
}

impl ProfileFormInput {
    fn from_multipart(form: &MultipartForm) -> Self {
        Self {
            name: form.text("name").trim().to_string(),
            email: form.text("email").trim().to_string(),
            mobile_number: form.text("mobile_number").trim().to_string(),
            location: form.text("location").trim().to_string(),
            education: form.text("education").trim().to_string(),
            experience: form.integer("experience").unwrap_or(0),
            speciality: form.text("speciality").trim().to_string(),
            bio: form.text("bio").trim().to_string(),
            dishes: form.text("dishes").trim().to_string(),
        }
    }

    fn from_row(row: &profile::ProfileRow) -> Self {
        Self {
            name: row.name.clone(),
            email: row.email.clone(),
            mobile_number: row.mobile_number.clone().unwrap_or_default(),
            location: row.location.clone(),
            education: row.education.clone(),
            experience: row.experience,
            speciality: row.speciality.clone(),
            bio: row.bio.clone(),
            dishes: row.dishes.clone(),
        }
    }

    fn as_update(&self) -> profile::ProfileUpdate {
        profile::ProfileUpdate {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile_number: if self.mobile_number.is_empty() {
                None
            } else {
                Some(self.mobile_number.clone())
            },
            location: self.location.clone(),
            education: self.education.clone(),
            experience: self.experience,
            speciality: self.speciality.clone(),
            bio: self.bio.clone(),
            dishes: if self.dishes.is_empty() {
                "Not specified".to_string()
            } else {
                self.dishes.clone()
            },
        }
    }
}

/// GET /user_profile - Convenience redirect to the caller's own page.
pub async fn get_user_profile(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Redirect::to(&format!("/profile/{}", user.username))
}

/// GET /profile/{username} - Public profile page.
pub async fn get_profile_detail(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(owner) = user::get_user_by_username(&state.pool, &username).await? else {
        return Err(AppError::NotFound);
    };
    let Some(profile_row) = profile::get_profile_by_user_id(&state.pool, &owner.id).await? else {
        return Err(AppError::NotFound);
    };

    let work_images = profile::list_work_images(&state.pool, &profile_row.id).await?;
    let profile_is_chef = chef::get_chef_by_user_id(&state.pool, &owner.id)
        .await?
        .is_some();
    let is_owner = viewer
        .as_ref()
        .map(|viewer| viewer.id == owner.id)
        .unwrap_or(false);

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(ProfileDetailTemplate {
            ctx: PageContext::new(viewer, notices),
            profile: profile_row,
            profile_username: username,
            work_images,
            is_owner,
            profile_is_chef,
        }),
    ))
}

/// GET /profile/edit - Edit form pre-filled with the caller's profile.
pub async fn get_edit_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let Some(row) = profile::get_profile_by_user_id(&state.pool, &user.id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(EditProfileTemplate {
            ctx: PageContext::new(Some(user), notices),
            error: None,
            form: ProfileFormInput::from_row(&row),
        }),
    ))
}

/// POST /profile/edit - Update the caller's profile; optional new image.
pub async fn post_edit_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let Some(row) = profile::get_profile_by_user_id(&state.pool, &user.id).await? else {
        return Err(AppError::NotFound);
    };

    let form = MultipartForm::read(multipart).await?;
    let input = ProfileFormInput::from_multipart(&form);

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(EditProfileTemplate {
                ctx: PageContext::new(Some(user), notices),
                error: Some(first_error(&errors)),
                form: input,
            }),
        )
            .into_response());
    }

    profile::update_profile(&state.pool, &row.id, &input.as_update()).await?;

    if let Some(upload) = form.file("profile_image") {
        let path = MediaStore::profile_image_path(&user.id, &upload.filename);
        state
            .media
            .save(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if let Some(previous) = &row.profile_image {
            if previous != &path {
                state.media.remove(previous).await;
            }
        }
        profile::set_profile_image(&state.pool, &row.id, &path).await?;
    }

    let jar = flash::success(jar, "Profile updated successfully.");
    Ok((jar, Redirect::to(&format!("/profile/{}", user.username))).into_response())
}

/// GET /profile/{username}/upload-images - Manage work images (owner only).
pub async fn get_upload_work_images(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user.username != username {
        let jar = flash::error(jar, "You can only manage images for your own profile.");
        return Ok((jar, Redirect::to(&format!("/profile/{username}"))).into_response());
    }

    let Some(row) = profile::get_profile_by_user_id(&state.pool, &user.id).await? else {
        return Err(AppError::NotFound);
    };
    let work_images = profile::list_work_images(&state.pool, &row.id).await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(WorkImagesTemplate {
            ctx: PageContext::new(Some(user), notices),
            profile_username: username,
            work_images,
        }),
    )
        .into_response())
}

/// POST /profile/{username}/upload-images - Add uploaded work images.
pub async fn post_upload_work_images(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(username): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if user.username != username {
        let jar = flash::error(jar, "You can only manage images for your own profile.");
        return Ok((jar, Redirect::to(&format!("/profile/{username}"))));
    }

    let Some(row) = profile::get_profile_by_user_id(&state.pool, &user.id).await? else {
        return Err(AppError::NotFound);
    };

    let form = MultipartForm::read(multipart).await?;
    let mut stored = 0usize;

    for upload in form.files("images") {
        let path = MediaStore::work_image_path(&user.username, &upload.filename);
        state
            .media
            .save(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        profile::add_work_image(&state.pool, &row.id, &path).await?;
        stored += 1;
    }

    info!(user_id = %user.id, stored, "Work images uploaded");

    let jar = if stored > 0 {
        flash::success(jar, "Work images updated.")
    } else {
        flash::info(jar, "No images were selected.")
    };
    Ok((jar, Redirect::to(&format!("/profile/{username}"))))
}

/// POST /profile/{username}/work-images/{image_id}/delete
pub async fn post_delete_work_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path((username, image_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if user.username != username {
        let jar = flash::error(jar, "You can only manage images for your own profile.");
        return Ok((jar, Redirect::to(&format!("/profile/{username}"))));
    }

    let Some(row) = profile::get_profile_by_user_id(&state.pool, &user.id).await? else {
        return Err(AppError::NotFound);
    };

    let Some(image) = profile::get_work_image(&state.pool, &image_id).await? else {
        return Err(AppError::NotFound);
    };
    if image.profile_id != row.id {
        return Err(AppError::NotFound);
    }

    profile::delete_work_image(&state.pool, &image_id).await?;
    state.media.remove(&image.image).await;

    let jar = flash::success(jar, "Image removed.");
    Ok((jar, Redirect::to(&format!(
        "/profile/{username}/upload-images"
    ))))
}
