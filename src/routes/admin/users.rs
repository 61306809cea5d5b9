//! Back-office user management.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use super::ListQuery;
use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries::{chef, profile, user};
use crate::routes::{render_template, AppState, PageContext};

const PER_PAGE: i64 = 20;

#[derive(askama::Template)]
#[template(path = "pages/admin/user_list.html")]
struct AdminUserListTemplate {
    ctx: PageContext,
    users: Vec<user::UserListRow>,
    q: String,
    page: i64,
    has_more: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/user_view.html")]
struct AdminUserViewTemplate {
    ctx: PageContext,
    account: user::UserRow,
    profile: profile::ProfileRow,
    user_is_chef: bool,
}

/// GET /myadmin/users
pub async fn get_user_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = user::list_users(
        &state.pool,
        params.q.trim(),
        PER_PAGE,
        params.offset(PER_PAGE),
    )
    .await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminUserListTemplate {
            ctx: PageContext::new(Some(user), notices),
            has_more: users.len() as i64 == PER_PAGE,
            users,
            q: params.q,
            page: params.page.max(1),
        }),
    ))
}

/// GET /myadmin/users/view/{user_id}
pub async fn get_user_view(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(account) = user::get_user_by_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };
    let Some(profile_row) = profile::get_profile_by_user_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };
    let user_is_chef = chef::get_chef_by_user_id(&state.pool, &user_id)
        .await?
        .is_some();

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminUserViewTemplate {
            ctx: PageContext::new(Some(user), notices),
            account,
            profile: profile_row,
            user_is_chef,
        }),
    ))
}

#[derive(askama::Template)]
#[template(path = "pages/admin/user_form.html")]
struct AdminUserFormTemplate {
    ctx: PageContext,
    user_id: String,
    error: Option<String>,
    form: UserEditForm,
}

#[derive(Debug, Clone, Default, serde::Deserialize, validator::Validate)]
pub struct UserEditForm {
    #[validate(length(min = 3, max = 150, message = "Username must be at least 3 characters."))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub location: String,
    pub bio: String,
}

/// GET /myadmin/users/edit/{user_id}
pub async fn get_user_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(account) = user::get_user_by_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };
    let Some(profile_row) = profile::get_profile_by_user_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };

    let form = UserEditForm {
        username: account.username,
        email: account.email,
        name: profile_row.name,
        mobile_number: profile_row.mobile_number.unwrap_or_default(),
        location: profile_row.location,
        bio: profile_row.bio,
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminUserFormTemplate {
            ctx: PageContext::new(Some(user), notices),
            user_id,
            error: None,
            form,
        }),
    ))
}

/// POST /myadmin/users/edit/{user_id}
pub async fn post_user_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(user_id): Path<String>,
    axum::Form(form): axum::Form<UserEditForm>,
) -> Result<impl IntoResponse, AppError> {
    use validator::Validate;

    let Some(account) = user::get_user_by_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };
    let Some(profile_row) = profile::get_profile_by_user_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };

    let rerender = |jar: CookieJar, error: String, form: UserEditForm, user: CurrentUser| {
        (
            jar,
            render_template(AdminUserFormTemplate {
                ctx: PageContext::new(Some(user), Vec::new()),
                user_id: user_id.clone(),
                error: Some(error),
                form,
            }),
        )
            .into_response()
    };

    if let Err(errors) = form.validate() {
        return Ok(rerender(
            jar,
            crate::routes::contact::first_error(&errors),
            form,
            user,
        ));
    }

    // Renames must not collide with another account
    if form.username != account.username
        && user::get_user_by_username(&state.pool, &form.username)
            .await?
            .is_some()
    {
        return Ok(rerender(
            jar,
            "That username is already taken.".to_string(),
            form,
            user,
        ));
    }

    user::update_user(&state.pool, &user_id, &form.username, &form.email).await?;

    let update = crate::queries::profile::ProfileUpdate {
        name: form.name.clone(),
        email: form.email.clone(),
        mobile_number: if form.mobile_number.is_empty() {
            None
        } else {
            Some(form.mobile_number.clone())
        },
        location: form.location.clone(),
        education: profile_row.education.clone(),
        experience: profile_row.experience,
        speciality: profile_row.speciality.clone(),
        bio: form.bio.clone(),
        dishes: profile_row.dishes.clone(),
    };
    profile::update_profile(&state.pool, &profile_row.id, &update).await?;

    info!(admin = %user.id, user_id = %user_id, "User updated from admin");

    let jar = flash::success(jar, "User updated.");
    Ok((jar, Redirect::to("/myadmin/users")).into_response())
}

/// POST /myadmin/users/toggle-active/{user_id}
///
/// Deactivation locks the account out at the next request; admins cannot
/// deactivate themselves.
pub async fn post_user_toggle_active(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user.id == user_id {
        let jar = flash::error(jar, "You cannot deactivate your own account.");
        return Ok((jar, Redirect::to("/myadmin/users")));
    }

    let Some(account) = user::get_user_by_id(&state.pool, &user_id).await? else {
        return Err(AppError::NotFound);
    };

    user::set_active(&state.pool, &user_id, !account.is_active).await?;
    info!(admin = %user.id, user_id = %user_id, active = !account.is_active, "User active flag toggled");

    let jar = flash::success(
        jar,
        if account.is_active {
            "User deactivated."
        } else {
            "User activated."
        },
    );
    Ok((jar, Redirect::to("/myadmin/users")))
}

/// POST /myadmin/users/delete/{user_id}
pub async fn post_user_delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user.id == user_id {
        let jar = flash::error(jar, "You cannot delete your own account.");
        return Ok((jar, Redirect::to("/myadmin/users")));
    }

    if !user::delete_user(&state.pool, &user_id).await? {
        return Err(AppError::NotFound);
    }
    info!(admin = %user.id, user_id = %user_id, "User deleted");

    let jar = flash::success(jar, "User deleted.");
    Ok((jar, Redirect::to("/myadmin/users")))
}
