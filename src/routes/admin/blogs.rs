//! Back-office blog management.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use super::ListQuery;
use crate::error::AppError;
use crate::flash;
use crate::media::MediaStore;
use crate::middleware::CurrentUser;
use crate::queries::blog;
use crate::routes::contact::first_error;
use crate::routes::forms::MultipartForm;
use crate::routes::{render_template, AppState, PageContext};

const PER_PAGE: i64 = 15;

#[derive(askama::Template)]
#[template(path = "pages/admin/blog_list.html")]
struct AdminBlogListTemplate {
    ctx: PageContext,
    posts: Vec<blog::BlogListRow>,
    q: String,
    page: i64,
    has_more: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/blog_form.html")]
struct AdminBlogFormTemplate {
    ctx: PageContext,
    action: &'static str,
    post_id: Option<String>,
    error: Option<String>,
    form: BlogFormInput,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct BlogFormInput {
    #[validate(length(min = 1, message = "Please provide a title."))]
    pub title: String,
    #[validate(length(min = 1, message = "Please write some content."))]
    pub content: String,
    pub is_published: bool,
}

impl BlogFormInput {
    fn from_multipart(form: &MultipartForm) -> Self {
        Self {
            title: form.text("title").trim().to_string(),
            content: form.text("content").trim().to_string(),
            is_published: form.checkbox("is_published"),
        }
    }
}

/// GET /myadmin/blogs - Drafts included.
pub async fn get_blog_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = blog::list_posts(
        &state.pool,
        params.q.trim(),
        PER_PAGE,
        params.offset(PER_PAGE),
    )
    .await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminBlogListTemplate {
            ctx: PageContext::new(Some(user), notices),
            has_more: posts.len() as i64 == PER_PAGE,
            posts,
            q: params.q,
            page: params.page.max(1),
        }),
    ))
}

/// GET /myadmin/blogs/add
pub async fn get_blog_add(
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(AdminBlogFormTemplate {
            ctx: PageContext::new(Some(user), notices),
            action: "Add",
            post_id: None,
            error: None,
            form: BlogFormInput {
                is_published: true,
                ..BlogFormInput::default()
            },
        }),
    )
}

/// POST /myadmin/blogs/add - The acting admin becomes the author.
pub async fn post_blog_add(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let input = BlogFormInput::from_multipart(&form);

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(AdminBlogFormTemplate {
                ctx: PageContext::new(Some(user), notices),
                action: "Add",
                post_id: None,
                error: Some(first_error(&errors)),
                form: input,
            }),
        )
            .into_response());
    }

    let image = match form.file("image") {
        Some(upload) => {
            let path = MediaStore::blog_image_path(&upload.filename);
            state
                .media
                .save(&path, &upload.bytes)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Some(path)
        }
        None => None,
    };

    blog::create_post(
        &state.pool,
        &user.id,
        &input.title,
        &input.content,
        image.as_deref(),
        input.is_published,
    )
    .await?;

    let jar = flash::success(jar, "Blog post created.");
    Ok((jar, Redirect::to("/myadmin/blogs")).into_response())
}

/// GET /myadmin/blogs/edit/{post_id}
pub async fn get_blog_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(post) = blog::get_post(&state.pool, &post_id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminBlogFormTemplate {
            ctx: PageContext::new(Some(user), notices),
            action: "Edit",
            post_id: Some(post_id),
            error: None,
            form: BlogFormInput {
                title: post.title,
                content: post.content,
                is_published: post.is_published,
            },
        }),
    ))
}

/// POST /myadmin/blogs/edit/{post_id}
pub async fn post_blog_edit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(post_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if blog::get_post(&state.pool, &post_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let form = MultipartForm::read(multipart).await?;
    let input = BlogFormInput::from_multipart(&form);

    if let Err(errors) = input.validate() {
        let (jar, notices) = flash::take(jar);
        return Ok((
            jar,
            render_template(AdminBlogFormTemplate {
                ctx: PageContext::new(Some(user), notices),
                action: "Edit",
                post_id: Some(post_id),
                error: Some(first_error(&errors)),
                form: input,
            }),
        )
            .into_response());
    }

    let image = match form.file("image") {
        Some(upload) => {
            let path = MediaStore::blog_image_path(&upload.filename);
            state
                .media
                .save(&path, &upload.bytes)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Some(path)
        }
        None => None,
    };

    blog::update_post(
        &state.pool,
        &post_id,
        &input.title,
        &input.content,
        image.as_deref(),
        input.is_published,
    )
    .await?;

    let jar = flash::success(jar, "Blog post updated.");
    Ok((jar, Redirect::to("/myadmin/blogs")).into_response())
}

/// POST /myadmin/blogs/toggle-publish/{post_id}
pub async fn post_blog_toggle_publish(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !blog::toggle_publish(&state.pool, &post_id).await? {
        return Err(AppError::NotFound);
    }

    let jar = flash::success(jar, "Publish state updated.");
    Ok((jar, Redirect::to("/myadmin/blogs")))
}

/// POST /myadmin/blogs/delete/{post_id}
pub async fn post_blog_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !blog::delete_post(&state.pool, &post_id).await? {
        return Err(AppError::NotFound);
    }

    let jar = flash::success(jar, "Blog post deleted.");
    Ok((jar, Redirect::to("/myadmin/blogs")))
}
