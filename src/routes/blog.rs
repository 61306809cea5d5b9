use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

use super::{render_template, AppState, OptionalUser, PageContext};
use crate::error::AppError;
use crate::flash;
use crate::queries::blog::{self, BlogListRow};

#[derive(askama::Template)]
#[template(path = "pages/blog_list.html")]
struct BlogListTemplate {
    ctx: PageContext,
    posts: Vec<BlogListRow>,
}

#[derive(askama::Template)]
#[template(path = "pages/blog_detail.html")]
struct BlogDetailTemplate {
    ctx: PageContext,
    post: BlogListRow,
}

/// GET /blog - Published posts, newest first
pub async fn get_blog_list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let posts = blog::published_posts(&state.pool).await?;
    let (jar, notices) = flash::take(jar);

    Ok((
        jar,
        render_template(BlogListTemplate {
            ctx: PageContext::new(user, notices),
            posts,
        }),
    ))
}

/// GET /blog/{post_id} - A single published post; drafts 404
pub async fn get_blog_detail(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(post) = blog::get_published_post(&state.pool, &post_id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(BlogDetailTemplate {
            ctx: PageContext::new(user, notices),
            post,
        }),
    ))
}
