//! Back-office contact-query inbox.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use super::ListQuery;
use crate::error::AppError;
use crate::flash;
use crate::middleware::CurrentUser;
use crate::queries::contact;
use crate::routes::{render_template, AppState, PageContext};

const PER_PAGE: i64 = 20;

#[derive(askama::Template)]
#[template(path = "pages/admin/contact_list.html")]
struct AdminContactListTemplate {
    ctx: PageContext,
    queries: Vec<contact::ContactQueryRow>,
    q: String,
    page: i64,
    has_more: bool,
}

#[derive(askama::Template)]
#[template(path = "pages/admin/contact_view.html")]
struct AdminContactViewTemplate {
    ctx: PageContext,
    query: contact::ContactQueryRow,
}

/// GET /myadmin/contact-queries
pub async fn get_contact_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let queries = contact::list_queries(
        &state.pool,
        params.q.trim(),
        PER_PAGE,
        params.offset(PER_PAGE),
    )
    .await?;

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminContactListTemplate {
            ctx: PageContext::new(Some(user), notices),
            has_more: queries.len() as i64 == PER_PAGE,
            queries,
            q: params.q,
            page: params.page.max(1),
        }),
    ))
}

/// GET /myadmin/contact-queries/view/{query_id}
pub async fn get_contact_view(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Path(query_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(query) = contact::get_query(&state.pool, &query_id).await? else {
        return Err(AppError::NotFound);
    };

    let (jar, notices) = flash::take(jar);
    Ok((
        jar,
        render_template(AdminContactViewTemplate {
            ctx: PageContext::new(Some(user), notices),
            query,
        }),
    ))
}

/// POST /myadmin/contact-queries/delete/{query_id} - Archive the query.
pub async fn post_contact_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(query_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !contact::soft_delete_query(&state.pool, &query_id).await? {
        return Err(AppError::NotFound);
    }

    let jar = flash::success(jar, "Contact query removed.");
    Ok((jar, Redirect::to("/myadmin/contact-queries")))
}
