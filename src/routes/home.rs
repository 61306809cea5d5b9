use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use super::{render_template, OptionalUser, PageContext};
use crate::flash;

#[derive(askama::Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate {
    ctx: PageContext,
}

#[derive(askama::Template)]
#[template(path = "pages/about.html")]
struct AboutTemplate {
    ctx: PageContext,
}

/// GET / - Landing page
pub async fn get_home(OptionalUser(user): OptionalUser, jar: CookieJar) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(HomeTemplate {
            ctx: PageContext::new(user, notices),
        }),
    )
}

/// GET /about
pub async fn get_about(OptionalUser(user): OptionalUser, jar: CookieJar) -> impl IntoResponse {
    let (jar, notices) = flash::take(jar);
    (
        jar,
        render_template(AboutTemplate {
            ctx: PageContext::new(user, notices),
        }),
    )
}
