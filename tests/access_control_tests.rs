//! The uniform access contract: anonymous redirects, the superuser gate,
//! uniform 404s, and never-failing search.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn anonymous_callers_are_redirected_to_login() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool).await;

    for uri in ["/chefs", "/dashboard", "/become-chef", "/profile/edit"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(common::location(&response), "/login", "GET {uri}");
    }

    let response = app.post_form("/bookings/clear-past", "", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");
}

#[tokio::test]
async fn public_pages_render_without_a_session() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool).await;

    for uri in ["/", "/about", "/blog", "/contact", "/login", "/signup", "/health"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn the_admin_module_requires_a_superuser() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool).await;

    let user = app.seed_user("alice").await;
    let admin = app.seed_superuser("root").await;

    // Anonymous: to login
    let response = app.get("/myadmin", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");

    // Authenticated but not superuser: notice + safe page, no admin content
    let response = app.get("/myadmin", Some(&app.auth_cookie(&user))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/");

    let response = app.get("/myadmin/users", Some(&app.auth_cookie(&user))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/");

    // Superuser: back office renders
    let response = app.get("/myadmin", Some(&app.auth_cookie(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_resources_get_a_uniform_404() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let user = app.seed_user("alice").await;
    let cookie = app.auth_cookie(&user);

    let response = app.get("/book/no-such-chef", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/profile/nobody", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/blog/no-such-post", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/definitely/not/a/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn draft_posts_are_invisible_outside_the_admin() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let admin = app.seed_superuser("root").await;
    let draft = chefbook::queries::blog::create_post(
        &pool, &admin, "Unfinished", "...", None, false,
    )
    .await
    .unwrap();

    let response = app.get(&format!("/blog/{}", draft.id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/blog", None).await;
    let body = common::body_string(response).await;
    assert!(!body.contains("Unfinished"));
}

#[tokio::test]
async fn chef_search_filters_and_tolerates_empty_queries() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let user = app.seed_user("alice").await;
    let carla = app.seed_user("carla").await;
    let diego = app.seed_user("diego").await;
    app.seed_chef(&carla, "Carla Rossi", 25.0).await;
    app.seed_chef(&diego, "Diego Fuentes", 30.0).await;

    let cookie = app.auth_cookie(&user);

    // Empty query lists everyone
    let response = app.get("/chefs?q=", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Carla Rossi"));
    assert!(body.contains("Diego Fuentes"));

    // Case-insensitive substring match
    let response = app.get("/chefs?q=ROSSI", Some(&cookie)).await;
    let body = common::body_string(response).await;
    assert!(body.contains("Carla Rossi"));
    assert!(!body.contains("Diego Fuentes"));

    // No hits is a page, not an error
    let response = app.get("/chefs?q=zzzz", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleted_users_lose_access_on_the_next_request() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let user = app.seed_user("alice").await;
    let cookie = app.auth_cookie(&user);

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    chefbook::queries::user::delete_user(&pool, &user).await.unwrap();

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/login");
}
