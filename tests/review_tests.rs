//! Reviews: one per booking, and one chef response gated on ownership.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn a_booking_gets_at_most_one_review() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let cookie = app.auth_cookie(&customer);
    let body = serde_urlencoded::to_string([("rating", "4"), ("comment", "Great dinner")]).unwrap();

    let response = app
        .post_form(&format!("/reviews/submit/{booking_id}"), &body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let review_url = common::location(&response);
    assert!(review_url.starts_with("/reviews/"));

    // Second attempt redirects to the existing review, no duplicate row
    let body = serde_urlencoded::to_string([("rating", "1"), ("comment", "Changed my mind")]).unwrap();
    let response = app
        .post_form(&format!("/reviews/submit/{booking_id}"), &body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), review_url);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE booking_id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let rating: i64 = sqlx::query_scalar("SELECT rating FROM reviews WHERE booking_id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rating, 4);
}

#[tokio::test]
async fn ratings_outside_one_to_five_are_rejected() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let body = serde_urlencoded::to_string([("rating", "6"), ("comment", "Too good")]).unwrap();
    let response = app
        .post_form(
            &format!("/reviews/submit/{booking_id}"),
            &body,
            Some(&app.auth_cookie(&customer)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn only_the_bookings_customer_may_review_it() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let other = app.seed_user("bob").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let body = serde_urlencoded::to_string([("rating", "1"), ("comment", "Drive-by")]).unwrap();
    let response = app
        .post_form(
            &format!("/reviews/submit/{booking_id}"),
            &body,
            Some(&app.auth_cookie(&other)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/dashboard");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn only_the_owning_chef_may_respond_and_only_once() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let other_chef = app.seed_user("diego").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    app.seed_chef(&other_chef, "Diego", 30.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let review = chefbook::queries::review::create_review(&pool, &booking_id, 5, "Wonderful")
        .await
        .unwrap();

    // A different chef cannot respond
    let body = serde_urlencoded::to_string([("response", "Thanks?")]).unwrap();
    let response = app
        .post_form(
            &format!("/reviews/{}", review.id),
            &body,
            Some(&app.auth_cookie(&other_chef)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chef_responses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // The owning chef can, once
    let body = serde_urlencoded::to_string([("response", "Thank you!")]).unwrap();
    let response = app
        .post_form(
            &format!("/reviews/{}", review.id),
            &body,
            Some(&app.auth_cookie(&chef_owner)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = serde_urlencoded::to_string([("response", "And again")]).unwrap();
    app.post_form(
        &format!("/reviews/{}", review.id),
        &body,
        Some(&app.auth_cookie(&chef_owner)),
    )
    .await;

    let responses: Vec<String> = sqlx::query_scalar("SELECT response FROM chef_responses")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(responses, vec!["Thank you!".to_string()]);
}
