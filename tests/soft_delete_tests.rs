//! Archival: self-service removal, bulk clear, idempotence, and the
//! admin-only hard delete.

use axum::http::StatusCode;
use sqlx::Row;
use time::OffsetDateTime;

mod common;

#[tokio::test]
async fn customer_can_remove_their_past_booking() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let response = app
        .post_form(
            &format!("/bookings/remove/{booking_id}"),
            "",
            Some(&app.auth_cookie(&customer)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let row = sqlx::query("SELECT is_deleted, deleted_at, deleted_by FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(row.get::<bool, _>("is_deleted"));
    assert!(row.get::<Option<i64>, _>("deleted_at").is_some());
    assert_eq!(row.get::<Option<String>, _>("deleted_by"), Some(customer));
}

#[tokio::test]
async fn upcoming_bookings_cannot_be_removed() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(5);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Pending").await;

    let response = app
        .post_form(
            &format!("/bookings/remove/{booking_id}"),
            "",
            Some(&app.auth_cookie(&customer)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_deleted);
}

#[tokio::test]
async fn non_owner_cannot_remove_someone_elses_booking() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let other = app.seed_user("bob").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let response = app
        .post_form(
            &format!("/bookings/remove/{booking_id}"),
            "",
            Some(&app.auth_cookie(&other)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/dashboard");

    let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_deleted);
}

#[tokio::test]
async fn soft_delete_is_idempotent_and_keeps_the_first_stamp() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let admin = app.seed_superuser("root").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let first_now = OffsetDateTime::now_utc() - time::Duration::hours(1);
    let changed =
        chefbook::queries::booking::soft_delete_booking(&pool, &booking_id, Some(&customer), first_now)
            .await
            .unwrap();
    assert!(changed);

    // Second archival attempt, by someone else and later, is a no-op
    let changed = chefbook::queries::booking::soft_delete_booking(
        &pool,
        &booking_id,
        Some(&admin),
        OffsetDateTime::now_utc(),
    )
    .await
    .unwrap();
    assert!(!changed);

    let row = sqlx::query("SELECT deleted_at, deleted_by FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<Option<i64>, _>("deleted_at"), Some(first_now.unix_timestamp()));
    assert_eq!(row.get::<Option<String>, _>("deleted_by"), Some(customer));
}

#[tokio::test]
async fn clear_past_archives_only_the_callers_past_bookings() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let other = app.seed_user("bob").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;

    let (past1, t1) = common::slot_days_from_now(-10);
    let (past2, t2) = common::slot_days_from_now(-1);
    let (future, t3) = common::slot_days_from_now(3);
    app.seed_booking(&customer, &chef_id, &past1, &t1, "Accepted").await;
    app.seed_booking(&customer, &chef_id, &past2, &t2, "Rejected").await;
    let upcoming = app.seed_booking(&customer, &chef_id, &future, &t3, "Pending").await;
    let others_past = app.seed_booking(&other, &chef_id, &past1, &t1, "Accepted").await;

    let response = app
        .post_form("/bookings/clear-past", "", Some(&app.auth_cookie(&customer)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let archived: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE customer_id = ? AND is_deleted = 1")
            .bind(&customer)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(archived, 2);

    for id in [&upcoming, &others_past] {
        let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(!is_deleted);
    }
}

#[tokio::test]
async fn hard_delete_requires_a_prior_archive() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let admin = app.seed_superuser("root").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(-2);

    let active = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;
    let archived = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;
    chefbook::queries::booking::soft_delete_booking(
        &pool,
        &archived,
        Some(&customer),
        OffsetDateTime::now_utc(),
    )
    .await
    .unwrap();

    let cookie = app.auth_cookie(&admin);

    // Active row: refused, row survives
    let response = app
        .post_form(&format!("/myadmin/bookings/hard-delete/{active}"), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE id = ?")
        .bind(&active)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Archived row: permanently removed
    let response = app
        .post_form(&format!("/myadmin/bookings/hard-delete/{archived}"), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE id = ?")
        .bind(&archived)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn admin_archive_ignores_the_past_only_rule() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let admin = app.seed_superuser("root").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;
    let (date, time) = common::slot_days_from_now(5);
    let booking_id = app.seed_booking(&customer, &chef_id, &date, &time, "Pending").await;

    let response = app
        .post_form(
            &format!("/myadmin/bookings/delete/{booking_id}"),
            "",
            Some(&app.auth_cookie(&admin)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let row = sqlx::query("SELECT is_deleted, deleted_by FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(row.get::<bool, _>("is_deleted"));
    assert_eq!(row.get::<Option<String>, _>("deleted_by"), Some(admin));
}
