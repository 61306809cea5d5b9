//! Retention cleanup: window boundaries, dry-run parity, idempotence, and
//! the system-initiated audit stamp.

use sqlx::Row;
use time::OffsetDateTime;

mod common;

#[tokio::test]
async fn only_bookings_outside_the_window_are_eligible() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;

    let (yesterday, t1) = common::slot_days_from_now(-1);
    let (long_gone, t2) = common::slot_days_from_now(-31);
    let recent = app.seed_booking(&customer, &chef_id, &yesterday, &t1, "Accepted").await;
    let stale = app.seed_booking(&customer, &chef_id, &long_gone, &t2, "Accepted").await;

    let report = chefbook::cleanup::run(&pool, 30, false, OffsetDateTime::now_utc())
        .await
        .unwrap();
    assert_eq!(report.archived, 1);

    let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM bookings WHERE id = ?")
        .bind(&stale)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(is_deleted);

    let is_deleted: bool = sqlx::query_scalar("SELECT is_deleted FROM bookings WHERE id = ?")
        .bind(&recent)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_deleted);
}

#[tokio::test]
async fn dry_run_counts_without_mutating_and_matches_the_live_run() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;

    for days in [-40, -35, -31] {
        let (date, time) = common::slot_days_from_now(days);
        app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;
    }

    let now = OffsetDateTime::now_utc();

    let dry = chefbook::cleanup::run(&pool, 30, true, now).await.unwrap();
    assert!(dry.dry_run);
    assert_eq!(dry.eligible, 3);
    assert_eq!(dry.archived, 0);

    let untouched: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE is_deleted = 0")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(untouched, 3);

    let live = chefbook::cleanup::run(&pool, 30, false, now).await.unwrap();
    assert_eq!(live.eligible, dry.eligible);
    assert_eq!(live.archived, 3);
}

#[tokio::test]
async fn a_second_live_run_finds_nothing_new() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;

    let (date, time) = common::slot_days_from_now(-45);
    app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    let now = OffsetDateTime::now_utc();
    let first = chefbook::cleanup::run(&pool, 30, false, now).await.unwrap();
    assert_eq!(first.archived, 1);

    let second = chefbook::cleanup::run(&pool, 30, false, now).await.unwrap();
    assert_eq!(second.eligible, 0);
    assert_eq!(second.archived, 0);
}

#[tokio::test]
async fn cleanup_stamps_rows_as_system_initiated() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;

    let customer = app.seed_user("alice").await;
    let chef_owner = app.seed_user("carla").await;
    let chef_id = app.seed_chef(&chef_owner, "Carla", 25.0).await;

    let (date, time) = common::slot_days_from_now(-60);
    let by_cleanup = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;
    let by_customer = app.seed_booking(&customer, &chef_id, &date, &time, "Accepted").await;

    // Customer archives one first; cleanup must not restamp it
    let user_delete_at = OffsetDateTime::now_utc() - time::Duration::days(2);
    chefbook::queries::booking::soft_delete_booking(&pool, &by_customer, Some(&customer), user_delete_at)
        .await
        .unwrap();

    let now = OffsetDateTime::now_utc();
    chefbook::cleanup::run(&pool, 30, false, now).await.unwrap();

    let row = sqlx::query("SELECT deleted_at, deleted_by FROM bookings WHERE id = ?")
        .bind(&by_cleanup)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<Option<i64>, _>("deleted_at"), Some(now.unix_timestamp()));
    assert_eq!(row.get::<Option<String>, _>("deleted_by"), None);

    let row = sqlx::query("SELECT deleted_at, deleted_by FROM bookings WHERE id = ?")
        .bind(&by_customer)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(
        row.get::<Option<i64>, _>("deleted_at"),
        Some(user_delete_at.unix_timestamp())
    );
    assert_eq!(row.get::<Option<String>, _>("deleted_by"), Some(customer));
}

#[tokio::test]
async fn zero_eligible_rows_is_not_an_error() {
    let pool = common::setup_test_db().await;

    let report = chefbook::cleanup::run(&pool, 30, false, OffsetDateTime::now_utc())
        .await
        .unwrap();
    assert_eq!(report.eligible, 0);
    assert_eq!(report.archived, 0);
}
