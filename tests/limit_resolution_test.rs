// Effective daily limit resolution against real limit-history rows

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use jolt_backend_core::services::LimitService;
use serial_test::serial;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
#[serial]
async fn test_latest_qualifying_record_wins() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user = common::create_guest(&pool).await;
    let service = LimitService::new(pool.clone());

    // Inserted out of chronological order on purpose
    common::insert_limit(
        &pool,
        user.id,
        100.0,
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    )
    .await;
    common::insert_limit(
        &pool,
        user.id,
        300.0,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    )
    .await;
    common::insert_limit(
        &pool,
        user.id,
        200.0,
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
    )
    .await;

    let limit = service
        .effective_limit(user.id, date(2024, 3, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, Some(300.0));

    // Mid-history date picks the middle record
    let limit = service
        .effective_limit(user.id, date(2024, 2, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, Some(200.0));
}

#[tokio::test]
#[serial]
async fn test_no_qualifying_record_is_none() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user = common::create_guest(&pool).await;
    let service = LimitService::new(pool.clone());

    // No records at all
    let limit = service
        .effective_limit(user.id, date(2024, 3, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, None);

    // A single record strictly after the target date does not apply
    common::insert_limit(
        &pool,
        user.id,
        400.0,
        Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap(),
    )
    .await;

    let limit = service
        .effective_limit(user.id, date(2024, 3, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, None);
}

#[tokio::test]
#[serial]
async fn test_same_day_boundary_is_inclusive() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user = common::create_guest(&pool).await;
    let service = LimitService::new(pool.clone());

    // effective_from exactly at the UTC start of the target date
    common::insert_limit(
        &pool,
        user.id,
        250.0,
        Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
    )
    .await;

    let limit = service
        .effective_limit(user.id, date(2024, 3, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, Some(250.0));

    // A record later the same day does not apply to that date
    let user2 = common::create_guest(&pool).await;
    common::insert_limit(
        &pool,
        user2.id,
        500.0,
        Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 1).unwrap(),
    )
    .await;

    let limit = service
        .effective_limit(user2.id, date(2024, 3, 15))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, None);
}

#[tokio::test]
#[serial]
async fn test_limits_are_scoped_per_user() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user_a = common::create_guest(&pool).await;
    let user_b = common::create_guest(&pool).await;
    let service = LimitService::new(pool.clone());

    common::insert_limit(
        &pool,
        user_a.id,
        400.0,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .await;

    let limit = service
        .effective_limit(user_b.id, date(2024, 6, 1))
        .await
        .expect("Should resolve limit");
    assert_eq!(limit, None);
}

#[tokio::test]
#[serial]
async fn test_limit_history_response_shape() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user = common::create_guest(&pool).await;
    let service = LimitService::new(pool.clone());

    common::insert_limit(
        &pool,
        user.id,
        300.0,
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    )
    .await;
    common::insert_limit(
        &pool,
        user.id,
        400.0,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 12, 0).unwrap(),
    )
    .await;

    let today = Utc::now().date_naive();
    let history = service
        .limit_history(user.id, today)
        .await
        .expect("Should load history");

    assert_eq!(history.current_limit_mg, Some(400.0));
    assert_eq!(history.history.len(), 2);
    // Newest first
    assert_eq!(history.history[0].limit_mg, 400.0);
    assert_eq!(history.history[1].limit_mg, 300.0);
}
