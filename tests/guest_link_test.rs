// Guest account linking: ownership transfer, no-op, and rollback guarantees

mod common;

use chrono::Utc;
use jolt_backend_core::services::AccountLinkService;
use serial_test::serial;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn test_link_transfers_all_guest_data() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let guest = common::create_guest(&pool).await;
    let target = common::create_user(&pool, &common::test_email("linker")).await;

    common::insert_entry(&pool, guest.id, "Guest brew", 120.0, Utc::now()).await;
    common::insert_drink(&pool, guest.id, "Guest drink", 80.0).await;
    common::insert_limit(&pool, guest.id, 350.0, Utc::now()).await;
    common::insert_favorite(&pool, guest.id, "Guest favorite", "espresso", 63.0).await;

    let linker = AccountLinkService::new(pool.clone());
    linker
        .link_anonymous_user(guest.id, target.id)
        .await
        .expect("Link should succeed");

    // Everything now belongs to the target
    assert_eq!(common::entries_for(&pool, target.id).await.len(), 1);
    assert_eq!(common::drinks_for(&pool, target.id).await.len(), 1);
    assert_eq!(common::limits_for(&pool, target.id).await.len(), 1);
    assert_eq!(common::favorites_for(&pool, target.id).await.len(), 1);

    // Nothing is left behind and the guest row is gone
    assert!(common::entries_for(&pool, guest.id).await.is_empty());
    assert!(common::drinks_for(&pool, guest.id).await.is_empty());
    assert!(common::limits_for(&pool, guest.id).await.is_empty());
    assert!(common::favorites_for(&pool, guest.id).await.is_empty());
    assert!(common::find_user(&pool, guest.id).await.is_none());

    // The target account itself is untouched
    let target_row = common::find_user(&pool, target.id)
        .await
        .expect("Target should still exist");
    assert!(!target_row.is_guest);
}

#[tokio::test]
#[serial]
async fn test_link_missing_guest_is_noop() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let target = common::create_user(&pool, &common::test_email("noop")).await;
    common::insert_entry(&pool, target.id, "Existing", 90.0, Utc::now()).await;

    let linker = AccountLinkService::new(pool.clone());
    linker
        .link_anonymous_user(Uuid::new_v4(), target.id)
        .await
        .expect("Missing guest should resolve without error");

    // Target data unchanged
    assert_eq!(common::entries_for(&pool, target.id).await.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_link_ignores_non_guest_source() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    // Both accounts authenticated: the source must not be linkable
    let source = common::create_user(&pool, &common::test_email("source")).await;
    let target = common::create_user(&pool, &common::test_email("target")).await;
    common::insert_entry(&pool, source.id, "Keep me", 90.0, Utc::now()).await;

    let linker = AccountLinkService::new(pool.clone());
    linker
        .link_anonymous_user(source.id, target.id)
        .await
        .expect("Non-guest source should be a no-op");

    assert_eq!(common::entries_for(&pool, source.id).await.len(), 1);
    assert!(common::find_user(&pool, source.id).await.is_some());
    assert!(common::entries_for(&pool, target.id).await.is_empty());
}

#[tokio::test]
#[serial]
async fn test_link_to_missing_target_rolls_back() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let guest = common::create_guest(&pool).await;
    common::insert_entry(&pool, guest.id, "Guest brew", 120.0, Utc::now()).await;
    common::insert_drink(&pool, guest.id, "Guest drink", 80.0).await;
    common::insert_limit(&pool, guest.id, 350.0, Utc::now()).await;

    let linker = AccountLinkService::new(pool.clone());
    let result = linker.link_anonymous_user(guest.id, Uuid::new_v4()).await;

    // Foreign keys reject the reassignment
    assert!(result.is_err(), "Linking to a missing target must fail");

    // And nothing was partially moved or deleted
    assert!(common::find_user(&pool, guest.id).await.is_some());
    assert_eq!(common::entries_for(&pool, guest.id).await.len(), 1);
    assert_eq!(common::drinks_for(&pool, guest.id).await.len(), 1);
    assert_eq!(common::limits_for(&pool, guest.id).await.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_link_deduplicates_colliding_favorites() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let guest = common::create_guest(&pool).await;
    let target = common::create_user(&pool, &common::test_email("favs")).await;

    // Same (name, caffeine_mg) on both sides, plus one unique to the guest
    common::insert_favorite(&pool, guest.id, "Morning espresso", "espresso", 63.0).await;
    common::insert_favorite(&pool, guest.id, "Cold brew", "cold-brew", 200.0).await;
    common::insert_favorite(&pool, target.id, "Morning espresso", "espresso", 63.0).await;

    let linker = AccountLinkService::new(pool.clone());
    linker
        .link_anonymous_user(guest.id, target.id)
        .await
        .expect("Link should succeed despite favorite collision");

    let target_favorites = common::favorites_for(&pool, target.id).await;
    assert_eq!(target_favorites.len(), 2);

    let names: Vec<&str> = target_favorites.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"Morning espresso"));
    assert!(names.contains(&"Cold brew"));

    assert!(common::find_user(&pool, guest.id).await.is_none());
}

#[tokio::test]
#[serial]
async fn test_link_is_idempotent_after_success() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let guest = common::create_guest(&pool).await;
    let target = common::create_user(&pool, &common::test_email("twice")).await;
    common::insert_entry(&pool, guest.id, "Guest brew", 120.0, Utc::now()).await;

    let linker = AccountLinkService::new(pool.clone());
    linker
        .link_anonymous_user(guest.id, target.id)
        .await
        .expect("First link should succeed");

    // Second invocation with the now-deleted guest id is a clean no-op
    linker
        .link_anonymous_user(guest.id, target.id)
        .await
        .expect("Repeat link should be a no-op");

    assert_eq!(common::entries_for(&pool, target.id).await.len(), 1);
}
