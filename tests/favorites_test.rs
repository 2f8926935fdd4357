// Favorite uniqueness and ownership scoping

mod common;

use jolt_backend_core::{
    models::favorite::CreateFavoriteRequest, services::FavoriteService,
    utils::service_error::ServiceError,
};
use serial_test::serial;

fn request(name: &str, mg: f64) -> CreateFavoriteRequest {
    CreateFavoriteRequest {
        name: name.to_string(),
        icon: "espresso".to_string(),
        caffeine_mg: mg,
    }
}

#[tokio::test]
#[serial]
async fn test_duplicate_favorite_conflicts() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user = common::create_guest(&pool).await;
    let service = FavoriteService::new(pool.clone());

    service
        .create_favorite(user.id, request("Morning espresso", 63.0))
        .await
        .expect("First save should succeed");

    let result = service
        .create_favorite(user.id, request("Morning espresso", 63.0))
        .await;

    assert!(matches!(result, Err(ServiceError::FavoriteAlreadyExists)));

    // Same name with a different amount is a distinct favorite
    service
        .create_favorite(user.id, request("Morning espresso", 126.0))
        .await
        .expect("Different amount should be allowed");

    assert_eq!(common::favorites_for(&pool, user.id).await.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_same_favorite_for_two_users() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let user_a = common::create_guest(&pool).await;
    let user_b = common::create_guest(&pool).await;
    let service = FavoriteService::new(pool.clone());

    service
        .create_favorite(user_a.id, request("Cold brew", 200.0))
        .await
        .expect("Should save for first user");
    service
        .create_favorite(user_b.id, request("Cold brew", 200.0))
        .await
        .expect("Uniqueness is per user");
}

#[tokio::test]
#[serial]
async fn test_delete_favorite_is_owner_scoped() {
    let Some(pool) = common::setup_test_pool().await else {
        return;
    };

    let owner = common::create_guest(&pool).await;
    let stranger = common::create_guest(&pool).await;
    let service = FavoriteService::new(pool.clone());

    let favorite = service
        .create_favorite(owner.id, request("Flat white", 130.0))
        .await
        .expect("Should save favorite");

    let result = service.delete_favorite(stranger.id, favorite.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound)));

    service
        .delete_favorite(owner.id, favorite.id)
        .await
        .expect("Owner can delete");

    assert!(common::favorites_for(&pool, owner.id).await.is_empty());
}
