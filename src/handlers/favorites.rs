// Favorite quick-add handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::favorite::{CreateFavoriteRequest, Favorite},
    services::FavoriteService,
};

/// List the user's favorites
/// GET /v1/favorites
#[utoipa::path(
    get,
    path = "/v1/favorites",
    tag = "Favorites",
    operation_id = "listFavorites",
    responses(
        (status = 200, description = "Favorites, newest first", body = [Favorite]),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let service = FavoriteService::new(state.diesel_pool.clone());

    match service.list_favorites(auth_user.user_id).await {
        Ok(favorites) => (StatusCode::OK, Json(favorites)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Save a favorite
/// POST /v1/favorites
#[utoipa::path(
    post,
    path = "/v1/favorites",
    tag = "Favorites",
    operation_id = "createFavorite",
    request_body = CreateFavoriteRequest,
    responses(
        (status = 201, description = "Favorite saved", body = Favorite),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 409, description = "Conflict - favorite already exists")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFavoriteRequest>,
) -> impl IntoResponse {
    let service = FavoriteService::new(state.diesel_pool.clone());

    match service.create_favorite(auth_user.user_id, request).await {
        Ok(favorite) => (StatusCode::CREATED, Json(favorite)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a favorite
/// DELETE /v1/favorites/:id
#[utoipa::path(
    delete,
    path = "/v1/favorites/{id}",
    tag = "Favorites",
    operation_id = "deleteFavorite",
    params(("id" = Uuid, Path, description = "Favorite ID")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Favorite not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(favorite_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = FavoriteService::new(state.diesel_pool.clone());

    match service.delete_favorite(auth_user.user_id, favorite_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
