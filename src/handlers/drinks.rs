// Drink template handlers

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
    models::drink::{CreateDrinkRequest, Drink, UpdateDrinkRequest},
    services::DrinkService,
};

/// List the user's drink templates
/// GET /v1/drinks
#[utoipa::path(
    get,
    path = "/v1/drinks",
    tag = "Drinks",
    operation_id = "listDrinks",
    responses(
        (status = 200, description = "Drink templates, newest first", body = [Drink]),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_drinks(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let service = DrinkService::new(state.diesel_pool.clone());

    match service.list_drinks(auth_user.user_id).await {
        Ok(drinks) => (StatusCode::OK, Json(drinks)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a drink template
/// POST /v1/drinks
#[utoipa::path(
    post,
    path = "/v1/drinks",
    tag = "Drinks",
    operation_id = "createDrink",
    request_body = CreateDrinkRequest,
    responses(
        (status = 201, description = "Drink created", body = Drink),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_drink(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateDrinkRequest>,
) -> impl IntoResponse {
    let service = DrinkService::new(state.diesel_pool.clone());

    match service.create_drink(auth_user.user_id, request).await {
        Ok(drink) => (StatusCode::CREATED, Json(drink)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a drink template
/// PUT /v1/drinks/:id
#[utoipa::path(
    put,
    path = "/v1/drinks/{id}",
    tag = "Drinks",
    operation_id = "updateDrink",
    params(("id" = Uuid, Path, description = "Drink ID")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Drink updated", body = Drink),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Drink not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_drink(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(drink_id): Path<Uuid>,
    Json(request): Json<UpdateDrinkRequest>,
) -> impl IntoResponse {
    let service = DrinkService::new(state.diesel_pool.clone());

    match service
        .update_drink(auth_user.user_id, drink_id, request)
        .await
    {
        Ok(drink) => (StatusCode::OK, Json(drink)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a drink template
/// DELETE /v1/drinks/:id
#[utoipa::path(
    delete,
    path = "/v1/drinks/{id}",
    tag = "Drinks",
    operation_id = "deleteDrink",
    params(("id" = Uuid, Path, description = "Drink ID")),
    responses(
        (status = 204, description = "Drink deleted"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Drink not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_drink(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(drink_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = DrinkService::new(state.diesel_pool.clone());

    match service.delete_drink(auth_user.user_id, drink_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
