// Daily limit handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::daily_limit::{DailyLimit, LimitHistoryResponse, SetLimitRequest},
    services::LimitService,
};

/// Current limit plus the full change history
/// GET /v1/limits
#[utoipa::path(
    get,
    path = "/v1/limits",
    tag = "Limits",
    operation_id = "getLimitHistory",
    responses(
        (status = 200, description = "Limit history", body = LimitHistoryResponse),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_limit_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let service = LimitService::new(state.diesel_pool.clone());
    let today = Utc::now().date_naive();

    match service.limit_history(auth_user.user_id, today).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Set a new daily limit, effective immediately
/// POST /v1/limits
#[utoipa::path(
    post,
    path = "/v1/limits",
    tag = "Limits",
    operation_id = "setLimit",
    request_body = SetLimitRequest,
    responses(
        (status = 201, description = "Limit recorded", body = DailyLimit),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn set_limit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<SetLimitRequest>,
) -> impl IntoResponse {
    let service = LimitService::new(state.diesel_pool.clone());

    match service.set_limit(auth_user.user_id, request).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}
