// Caffeine entry handlers
// Logging, daily summary, trend history, edit, delete

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::caffeine_entry::{
        CaffeineEntry, CreateEntryRequest, DailySummaryResponse, DayQuery, DayTotalResponse,
        HistoryQuery, UpdateEntryRequest,
    },
    services::{EntryService, LimitService},
};

/// Log a consumption event
/// POST /v1/entries
#[utoipa::path(
    post,
    path = "/v1/entries",
    tag = "Entries",
    operation_id = "createEntry",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry logged", body = CaffeineEntry),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Referenced drink not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    let service = EntryService::new(state.diesel_pool.clone());

    match service.create_entry(auth_user.user_id, request).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Daily summary for a UTC date (defaults to today)
/// GET /v1/entries/day?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/v1/entries/day",
    tag = "Entries",
    operation_id = "getDailySummary",
    params(DayQuery),
    responses(
        (status = 200, description = "Daily summary", body = DailySummaryResponse),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_daily_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<DayQuery>,
) -> impl IntoResponse {
    let service = EntryService::new(state.diesel_pool.clone());
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    match service.day_summary(auth_user.user_id, date).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Per-day totals for the trailing N days
/// GET /v1/entries/history?days=30
#[utoipa::path(
    get,
    path = "/v1/entries/history",
    tag = "Entries",
    operation_id = "getHistory",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Per-day totals, oldest first", body = [DayTotalResponse]),
        (status = 401, description = "Unauthorized - invalid or missing session")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let service = EntryService::new(state.diesel_pool.clone());
    let limits = LimitService::new(state.diesel_pool.clone());
    let days = query.days.unwrap_or(30);
    let today = Utc::now().date_naive();

    match service.history(&limits, auth_user.user_id, days, today).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit an entry
/// PUT /v1/entries/:id
#[utoipa::path(
    put,
    path = "/v1/entries/{id}",
    tag = "Entries",
    operation_id = "updateEntry",
    params(("id" = Uuid, Path, description = "Entry ID")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated", body = CaffeineEntry),
        (status = 400, description = "Bad request - validation failed"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Entry not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(entry_id): Path<Uuid>,
    Json(request): Json<UpdateEntryRequest>,
) -> impl IntoResponse {
    let service = EntryService::new(state.diesel_pool.clone());

    match service
        .update_entry(auth_user.user_id, entry_id, request)
        .await
    {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an entry
/// DELETE /v1/entries/:id
#[utoipa::path(
    delete,
    path = "/v1/entries/{id}",
    tag = "Entries",
    operation_id = "deleteEntry",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Unauthorized - invalid or missing session"),
        (status = 404, description = "Entry not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EntryService::new(state.diesel_pool.clone());

    match service.delete_entry(auth_user.user_id, entry_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
