// Daily limit model
// Append-only history: changing the limit always inserts a new row, so the
// limit effective on any past date stays resolvable.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::daily_limits;

/// Daily limit record - never updated in place
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = daily_limits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailyLimit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub limit_mg: f64,
    pub effective_from: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// New daily limit for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_limits)]
pub struct NewDailyLimit {
    pub user_id: Uuid,
    pub limit_mg: f64,
    pub effective_from: DateTime<Utc>,
}

/// Request to set a new daily limit
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "limit_mg": 400.0 }))]
pub struct SetLimitRequest {
    #[validate(range(min = 1.0, max = 5000.0, message = "Daily limit must be 1-5000 mg"))]
    pub limit_mg: f64,
}

/// One record of the limit-change history as exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LimitHistoryEntry {
    pub limit_mg: f64,
    pub effective_from: DateTime<Utc>,
}

/// Limit history response
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "current_limit_mg": 400.0,
    "history": [
        { "limit_mg": 400.0, "effective_from": "2024-03-01T09:12:00Z" },
        { "limit_mg": 300.0, "effective_from": "2024-01-01T08:00:00Z" }
    ]
}))]
pub struct LimitHistoryResponse {
    pub current_limit_mg: Option<f64>,
    pub history: Vec<LimitHistoryEntry>,
}

impl From<&DailyLimit> for LimitHistoryEntry {
    fn from(limit: &DailyLimit) -> Self {
        Self {
            limit_mg: limit.limit_mg,
            effective_from: limit.effective_from,
        }
    }
}
