// Caffeine entry model - one logged consumption event

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::schema::caffeine_entries;

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Caffeine entry representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = caffeine_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[schema(example = json!({
    "id": "123e4567-e89b-12d3-a456-426614174000",
    "user_id": "123e4567-e89b-12d3-a456-426614174001",
    "drink_id": null,
    "name": "Double espresso",
    "caffeine_mg": 126.0,
    "consumed_at": "2024-03-15T08:30:00Z",
    "created_at": "2024-03-15T08:30:05Z",
    "updated_at": "2024-03-15T08:30:05Z"
}))]
pub struct CaffeineEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub drink_id: Option<Uuid>,
    pub name: String,
    pub caffeine_mg: f64,
    pub consumed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New caffeine entry for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = caffeine_entries)]
pub struct NewCaffeineEntry {
    pub user_id: Uuid,
    pub drink_id: Option<Uuid>,
    pub name: String,
    pub caffeine_mg: f64,
    pub consumed_at: DateTime<Utc>,
}

/// Update caffeine entry fields
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = caffeine_entries)]
pub struct UpdateCaffeineEntry {
    pub name: Option<String>,
    pub caffeine_mg: Option<f64>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request to log a consumption event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Double espresso",
    "caffeine_mg": 126.0,
    "consumed_at": "2024-03-15T08:30:00Z",
    "drink_id": null
}))]
pub struct CreateEntryRequest {
    #[validate(length(max = 120, message = "Name must be less than 120 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, max = 2000.0, message = "Caffeine amount must be 0-2000 mg"))]
    pub caffeine_mg: Option<f64>,

    /// Defaults to the current time when omitted
    pub consumed_at: Option<DateTime<Utc>>,

    /// Optional drink template; fills name and caffeine when they are omitted
    pub drink_id: Option<Uuid>,
}

impl CreateEntryRequest {
    /// Cross-field validation that validator derive cannot express
    pub fn validate_custom(&self) -> Result<(), String> {
        // Without a drink template both fields must be supplied
        if self.drink_id.is_none() {
            if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                return Err("Name is required when no drink is referenced".to_string());
            }
            if self.caffeine_mg.is_none() {
                return Err("Caffeine amount is required when no drink is referenced".to_string());
            }
        }

        Ok(())
    }

    /// Trim and sanitize input fields
    pub fn sanitize(&mut self) {
        self.name = crate::utils::trim_optional_field(self.name.as_ref());
    }
}

/// Request to edit an existing entry
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEntryRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, max = 2000.0, message = "Caffeine amount must be 0-2000 mg"))]
    pub caffeine_mg: Option<f64>,

    pub consumed_at: Option<DateTime<Utc>>,
}

/// Query parameters for the daily summary endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DayQuery {
    /// UTC calendar date (YYYY-MM-DD); defaults to today
    pub date: Option<NaiveDate>,
}

/// Query parameters for the history endpoint
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Number of trailing UTC days to aggregate (1-365); defaults to 30
    pub days: Option<u32>,
}

/// Daily summary response exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "entries": [],
    "daily_total_mg": 450.0,
    "daily_limit_mg": 400.0,
    "over_limit": true,
    "remaining_mg": -50.0
}))]
pub struct DailySummaryResponse {
    pub entries: Vec<CaffeineEntry>,
    pub daily_total_mg: f64,
    pub daily_limit_mg: Option<f64>,
    pub over_limit: bool,
    pub remaining_mg: Option<f64>,
}

/// One day of the consumption trend
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayTotalResponse {
    pub date: NaiveDate,
    pub total_mg: f64,
    pub limit_mg: Option<f64>,
    pub over_limit: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entry_requires_fields_without_drink() {
        let request = CreateEntryRequest {
            name: None,
            caffeine_mg: Some(95.0),
            consumed_at: None,
            drink_id: None,
        };
        assert!(request.validate_custom().is_err());

        let request = CreateEntryRequest {
            name: Some("Filter coffee".to_string()),
            caffeine_mg: None,
            consumed_at: None,
            drink_id: None,
        };
        assert!(request.validate_custom().is_err());

        let request = CreateEntryRequest {
            name: Some("Filter coffee".to_string()),
            caffeine_mg: Some(95.0),
            consumed_at: None,
            drink_id: None,
        };
        assert!(request.validate_custom().is_ok());
    }

    #[test]
    fn test_create_entry_drink_reference_relaxes_fields() {
        let request = CreateEntryRequest {
            name: None,
            caffeine_mg: None,
            consumed_at: None,
            drink_id: Some(Uuid::new_v4()),
        };
        assert!(request.validate_custom().is_ok());
    }

    #[test]
    fn test_caffeine_amount_bounds() {
        let request = CreateEntryRequest {
            name: Some("Suspicious brew".to_string()),
            caffeine_mg: Some(5000.0),
            consumed_at: None,
            drink_id: None,
        };
        assert!(request.validate().is_err());

        let request = CreateEntryRequest {
            name: Some("Decaf".to_string()),
            caffeine_mg: Some(-1.0),
            consumed_at: None,
            drink_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_sanitize_trims_name() {
        let mut request = CreateEntryRequest {
            name: Some("  Cold brew  ".to_string()),
            caffeine_mg: Some(200.0),
            consumed_at: None,
            drink_id: None,
        };
        request.sanitize();
        assert_eq!(request.name.as_deref(), Some("Cold brew"));

        let mut request = CreateEntryRequest {
            name: Some("   ".to_string()),
            caffeine_mg: Some(200.0),
            consumed_at: None,
            drink_id: None,
        };
        request.sanitize();
        assert!(request.name.is_none());
    }
}
