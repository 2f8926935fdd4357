// Drink model - user-defined beverage templates

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::drinks;

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Drink template representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = drinks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[schema(example = json!({
    "id": "123e4567-e89b-12d3-a456-426614174000",
    "user_id": "123e4567-e89b-12d3-a456-426614174001",
    "name": "Flat white",
    "caffeine_mg": 130.0,
    "size_ml": 160.0,
    "created_at": "2024-01-01T12:00:00Z",
    "updated_at": "2024-01-01T12:00:00Z"
}))]
pub struct Drink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub caffeine_mg: f64,
    pub size_ml: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New drink for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = drinks)]
pub struct NewDrink {
    pub user_id: Uuid,
    pub name: String,
    pub caffeine_mg: f64,
    pub size_ml: Option<f64>,
}

/// Update drink fields
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = drinks)]
pub struct UpdateDrink {
    pub name: Option<String>,
    pub caffeine_mg: Option<f64>,
    pub size_ml: Option<Option<f64>>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request to create a drink template
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Flat white",
    "caffeine_mg": 130.0,
    "size_ml": 160.0
}))]
pub struct CreateDrinkRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, max = 2000.0, message = "Caffeine amount must be 0-2000 mg"))]
    pub caffeine_mg: f64,

    #[validate(range(min = 1.0, max = 5000.0, message = "Size must be 1-5000 ml"))]
    pub size_ml: Option<f64>,
}

impl CreateDrinkRequest {
    /// Trim and sanitize input fields
    pub fn sanitize(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

/// Request to update a drink template
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDrinkRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, max = 2000.0, message = "Caffeine amount must be 0-2000 mg"))]
    pub caffeine_mg: Option<f64>,

    pub size_ml: Option<Option<f64>>,
}

// =============================================================================
// TESTS
// =============================================================================
