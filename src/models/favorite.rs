// Favorite model - saved quick-add drink shortcuts
// Unique per (user, name, caffeine amount)

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::favorites;

/// Favorite representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[schema(example = json!({
    "id": "123e4567-e89b-12d3-a456-426614174000",
    "user_id": "123e4567-e89b-12d3-a456-426614174001",
    "name": "Morning espresso",
    "icon": "espresso",
    "caffeine_mg": 63.0,
    "created_at": "2024-01-01T12:00:00Z"
}))]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub caffeine_mg: f64,
    pub created_at: DateTime<Utc>,
}

/// New favorite for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub caffeine_mg: f64,
}

lazy_static! {
    // Icon identifiers are client asset keys, not free text
    static ref ICON_REGEX: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap();
}

/// Request to save a favorite
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Morning espresso",
    "icon": "espresso",
    "caffeine_mg": 63.0
}))]
pub struct CreateFavoriteRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Icon must be 1-50 characters"))]
    #[validate(regex(
        path = "ICON_REGEX",
        message = "Icon can only contain lowercase letters, numbers, hyphens, and underscores"
    ))]
    pub icon: String,

    #[validate(range(min = 0.0, max = 2000.0, message = "Caffeine amount must be 0-2000 mg"))]
    pub caffeine_mg: f64,
}

impl CreateFavoriteRequest {
    /// Trim and sanitize input fields
    pub fn sanitize(&mut self) {
        self.name = self.name.trim().to_string();
        self.icon = self.icon.trim().to_string();
    }
}
