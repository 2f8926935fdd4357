// Magic-link token model
// Single-use sign-in tokens; only the SHA-256 hash is persisted

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::magic_link_tokens;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = magic_link_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MagicLinkToken {
    pub id: Uuid,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = magic_link_tokens)]
pub struct NewMagicLinkToken {
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewMagicLinkToken {
    pub fn new(
        email: String,
        token_hash: String,
        expires_at: DateTime<Utc>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            email,
            token_hash,
            expires_at,
            ip_address,
            user_agent,
        }
    }
}

// Request/Response models for API

#[derive(Debug, Serialize, Deserialize, validator::Validate, ToSchema)]
#[schema(example = json!({ "email": "drinker@example.com" }))]
pub struct MagicLinkRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, validator::Validate, ToSchema)]
#[schema(example = json!({ "token": "y1EJmvuNZKQTcCEizXRRLsRWcCBjXz_pJyv4BJ3BY1k" }))]
pub struct VerifyMagicLinkRequest {
    #[validate(length(min = 32, max = 64, message = "Invalid sign-in token format"))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MagicLinkResponse {
    pub success: bool,
    pub message: String,
}

/// Session + user payload returned by guest creation and verification
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: crate::models::user::User,
}
