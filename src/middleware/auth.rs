// Authenticated user representation injected by the session middleware

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user information resolved from a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub is_guest: bool,
    /// Raw session token, kept for rotation and logout
    pub session_token: String,
}
