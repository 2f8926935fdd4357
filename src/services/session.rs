// Session service
// Opaque bearer tokens backed by Redis: the client holds 256 random bits,
// Redis holds session state under the SHA-256 of the token so a Redis dump
// never leaks usable credentials.

use base64::prelude::*;
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{db::RedisPool, models::user::User};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    RedisError(String),

    #[error("Session not found or expired")]
    NotFound,
}

/// Session state stored in Redis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub is_guest: bool,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct SessionService {
    redis_pool: RedisPool,
    ttl: u64,
    guest_ttl: u64,
}

impl SessionService {
    pub fn new(redis_pool: RedisPool, ttl: u64, guest_ttl: u64) -> Self {
        Self {
            redis_pool,
            ttl,
            guest_ttl,
        }
    }

    /// Generate a session token: 32 bytes of entropy, base64url encoded
    pub fn generate_token() -> String {
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        BASE64_URL_SAFE_NO_PAD.encode(token_bytes)
    }

    fn session_key(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("session:{:x}", hasher.finalize())
    }

    /// Create a session for a user and return the raw token
    #[instrument(skip(self, user))]
    pub async fn create_session(&self, user: &User) -> Result<String, SessionError> {
        let token = Self::generate_token();

        let data = SessionData {
            user_id: user.id,
            is_guest: user.is_guest,
            created_at: Utc::now().timestamp(),
        };

        let serialized = serde_json::to_string(&data)
            .map_err(|e| SessionError::RedisError(e.to_string()))?;

        // Guests get a longer window: losing the session is losing the account
        let ttl = if user.is_guest {
            self.guest_ttl
        } else {
            self.ttl
        };

        self.redis_pool
            .set_with_expiry(&Self::session_key(&token), serialized, ttl as usize)
            .await
            .map_err(|e| SessionError::RedisError(e.to_string()))?;

        info!("Created session for user {} (guest: {})", user.id, user.is_guest);
        Ok(token)
    }

    /// Look up the session for a bearer token
    #[instrument(skip(self, token))]
    pub async fn validate(&self, token: &str) -> Result<SessionData, SessionError> {
        let value = self
            .redis_pool
            .get(&Self::session_key(token))
            .await
            .map_err(|e| SessionError::RedisError(e.to_string()))?;

        let Some(raw) = value else {
            return Err(SessionError::NotFound);
        };

        serde_json::from_str(&raw).map_err(|e| {
            warn!("Dropping undecodable session record: {}", e);
            SessionError::NotFound
        })
    }

    /// Revoke a session (logout, or rotation after sign-in)
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        self.redis_pool
            .del(&Self::session_key(token))
            .await
            .map_err(|e| SessionError::RedisError(e.to_string()))
    }
}
