// Magic-link sign-in service
// Issues single-use email tokens and verifies them with constant-time
// comparison. Only the SHA-256 hash ever reaches the database.

use base64::prelude::*;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{info, instrument};

use crate::{
    db::{DieselPool, RedisPool},
    models::magic_link::{MagicLinkToken, NewMagicLinkToken},
    schema::magic_link_tokens,
    utils::auth_errors::AuthError,
};

/// Minutes a magic link stays valid
const TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Clone)]
pub struct MagicLinkService {
    pool: DieselPool,
    redis_pool: RedisPool,
    resend_limit: u32,
    resend_window: u64,
    min_resend_cooldown: u64,
}

#[derive(Debug)]
pub struct MagicLinkTokenInfo {
    pub token: String,      // Raw token (to send in email)
    pub token_hash: String, // Hashed token (to store in database)
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl MagicLinkService {
    pub fn new(
        pool: DieselPool,
        redis_pool: RedisPool,
        resend_limit: u32,
        resend_window: u64,
        min_resend_cooldown: u64,
    ) -> Self {
        Self {
            pool,
            redis_pool,
            resend_limit,
            resend_window,
            min_resend_cooldown,
        }
    }

    /// Generate a cryptographically secure sign-in token
    pub fn generate_token() -> MagicLinkTokenInfo {
        // 32 bytes of random data (256 bits of entropy)
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);

        // base64url for safe URL transmission
        let token = BASE64_URL_SAFE_NO_PAD.encode(token_bytes);

        // SHA-256 hash for database storage
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let token_hash = format!("{:x}", hasher.finalize());

        let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);

        MagicLinkTokenInfo {
            token,
            token_hash,
            expires_at,
        }
    }

    /// Enforce the per-email cooldown and daily request cap in Redis
    async fn check_request_limits(&self, email: &str) -> Result<(), AuthError> {
        let cooldown_key = format!("magiclink:cooldown:{}", email);
        let count_key = format!("magiclink:count:{}", email);

        if let Some(ttl) = self
            .redis_pool
            .ttl(&cooldown_key)
            .await
            .map_err(|e| AuthError::SessionError(e.to_string()))?
        {
            return Err(AuthError::RateLimited {
                retry_after_seconds: ttl as u64,
            });
        }

        let count = self
            .redis_pool
            .incr(&count_key, self.resend_window as usize)
            .await
            .map_err(|e| AuthError::SessionError(e.to_string()))?;

        if count > i64::from(self.resend_limit) {
            return Err(AuthError::RateLimited {
                retry_after_seconds: self.resend_window,
            });
        }

        self.redis_pool
            .set_with_expiry(
                &cooldown_key,
                "1".to_string(),
                self.min_resend_cooldown as usize,
            )
            .await
            .map_err(|e| AuthError::SessionError(e.to_string()))?;

        Ok(())
    }

    /// Create a sign-in request for an email address
    ///
    /// Tokens are not tied to an existing user: the account is created (or
    /// looked up) only when the link is verified, so requesting a link never
    /// reveals whether an address has an account.
    #[instrument(skip(self))]
    pub async fn create_signin_request(
        &self,
        email: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<MagicLinkTokenInfo, AuthError> {
        let email = email.trim().to_lowercase();

        self.check_request_limits(&email).await?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let token_info = Self::generate_token();

        // Purge older tokens for this address (prevent token accumulation)
        diesel::delete(magic_link_tokens::table.filter(magic_link_tokens::email.eq(&email)))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                AuthError::DatabaseError(format!("Failed to clean existing tokens: {}", e))
            })?;

        let new_token = NewMagicLinkToken::new(
            email.clone(),
            token_info.token_hash.clone(),
            token_info.expires_at,
            ip_address,
            user_agent,
        );

        diesel::insert_into(magic_link_tokens::table)
            .values(&new_token)
            .execute(&mut conn)
            .await
            .map_err(|e| {
                AuthError::DatabaseError(format!("Failed to create sign-in token: {}", e))
            })?;

        info!("Magic-link token created for {}", email);

        Ok(token_info)
    }

    /// Validate and consume a sign-in token, returning the email it was
    /// issued for. Uses constant-time comparison against active token hashes.
    #[instrument(skip(self, token))]
    pub async fn validate_and_consume_token(&self, token: &str) -> Result<String, AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Database connection failed: {}", e)))?;

        // Hash the provided token
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let provided_token_hash = format!("{:x}", hasher.finalize());

        // Active tokens only: unused and unexpired
        let active_tokens: Vec<MagicLinkToken> = magic_link_tokens::table
            .filter(magic_link_tokens::used_at.is_null())
            .filter(magic_link_tokens::expires_at.gt(Utc::now()))
            .load(&mut conn)
            .await
            .map_err(|e| {
                AuthError::DatabaseError(format!("Failed to load sign-in tokens: {}", e))
            })?;

        // Constant-time comparison to find the matching token
        let mut found_token: Option<MagicLinkToken> = None;
        for token_record in active_tokens {
            let is_match = provided_token_hash
                .as_bytes()
                .ct_eq(token_record.token_hash.as_bytes());

            if is_match.into() {
                found_token = Some(token_record);
                break;
            }
        }

        let signin_token = found_token.ok_or(AuthError::InvalidToken)?;

        // Mark the token as used
        diesel::update(magic_link_tokens::table.find(signin_token.id))
            .set(magic_link_tokens::used_at.eq(Utc::now()))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                AuthError::DatabaseError(format!("Failed to mark token as used: {}", e))
            })?;

        info!(
            "Magic-link token consumed for {} (created: {:?})",
            signin_token.email, signin_token.created_at
        );

        Ok(signin_token.email)
    }

    /// Clean up expired tokens (should be called periodically)
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let deleted_count = diesel::delete(
            magic_link_tokens::table.filter(magic_link_tokens::expires_at.lt(Utc::now())),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Failed to cleanup expired tokens: {}", e)))?;

        if deleted_count > 0 {
            info!("Cleaned up {} expired magic-link tokens", deleted_count);
        }

        Ok(deleted_count as u64)
    }
}
