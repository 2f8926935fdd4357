use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub redis_url: String,
    pub pool_size: u32,
    pub connection_timeout: Duration,
    pub command_timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl RedisConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let config = crate::app_config::config();
        Self {
            redis_url: config.redis.url.clone(),
            pool_size: config.redis.pool_size,
            connection_timeout: Duration::from_secs(config.redis.connection_timeout),
            command_timeout: Duration::from_secs(config.redis.command_timeout),
            retry_attempts: config.redis.retry_attempts,
            retry_delay: Duration::from_millis(config.redis.retry_delay_ms),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.redis_url.is_empty() {
            return Err("Redis URL cannot be empty".to_string());
        }
        if self.pool_size == 0 {
            return Err("Pool size must be greater than 0".to_string());
        }
        if self.pool_size > 1000 {
            return Err("Pool size too large (max: 1000)".to_string());
        }
        if self.connection_timeout.as_secs() == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.retry_attempts == 0 {
            return Err("Retry attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RedisConfig {
        RedisConfig {
            redis_url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            connection_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = test_config();
        config.redis_url = String::new();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.pool_size = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.pool_size = 5000;
        assert!(config.validate().is_err());
    }
}
