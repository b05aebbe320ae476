//! Client configuration loaded at construction time.
//!
//! # Environment Variables
//!
//! - `CART_API_BASE_URL` - Base URL of the cart service
//! - `CART_API_KEY` - Bearer token presented on every request
//! - `CART_STORE_ID` - Numeric store (tenant) identifier

use lumexa_core::StoreId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading or client construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid header value for {0}: {1}")]
    InvalidHeader(&'static str, String),
}

/// Cart service connection settings.
///
/// Immutable once constructed; the client holds no other state between
/// calls. Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CartConfig {
    /// Base URL of the cart service (e.g. `https://cart.lumexa.io`).
    pub base_url: Url,
    /// Bearer token presented on every request.
    pub api_key: SecretString,
    /// Store (tenant) the client operates on.
    pub store_id: StoreId,
}

impl std::fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("store_id", &self.store_id)
            .finish()
    }
}

impl CartConfig {
    /// Create a configuration from its parts.
    #[must_use]
    pub fn new(base_url: Url, api_key: impl Into<SecretString>, store_id: StoreId) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            store_id,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CART_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e.to_string())
            })?;

        let api_key = SecretString::from(get_required_env("CART_API_KEY")?);

        let store_id = get_required_env("CART_STORE_ID")?
            .parse::<i64>()
            .map(StoreId::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_STORE_ID".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            api_key,
            store_id,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = CartConfig::new(
            "https://cart.example.com".parse().unwrap(),
            "super-secret-key".to_string(),
            StoreId::new(1),
        );

        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret-key"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("CART_API_KEY".to_string());
        assert_eq!(err.to_string(), "Missing environment variable: CART_API_KEY");
    }
}
