//! Cart engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MITHAI_CART_STORAGE_PATH` - Path of the durable cart slot
//!   (default: `mithai-cart.json`)

use std::path::PathBuf;

use thiserror::Error;

/// Default path of the cart slot, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = "mithai-cart.json";

const STORAGE_PATH_VAR: &str = "MITHAI_CART_STORAGE_PATH";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration.
///
/// Built by the composition root and handed to
/// [`JsonFileStorage::from_config`](crate::storage::JsonFileStorage::from_config).
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Path of the durable cart slot.
    pub storage_path: PathBuf,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_value(std::env::var(STORAGE_PATH_VAR).ok())
    }

    /// Build the configuration from an already-read variable value.
    fn from_value(storage_path: Option<String>) -> Result<Self, ConfigError> {
        let storage_path = storage_path.unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_owned());
        if storage_path.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                STORAGE_PATH_VAR.to_owned(),
                "must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            storage_path: PathBuf::from(storage_path),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_path() {
        let config = CartConfig::from_value(None).unwrap();
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_storage_path_override() {
        let config = CartConfig::from_value(Some("/tmp/carts/session.json".to_owned())).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/carts/session.json"));
    }

    #[test]
    fn test_blank_storage_path_rejected() {
        let result = CartConfig::from_value(Some("   ".to_owned()));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
