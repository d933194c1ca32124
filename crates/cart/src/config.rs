//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Key the cart snapshot is stored under
//!   (default: `@GoMarketPlace:products`)
//! - `CART_DATA_DIR` - Directory used by the file-backed store
//!   (default: `.gomarketplace`)
//! - `CART_LEGACY_ADD_SNAPSHOT` - Persist the pre-mutation cart on add, as
//!   older mobile builds did (default: `false`)

use std::path::PathBuf;

use thiserror::Error;

/// Storage key used by every released mobile build.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

/// Default directory for the file-backed store.
pub const DEFAULT_DATA_DIR: &str = ".gomarketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which cart snapshot a mutation persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Every mutation persists the cart it produced.
    #[default]
    AfterMutation,
    /// `add_to_cart` persists the cart as it was *before* the add; the other
    /// mutations persist the cart they produced.
    ///
    /// Matches what older mobile builds wrote to device storage.
    PreMutationOnAdd,
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key the cart snapshot is stored under
    pub storage_key: String,
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Which snapshot `add_to_cart` persists
    pub snapshot_policy: SnapshotPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            snapshot_policy: SnapshotPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let data_dir = PathBuf::from(get_env_or_default("CART_DATA_DIR", DEFAULT_DATA_DIR));

        let legacy = get_optional_env("CART_LEGACY_ADD_SNAPSHOT")
            .map(|value| parse_bool("CART_LEGACY_ADD_SNAPSHOT", &value))
            .transpose()?
            .unwrap_or(false);
        let snapshot_policy = if legacy {
            SnapshotPolicy::PreMutationOnAdd
        } else {
            SnapshotPolicy::AfterMutation
        };

        Ok(Self {
            storage_key,
            data_dir,
            snapshot_policy,
        })
    }
}

/// Get an environment variable or return a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional environment variable (returns None if not set or empty).
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false, got {other:?}"),
        )),
    }
}
