//! Configuration validation rules.
//!
//! Checks `ArmoryConfig` values after they have been loaded from
//! environment, files, or defaults.

use crate::config::ArmoryConfig;
use thiserror::Error;

/// Longest cache ttl accepted, in seconds.
const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl ArmoryConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_secs` exceeds 7 days
    /// - `resolve_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `parser_url` is set but empty
    ///
    /// Returns `ConfigError::Missing` if no parser source is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: format!("must not exceed 7 days ({MAX_CACHE_TTL_SECS}s)"),
            });
        }

        if self.resolve_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "resolve_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.resolve_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "resolve_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.parser_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "parser_url".into(), reason: "must not be empty".into() });
        }

        if self.saves_dir.is_some() && self.parser_url.is_some() {
            tracing::warn!(
                saves_dir = ?self.saves_dir,
                parser_url = ?self.parser_url,
                "Both saves_dir and parser_url are set; saves_dir takes precedence"
            );
        }

        self.parser_source().map(|_| ())
    }
}
