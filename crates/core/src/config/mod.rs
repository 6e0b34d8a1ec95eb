//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if ARMORY_CONFIG_FILE set)
//! 3. Environment variables (ARMORY_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserSource {
    /// `<dir>/<name>.json` files on local disk.
    Dir(PathBuf),
    /// A remote parse service answering `GET {base}/{name}`.
    Http(String),
}

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmoryConfig {
    /// Path to the SQLite record database.
    ///
    /// Set via ARMORY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Maximum age of a cached record in seconds. Zero refreshes on every call.
    ///
    /// Set via ARMORY_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-call resolve timeout in milliseconds.
    ///
    /// Set via ARMORY_RESOLVE_TIMEOUT_MS environment variable.
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,

    /// Directory of JSON snapshots, one file per character.
    ///
    /// Set via ARMORY_SAVES_DIR environment variable.
    #[serde(default)]
    pub saves_dir: Option<PathBuf>,

    /// Base URL of a remote parse service.
    ///
    /// Set via ARMORY_PARSER_URL environment variable.
    #[serde(default)]
    pub parser_url: Option<String>,

    /// User-Agent string for parse service requests.
    ///
    /// Set via ARMORY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./armory.sqlite")
}

fn default_cache_ttl_secs() -> u64 {
    180
}

fn default_resolve_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "armory/0.1".into()
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
            saves_dir: None,
            parser_url: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ArmoryConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ARMORY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ARMORY_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The parser to build. A saves directory wins over a parser URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither source is set.
    pub fn parser_source(&self) -> Result<ParserSource, ConfigError> {
        match (&self.saves_dir, &self.parser_url) {
            (Some(dir), _) => Ok(ParserSource::Dir(dir.clone())),
            (None, Some(url)) => Ok(ParserSource::Http(url.clone())),
            (None, None) => Err(ConfigError::Missing {
                field: "saves_dir or parser_url".into(),
                hint: "Set ARMORY_SAVES_DIR or ARMORY_PARSER_URL".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArmoryConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./armory.sqlite"));
        assert_eq!(config.cache_ttl_secs, 180);
        assert_eq!(config.resolve_timeout_ms, 20_000);
        assert_eq!(config.user_agent, "armory/0.1");
        assert!(config.saves_dir.is_none());
        assert!(config.parser_url.is_none());
    }

    #[test]
    fn test_durations() {
        let config = ArmoryConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(180));
        assert_eq!(config.resolve_timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_parser_source_missing() {
        let config = ArmoryConfig::default();
        assert!(matches!(config.parser_source(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_parser_source_prefers_dir() {
        let config = ArmoryConfig {
            saves_dir: Some(PathBuf::from("/srv/saves")),
            parser_url: Some("http://parser.local".into()),
            ..Default::default()
        };
        assert_eq!(config.parser_source().unwrap(), ParserSource::Dir(PathBuf::from("/srv/saves")));
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("ARMORY_SAVES_DIR", "/srv/saves");
            jail.set_env("ARMORY_CACHE_TTL_SECS", "60");

            let config = ArmoryConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.saves_dir, Some(PathBuf::from("/srv/saves")));
            assert_eq!(config.cache_ttl(), Duration::from_secs(60));
            assert_eq!(config.resolve_timeout_ms, 20_000);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "armory.toml",
                r#"
                    parser_url = "http://parser.local"
                    cache_ttl_secs = 30
                    user_agent = "from-file"
                "#,
            )?;
            jail.set_env("ARMORY_CONFIG_FILE", "armory.toml");
            jail.set_env("ARMORY_USER_AGENT", "from-env");

            let config = ArmoryConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.parser_url.as_deref(), Some("http://parser.local"));
            assert_eq!(config.cache_ttl_secs, 30);
            assert_eq!(config.user_agent, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_without_source_fails() {
        Jail::expect_with(|_jail| {
            let result = ArmoryConfig::load();
            assert!(matches!(result, Err(ConfigError::Missing { .. })));
            Ok(())
        });
    }
}
