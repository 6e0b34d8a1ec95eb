//! Parser adapters for armory.
//!
//! This crate provides the concrete [`armory_core::Parser`] implementations
//! used by the server: a local save directory and a remote parse service.

pub mod dir;
pub mod http;

use std::sync::Arc;

use armory_core::config::{ArmoryConfig, ConfigError, ParserSource};
use armory_core::parser::Parser;

pub use dir::SaveDirParser;
pub use http::{HttpParser, HttpParserConfig};

/// Build the parser selected by the configuration.
///
/// # Errors
///
/// Returns `ConfigError::Missing` when no parser source is configured and
/// `ConfigError::Invalid` when the parser URL cannot be used.
pub fn from_config(config: &ArmoryConfig) -> Result<Arc<dyn Parser>, ConfigError> {
    match config.parser_source()? {
        ParserSource::Dir(dir) => Ok(Arc::new(SaveDirParser::new(dir))),
        ParserSource::Http(base_url) => {
            let parser = HttpParser::new(HttpParserConfig {
                user_agent: config.user_agent.clone(),
                timeout: config.resolve_timeout(),
                ..HttpParserConfig::new(base_url)
            })
            .map_err(|e| ConfigError::Invalid { field: "parser_url".into(), reason: e.to_string() })?;
            Ok(Arc::new(parser))
        }
    }
}
