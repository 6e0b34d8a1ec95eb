//! Parser boundary.
//!
//! A parser turns a character name into a [`CharacterSnapshot`]. It may be
//! slow and must not have side effects when it fails. Concrete parsers live
//! in the `armory-client` crate.

use async_trait::async_trait;

use crate::snapshot::CharacterSnapshot;

/// Errors a parser can report.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No save data exists for the name.
    #[error("character not found: {0}")]
    NotFound(String),

    /// Reading save data failed.
    #[error("io error: {0}")]
    Io(String),

    /// Save data exists but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A remote parse service failed.
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Produces snapshots by character name.
#[async_trait]
pub trait Parser: Send + Sync {
    async fn parse(&self, name: &str) -> Result<CharacterSnapshot, ParseError>;
}
