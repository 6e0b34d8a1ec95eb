//! Parser backed by a directory of snapshot files.
//!
//! Each character lives in `<dir>/<name>.json`, holding a serialized
//! [`CharacterSnapshot`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use armory_core::name;
use armory_core::parser::{ParseError, Parser};
use armory_core::snapshot::CharacterSnapshot;
use async_trait::async_trait;

/// Reads snapshots from local JSON files.
#[derive(Debug, Clone)]
pub struct SaveDirParser {
    dir: PathBuf,
}

impl SaveDirParser {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl Parser for SaveDirParser {
    async fn parse(&self, name: &str) -> Result<CharacterSnapshot, ParseError> {
        // Names become file names; anything else could escape the directory.
        if !name::is_valid(name) {
            return Err(ParseError::NotFound(name.to_string()));
        }

        let path = self.path_for(name);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ParseError::NotFound(name.to_string()),
            _ => ParseError::Io(format!("{}: {e}", path.display())),
        })?;

        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| ParseError::Decode(format!("{}: {e}", path.display())))?;

        tracing::debug!(character = name, path = %path.display(), bytes = bytes.len(), "parsed save file");
        Ok(snapshot)
    }
}
