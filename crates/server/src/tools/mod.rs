//! MCP tool implementations.
//!
//! This module contains all tools exposed by the armory server.

pub mod character_get;
pub mod character_list;
pub mod metrics_scrape;

pub use character_get::{CharacterGetParams, get_impl};
pub use character_list::{CharacterListParams, list_impl};
pub use metrics_scrape::scrape_impl;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use armory_client::SaveDirParser;
    use armory_core::parser::{ParseError, Parser};
    use armory_core::snapshot::CharacterSnapshot;
    use armory_core::{Orchestrator, PrometheusSink, RecordDb};
    use async_trait::async_trait;
    use rmcp::model::CallToolResult;
    use tempfile::TempDir;

    /// Name whose parse never finishes in time.
    pub const SLOW: &str = "Slowpoke";

    struct FixtureParser {
        saves: SaveDirParser,
    }

    #[async_trait]
    impl Parser for FixtureParser {
        async fn parse(&self, name: &str) -> Result<CharacterSnapshot, ParseError> {
            if name == SLOW {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            self.saves.parse(name).await
        }
    }

    pub struct Fixture {
        pub orchestrator: Orchestrator,
        pub metrics: Arc<PrometheusSink>,
        _dir: TempDir,
    }

    /// Orchestrator over an in-memory store and a save directory holding `Testchar`.
    pub async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Testchar.json"),
            r#"{"header":{"name":"Testchar","class":"sorceress","level":42},"attributes":{"strength":50}}"#,
        )
        .unwrap();

        let parser = Arc::new(FixtureParser { saves: SaveDirParser::new(dir.path()) });
        let store = Arc::new(RecordDb::open_in_memory().await.unwrap());
        let metrics = Arc::new(PrometheusSink::new().unwrap());
        let orchestrator = Orchestrator::new(parser, store, metrics.clone());

        Fixture { orchestrator, metrics, _dir: dir }
    }

    pub fn text_of(result: &CallToolResult) -> String {
        result.content.first().and_then(|c| c.as_text()).map(|t| t.text.clone()).unwrap()
    }
}
