//! character_get tool implementation.
//!
//! Resolves a character through the orchestrator, serving the cached record
//! when it is fresh and refreshing it from the parser otherwise.

use std::time::Duration;

use armory_core::snapshot::CharacterSnapshot;
use armory_core::Orchestrator;
use chrono::SecondsFormat;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ArmoryError;

/// Parameters for the character_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterGetParams {
    /// Character name: letters, optionally one `-` or `_` between them.
    pub name: String,
}

/// Output from the character_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterGetOutput {
    pub id: String,
    /// `cached` or `success`.
    pub status: String,
    /// RFC 3339 time of the last refresh.
    pub last_refreshed_at: String,
    pub snapshot: CharacterSnapshot,
}

/// Implementation of the character_get tool.
///
/// The resolve is cancelled once `timeout` elapses.
pub async fn get_impl(
    orchestrator: &Orchestrator, ttl: Duration, timeout: Duration, params: CharacterGetParams,
) -> Result<CallToolResult, McpError> {
    let cancel = CancellationToken::new();
    let deadline = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        }
    });

    let result = orchestrator.resolve_detailed(&params.name, ttl, &cancel).await;
    deadline.abort();
    let resolved = result.map_err(ArmoryError::from)?;

    let record = resolved.record;
    let output = CharacterGetOutput {
        id: record.id,
        status: resolved.status.as_str().to_string(),
        last_refreshed_at: record.last_refreshed_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        snapshot: record.snapshot,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| ArmoryError::Internal(format!("Failed to serialize character: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{SLOW, fixture, text_of};

    const TTL: Duration = Duration::from_secs(180);
    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_get_impl_resolves_then_caches() {
        let fx = fixture().await;

        let params = CharacterGetParams { name: "Testchar".into() };
        let first = get_impl(&fx.orchestrator, TTL, TIMEOUT, params.clone()).await.unwrap();
        let output: CharacterGetOutput = serde_json::from_str(&text_of(&first)).unwrap();
        assert_eq!(output.id, "Testchar");
        assert_eq!(output.status, "success");
        assert_eq!(output.snapshot.header.level, 42);

        let second = get_impl(&fx.orchestrator, TTL, TIMEOUT, params).await.unwrap();
        let output: CharacterGetOutput = serde_json::from_str(&text_of(&second)).unwrap();
        assert_eq!(output.status, "cached");
    }

    #[tokio::test]
    async fn test_get_impl_invalid_name() {
        let fx = fixture().await;

        let params = CharacterGetParams { name: "test123".into() };
        let err = get_impl(&fx.orchestrator, TTL, TIMEOUT, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_get_impl_unknown_character() {
        let fx = fixture().await;

        let params = CharacterGetParams { name: "Nobody".into() };
        let err = get_impl(&fx.orchestrator, TTL, TIMEOUT, params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_get_impl_times_out() {
        let fx = fixture().await;

        let params = CharacterGetParams { name: SLOW.into() };
        let err = get_impl(&fx.orchestrator, TTL, Duration::from_millis(50), params).await.unwrap_err();
        assert_eq!(err.code.0, -32004);
    }
}
