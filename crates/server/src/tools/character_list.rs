//! character_list tool implementation.
//!
//! Lists stored characters, most recently refreshed first.

use armory_core::Orchestrator;
use chrono::SecondsFormat;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

/// Parameters for the character_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CharacterListParams {
    /// Maximum number of characters to return (default 50, at most 500).
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterListEntry {
    pub id: String,
    pub last_refreshed_at: String,
}

/// Output from the character_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterListOutput {
    pub characters: Vec<CharacterListEntry>,
}

/// Implementation of the character_list tool.
pub async fn list_impl(orchestrator: &Orchestrator, params: CharacterListParams) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ArmoryError::InvalidInput(format!("limit must be between 1 and {MAX_LIMIT}")).into());
    }

    let summaries = orchestrator.store().list(limit).await.map_err(ArmoryError::from)?;
    let characters = summaries
        .into_iter()
        .map(|s| CharacterListEntry {
            id: s.id,
            last_refreshed_at: s.last_refreshed_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        })
        .collect();

    let json = serde_json::to_string_pretty(&CharacterListOutput { characters })
        .map_err(|e| ArmoryError::Internal(format!("Failed to serialize listing: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
