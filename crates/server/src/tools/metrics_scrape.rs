//! metrics_scrape tool implementation.
//!
//! Renders every character metric in the Prometheus text format.

use armory_core::PrometheusSink;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};

use crate::error::ArmoryError;

/// Implementation of the metrics_scrape tool.
pub fn scrape_impl(metrics: &PrometheusSink) -> Result<CallToolResult, McpError> {
    let text = metrics.render().map_err(ArmoryError::from)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
