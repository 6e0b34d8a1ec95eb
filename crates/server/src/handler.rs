//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;
use std::time::Duration;

use armory_core::{Orchestrator, PrometheusSink};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::{CharacterGetParams, CharacterListParams, get_impl, list_impl, scrape_impl};

/// Long-lived state shared by every tool call.
pub struct ArmoryState {
    pub orchestrator: Orchestrator,
    pub metrics: Arc<PrometheusSink>,
    pub cache_ttl: Duration,
    pub resolve_timeout: Duration,
}

/// The main MCP server handler for armory.
#[derive(Clone)]
pub struct ArmoryServer {
    state: Arc<ArmoryState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ArmoryServer {
    /// Create a new server handler.
    pub fn new(state: ArmoryState) -> Self {
        Self { state: Arc::new(state), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Get a character by name. Serves the cached record while it is fresh and re-parses it otherwise."
    )]
    async fn character_get(&self, params: Parameters<CharacterGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.state.orchestrator, self.state.cache_ttl, self.state.resolve_timeout, params.0).await
    }

    #[tool(description = "List stored characters, most recently refreshed first.")]
    async fn character_list(&self, params: Parameters<CharacterListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.state.orchestrator, params.0).await
    }

    #[tool(description = "Render all character metrics in the Prometheus text exposition format.")]
    async fn metrics_scrape(&self) -> Result<CallToolResult, McpError> {
        scrape_impl(&self.state.metrics)
    }
}

impl ServerHandler for ArmoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "armory".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
