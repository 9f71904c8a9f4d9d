//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::web_fetch::{WebFetchParams, fetch_impl};
use crate::tools::web_search::{WebSearchParams, search_impl};

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
use websift_client::WebSearch;

/// The main MCP server handler for websift.
#[derive(Clone)]
pub struct WebsiftServer {
    search: Arc<WebSearch>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl WebsiftServer {
    /// Create a new server handler around a shared search pipeline.
    pub fn new(search: WebSearch) -> Self {
        Self { search: Arc::new(search), tool_router: Self::tool_router() }
    }

    /// Augment a prompt with web search results.
    ///
    /// Results are fetched, trimmed to the word budget and cached for the day.
    #[tool(
        description = "Search the web and prepend the results to a prompt. Returns the augmented prompt and its numbered sources."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.search, params.0).await
    }

    /// Fetch one page and return its extracted text.
    #[tool(description = "Fetch a URL and return its readable text, bounded by a word limit. Returns empty text if the page cannot be fetched.")]
    async fn web_fetch(&self, params: Parameters<WebFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.search, params.0).await
    }
}

impl ServerHandler for WebsiftServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "websift".into(),
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
