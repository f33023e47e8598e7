//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (typed argument contract, also the catalog inputSchema)
//! - `execute()` / `dispatch()` methods (core logic + argument validation)
//!
//! The ToolRouter is built in `domains/tools/router.rs` and the HTTP dispatch
//! path goes through `domains/tools/registry.rs`. Adding a new tool does NOT
//! require modifying this file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. All state is
/// immutable after construction: the configuration behind an `Arc` and the
/// tool router built once from the registry. Cloning is cheap and every clone
/// may serve calls concurrently with no cross-call interference.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(),
            config: Arc::new(config),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    ///
    /// Order is stable and matches registration order, so repeated catalog
    /// queries produce identical output.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Dispatches through the ToolRegistry. Every outcome is reported in-band:
    /// unknown tools, invalid arguments, and execution faults all come back as
    /// a result object with `isError: true`, never as an Err.
    #[cfg(feature = "http")]
    pub fn call_tool(&self, name: &str, arguments: serde_json::Value) -> serde_json::Value {
        let result = ToolRegistry::new().call_tool(name, arguments);

        serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Business analytics MCP server. Provides deterministic sales, customer, \
                 inventory, and product-comparison computations as tools."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
