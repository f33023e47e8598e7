//! Business Analytics MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes a
//! fixed catalog of deterministic business-analytics computations as callable
//! tools.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling, and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: analytics tools callable by MCP clients, grouped into four
//!     calculator modules (sales, customers, inventory, products)
//!
//! # Example
//!
//! ```rust,no_run
//! use analytics_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
