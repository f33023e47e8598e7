//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are deterministic analytics computations that can be called by MCP
//! clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool),
//!   grouped into four calculator modules: sales, customers, inventory, products
//! - `router.rs` - ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in the matching `definitions/` subdirectory
//! 2. Define a params struct, `compute()`, `execute()` and `dispatch()`
//! 3. Export in the module's `mod.rs`
//! 4. Add a route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` (catalog + dispatch match)
//!
//! The registry-matches-router test fails if steps 4 and 5 get out of sync.

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
