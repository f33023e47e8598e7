//! Inventory analysis calculator module.
//!
//! Stock health analytics: turnover rating, reorder points with optional
//! EOQ, and dead/slow-moving stock detection.

pub mod reorder_point;
pub mod slow_moving;
pub mod turnover;

pub use reorder_point::{ReorderPointParams, ReorderPointTool};
pub use slow_moving::{SlowMovingParams, SlowMovingTool};
pub use turnover::{InventoryTurnoverParams, InventoryTurnoverTool};
