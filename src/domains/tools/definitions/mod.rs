//! Tool definitions module.
//!
//! This module exports all available tool definitions, grouped into the four
//! calculator modules. Each tool lives in its own file; no calculator module
//! depends on another.

pub mod common;
pub mod customers;
pub mod inventory;
pub mod products;
pub mod sales;

pub use customers::{ClassifySegmentTool, ClvTool, NextActionTool, RfmScoreTool};
pub use inventory::{InventoryTurnoverTool, ReorderPointTool, SlowMovingTool};
pub use products::{
    BundleDiscountTool, CompareProductsTool, PricePerformanceTool, SuggestAlternativesTool,
};
pub use sales::{
    AbcAnalysisTool, MomGrowthTool, MovingAverageTool, SalesForecastTool, YoyGrowthTool,
};
