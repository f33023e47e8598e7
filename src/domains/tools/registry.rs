//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools (the catalog, in registration order)
//! - Name-addressed dispatch with in-band error normalization
//!
//! The name->handler map is a match over each tool's `NAME` constant, so a
//! missing or duplicated registration is caught at compile time or by the
//! tests below rather than at runtime. The registry holds no state; any
//! number of callers may dispatch through it concurrently.

use std::panic::{AssertUnwindSafe, catch_unwind};

use rmcp::model::{CallToolResult, Tool};
use tracing::{error, warn};

use super::definitions::common::error_result;
use super::definitions::{
    AbcAnalysisTool, BundleDiscountTool, ClassifySegmentTool, ClvTool, CompareProductsTool,
    InventoryTurnoverTool, MomGrowthTool, MovingAverageTool, NextActionTool, PricePerformanceTool,
    ReorderPointTool, RfmScoreTool, SalesForecastTool, SlowMovingTool, SuggestAlternativesTool,
    YoyGrowthTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching tool calls by name
#[derive(Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            YoyGrowthTool::NAME,
            MomGrowthTool::NAME,
            MovingAverageTool::NAME,
            AbcAnalysisTool::NAME,
            SalesForecastTool::NAME,
            RfmScoreTool::NAME,
            ClassifySegmentTool::NAME,
            ClvTool::NAME,
            NextActionTool::NAME,
            InventoryTurnoverTool::NAME,
            ReorderPointTool::NAME,
            SlowMovingTool::NAME,
            CompareProductsTool::NAME,
            PricePerformanceTool::NAME,
            SuggestAlternativesTool::NAME,
            BundleDiscountTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for the tool catalog. Both HTTP and
    /// STDIO/TCP transports derive their listings from the same definitions,
    /// and the order here matches `tool_names`.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            YoyGrowthTool::to_tool(),
            MomGrowthTool::to_tool(),
            MovingAverageTool::to_tool(),
            AbcAnalysisTool::to_tool(),
            SalesForecastTool::to_tool(),
            RfmScoreTool::to_tool(),
            ClassifySegmentTool::to_tool(),
            ClvTool::to_tool(),
            NextActionTool::to_tool(),
            InventoryTurnoverTool::to_tool(),
            ReorderPointTool::to_tool(),
            SlowMovingTool::to_tool(),
            CompareProductsTool::to_tool(),
            PricePerformanceTool::to_tool(),
            SuggestAlternativesTool::to_tool(),
            BundleDiscountTool::to_tool(),
        ]
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Every outcome is an in-band `CallToolResult`: unknown names, invalid
    /// arguments, and execution failures come back with `is_error=true`. A
    /// panicking handler is contained here and reported the same way, so one
    /// failing call never takes down the process or affects other calls.
    pub fn call_tool(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        match catch_unwind(AssertUnwindSafe(|| self.dispatch(name, arguments))) {
            Ok(result) => result,
            Err(panic) => {
                error!("Tool '{}' panicked during execution", name);
                error_result(&format!(
                    "error executing tool '{}': {}",
                    name,
                    panic_message(&panic)
                ))
            }
        }
    }

    /// Route a call to the tool matching `name`.
    fn dispatch(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        match name {
            YoyGrowthTool::NAME => YoyGrowthTool::dispatch(arguments),
            MomGrowthTool::NAME => MomGrowthTool::dispatch(arguments),
            MovingAverageTool::NAME => MovingAverageTool::dispatch(arguments),
            AbcAnalysisTool::NAME => AbcAnalysisTool::dispatch(arguments),
            SalesForecastTool::NAME => SalesForecastTool::dispatch(arguments),
            RfmScoreTool::NAME => RfmScoreTool::dispatch(arguments),
            ClassifySegmentTool::NAME => ClassifySegmentTool::dispatch(arguments),
            ClvTool::NAME => ClvTool::dispatch(arguments),
            NextActionTool::NAME => NextActionTool::dispatch(arguments),
            InventoryTurnoverTool::NAME => InventoryTurnoverTool::dispatch(arguments),
            ReorderPointTool::NAME => ReorderPointTool::dispatch(arguments),
            SlowMovingTool::NAME => SlowMovingTool::dispatch(arguments),
            CompareProductsTool::NAME => CompareProductsTool::dispatch(arguments),
            PricePerformanceTool::NAME => PricePerformanceTool::dispatch(arguments),
            SuggestAlternativesTool::NAME => SuggestAlternativesTool::dispatch(arguments),
            BundleDiscountTool::NAME => BundleDiscountTool::dispatch(arguments),
            _ => {
                warn!("Unknown tool requested: {}", name);
                error_result(&format!("unknown tool '{}'", name))
            }
        }
    }
}

/// Best-effort extraction of a panic payload message.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal failure".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::super::definitions::common::{result_json, result_text};
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new();
        let names = registry.tool_names();
        assert_eq!(names.len(), 16);
        assert!(names.contains(&"yoy_growth"));
        assert!(names.contains(&"mom_growth"));
        assert!(names.contains(&"moving_average"));
        assert!(names.contains(&"abc_analysis"));
        assert!(names.contains(&"sales_forecast"));
        assert!(names.contains(&"rfm_score"));
        assert!(names.contains(&"classify_segment"));
        assert!(names.contains(&"customer_lifetime_value"));
        assert!(names.contains(&"recommend_next_action"));
        assert!(names.contains(&"inventory_turnover"));
        assert!(names.contains(&"reorder_point"));
        assert!(names.contains(&"slow_moving_inventory"));
        assert!(names.contains(&"compare_products"));
        assert!(names.contains(&"price_performance"));
        assert!(names.contains(&"suggest_alternatives"));
        assert!(names.contains(&"bundle_discount"));
    }

    #[test]
    fn test_tool_names_are_unique() {
        let registry = ToolRegistry::new();
        let names = registry.tool_names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_catalog_matches_names_in_order() {
        let registry = ToolRegistry::new();
        let catalog: Vec<String> = ToolRegistry::get_all_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        let names: Vec<String> = registry.tool_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(catalog, names);
    }

    #[test]
    fn test_call_known_tool_succeeds() {
        let registry = ToolRegistry::new();
        let result = registry.call_tool(
            "yoy_growth",
            serde_json::json!({"current": 120.0, "previous": 100.0}),
        );
        assert!(!result.is_error.unwrap_or(false));
        let payload = result_json(&result);
        assert_eq!(payload["growth_rate_percent"], serde_json::json!(20.0));
    }

    #[test]
    fn test_call_unknown_tool_is_in_band_error() {
        let registry = ToolRegistry::new();
        let result = registry.call_tool("unknown", serde_json::json!({}));
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("unknown tool 'unknown'"));
    }

    #[test]
    fn test_call_with_bad_arguments_is_in_band_error() {
        let registry = ToolRegistry::new();
        let result = registry.call_tool("rfm_score", serde_json::json!({"recency_days": 5}));
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("invalid arguments for tool 'rfm_score'"));
    }

    #[test]
    fn test_every_tool_rejects_non_object_arguments_gracefully() {
        let registry = ToolRegistry::new();
        for name in registry.tool_names() {
            let result = registry.call_tool(name, serde_json::json!("not an object"));
            assert!(
                result.is_error.unwrap_or(false),
                "tool '{}' accepted a non-object argument",
                name
            );
        }
    }

    #[test]
    fn test_concurrent_calls_match_sequential_results() {
        let inputs: Vec<(f64, f64)> = (1..=32).map(|i| (100.0 + i as f64, i as f64)).collect();

        let sequential: Vec<String> = inputs
            .iter()
            .map(|(current, previous)| {
                let result = ToolRegistry::new().call_tool(
                    "yoy_growth",
                    serde_json::json!({"current": current, "previous": previous}),
                );
                result_text(&result).to_string()
            })
            .collect();

        let handles: Vec<_> = inputs
            .iter()
            .map(|&(current, previous)| {
                std::thread::spawn(move || {
                    let result = ToolRegistry::new().call_tool(
                        "yoy_growth",
                        serde_json::json!({"current": current, "previous": previous}),
                    );
                    result_text(&result).to_string()
                })
            })
            .collect();

        let parallel: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(parallel, sequential);
    }
}
