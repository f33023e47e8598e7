//! Slow-moving inventory tool definition.
//!
//! Classifies stock items as dead, slow-moving, or healthy and sorts them
//! worst-first so the most urgent items lead the report.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, structured_result};
use crate::domains::tools::ToolError;

/// A single stock item to evaluate.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StockItem {
    /// Item identifier (product name, SKU).
    pub name: String,

    /// Units currently on hand.
    pub quantity: f64,

    /// Days since the item entered stock.
    pub days_in_stock: u32,

    /// Units sold per month at the current pace.
    pub monthly_sales: f64,
}

/// Parameters for the slow-moving inventory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SlowMovingParams {
    /// Items to evaluate.
    pub items: Vec<StockItem>,

    /// Days in stock after which an item counts as slow-moving; twice this
    /// marks dead stock (default: 90).
    #[serde(default = "default_threshold_days")]
    pub threshold_days: u32,
}

fn default_threshold_days() -> u32 {
    90
}

/// Stock health, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    DeadStock,
    SlowMoving,
    Healthy,
}

/// One evaluated item.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct EvaluatedItem {
    pub name: String,
    pub quantity: f64,
    pub days_in_stock: u32,
    pub monthly_sales: f64,

    /// Months the current stock lasts at the sales pace; absent when nothing
    /// sells (the stock never runs out).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_of_stock: Option<f64>,

    pub status: StockStatus,
}

/// Slow-moving inventory output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SlowMovingResult {
    /// Items sorted worst-first: dead stock, then slow-moving, then healthy,
    /// longest-stocked first within each class.
    pub items: Vec<EvaluatedItem>,

    pub dead_stock_count: usize,
    pub slow_moving_count: usize,
    pub healthy_count: usize,
    pub analysis: String,
}

/// Months of coverage left at the current sales pace.
fn months_of_stock(item: &StockItem) -> Option<f64> {
    if item.monthly_sales > 0.0 {
        Some(item.quantity / item.monthly_sales)
    } else {
        None
    }
}

/// Classify a single item against the threshold.
fn classify_item(item: &StockItem, threshold_days: u32) -> StockStatus {
    let stalled = item.monthly_sales == 0.0 && item.quantity > 0.0;
    if item.days_in_stock > 2 * threshold_days || stalled {
        return StockStatus::DeadStock;
    }

    let overstocked = months_of_stock(item).is_some_and(|months| months > 6.0);
    if item.days_in_stock > threshold_days || overstocked {
        return StockStatus::SlowMoving;
    }

    StockStatus::Healthy
}

/// Evaluate all items and sort them worst-first.
pub fn compute_slow_moving(params: &SlowMovingParams) -> Result<SlowMovingResult, ToolError> {
    if params.items.is_empty() {
        return Err(ToolError::insufficient_data("no items to evaluate"));
    }
    if params.threshold_days == 0 {
        return Err(ToolError::domain_validation(
            "'threshold_days' must be at least 1",
        ));
    }
    for item in &params.items {
        if !item.quantity.is_finite()
            || item.quantity < 0.0
            || !item.monthly_sales.is_finite()
            || item.monthly_sales < 0.0
        {
            return Err(ToolError::domain_validation(format!(
                "item '{}' has a negative or non-finite quantity or monthly_sales",
                item.name
            )));
        }
    }

    let mut items: Vec<EvaluatedItem> = params
        .items
        .iter()
        .map(|item| EvaluatedItem {
            name: item.name.clone(),
            quantity: item.quantity,
            days_in_stock: item.days_in_stock,
            monthly_sales: item.monthly_sales,
            months_of_stock: months_of_stock(item),
            status: classify_item(item, params.threshold_days),
        })
        .collect();

    items.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then(b.days_in_stock.cmp(&a.days_in_stock))
    });

    let dead_stock_count = items.iter().filter(|i| i.status == StockStatus::DeadStock).count();
    let slow_moving_count = items.iter().filter(|i| i.status == StockStatus::SlowMoving).count();
    let healthy_count = items.len() - dead_stock_count - slow_moving_count;

    let analysis = format!(
        "{} items checked: {} dead stock, {} slow-moving, {} healthy",
        items.len(),
        dead_stock_count,
        slow_moving_count,
        healthy_count
    );

    Ok(SlowMovingResult {
        items,
        dead_stock_count,
        slow_moving_count,
        healthy_count,
        analysis,
    })
}

/// Slow-moving inventory tool.
pub struct SlowMovingTool;

impl SlowMovingTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "slow_moving_inventory";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Classify stock items as dead_stock, slow_moving, or healthy from their age and sales pace, sorted worst-first. Dead stock: no sales with stock on hand, or in stock over twice the threshold.";

    /// Execute the tool logic.
    pub fn execute(params: &SlowMovingParams) -> CallToolResult {
        info!(
            "Slow-moving inventory tool called with {} items",
            params.items.len()
        );

        match compute_slow_moving(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<SlowMovingParams>(arguments) {
            Ok(params) => Self::execute(&params),
            Err(e) => error_result(&format!(
                "invalid arguments for tool '{}': {}",
                Self::NAME,
                e
            )),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SlowMovingParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move { Ok::<_, rmcp::ErrorData>(Self::dispatch(serde_json::Value::Object(args))) }.boxed()
        })
    }
}
