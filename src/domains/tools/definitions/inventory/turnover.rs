//! Inventory turnover tool definition.
//!
//! Turnover ratio with annualization and a five-band rating.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, require_non_negative, structured_result};
use crate::domains::tools::ToolError;

/// Parameters for the inventory turnover tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InventoryTurnoverParams {
    /// Cost of goods sold over the period.
    pub cogs: f64,

    /// Average inventory value over the period - must be positive.
    pub avg_inventory: f64,

    /// Length of the measurement period in days (default: 365).
    #[serde(default = "default_period_days")]
    pub period_days: u32,
}

fn default_period_days() -> u32 {
    365
}

/// Inventory turnover output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct InventoryTurnoverResult {
    /// COGS / average inventory over the period as given.
    pub turnover_ratio: f64,

    /// Ratio scaled to a 365-day year.
    pub annualized_ratio: f64,

    /// Average days an item sits in stock; absent when nothing was sold.
    pub days_sales_of_inventory: Option<f64>,

    /// One of "very_high", "high", "adequate", "slow", "low".
    pub rating: String,

    pub analysis: String,
}

/// Rate an annualized turnover ratio into five bands.
fn turnover_rating(annualized: f64) -> &'static str {
    if annualized >= 12.0 {
        "very_high"
    } else if annualized >= 8.0 {
        "high"
    } else if annualized >= 4.0 {
        "adequate"
    } else if annualized >= 2.0 {
        "slow"
    } else {
        "low"
    }
}

/// Compute the turnover ratio and its rating.
pub fn compute_turnover(
    params: &InventoryTurnoverParams,
) -> Result<InventoryTurnoverResult, ToolError> {
    require_non_negative(params.cogs, "cogs")?;
    if !params.avg_inventory.is_finite() || params.avg_inventory <= 0.0 {
        return Err(ToolError::domain_validation(format!(
            "'avg_inventory' must be positive, got {}",
            params.avg_inventory
        )));
    }
    if params.period_days == 0 {
        return Err(ToolError::domain_validation(
            "'period_days' must be at least 1",
        ));
    }

    let turnover_ratio = params.cogs / params.avg_inventory;
    let annualized_ratio = turnover_ratio * 365.0 / f64::from(params.period_days);
    let days_sales_of_inventory = if turnover_ratio > 0.0 {
        Some(f64::from(params.period_days) / turnover_ratio)
    } else {
        None
    };

    let rating = turnover_rating(annualized_ratio);
    let analysis = match days_sales_of_inventory {
        Some(dsi) => format!(
            "Inventory turns {:.1}x per year ({} turnover); stock covers about {:.0} days of sales",
            annualized_ratio, rating, dsi
        ),
        None => "No goods sold in the period; inventory is not turning at all".to_string(),
    };

    Ok(InventoryTurnoverResult {
        turnover_ratio,
        annualized_ratio,
        days_sales_of_inventory,
        rating: rating.to_string(),
        analysis,
    })
}

/// Inventory turnover tool.
pub struct InventoryTurnoverTool;

impl InventoryTurnoverTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "inventory_turnover";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Calculate the inventory turnover ratio (COGS / average inventory), annualize it, derive days-sales-of-inventory, and rate it from very_high to low.";

    /// Execute the tool logic.
    pub fn execute(params: &InventoryTurnoverParams) -> CallToolResult {
        info!(
            "Inventory turnover tool called: cogs {}, avg inventory {}",
            params.cogs, params.avg_inventory
        );

        match compute_turnover(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<InventoryTurnoverParams>(arguments) {
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
            input_schema: cached_schema_for_type::<InventoryTurnoverParams>(),
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
