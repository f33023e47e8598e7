//! Reorder point tool definition.
//!
//! Lead-time demand plus safety stock at a ~95% service level, with an
//! optional economic order quantity when the item's unit cost is known.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, require_non_negative, require_positive, structured_result};
use crate::domains::tools::ToolError;

/// z-score for a ~95% service level.
const SERVICE_LEVEL_Z: f64 = 1.65;

/// Parameters for the reorder point tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderPointParams {
    /// Average units sold per day.
    pub daily_demand: f64,

    /// Supplier lead time in days.
    pub lead_time_days: f64,

    /// Days of demand to hold as a safety floor (default: 7).
    #[serde(default = "default_safety_days")]
    pub safety_days: f64,

    /// Relative demand variability, 0-1 (default: 0.2).
    #[serde(default = "default_variability")]
    pub demand_variability: f64,

    /// Unit cost of the item. EOQ is only computed when this is given.
    #[serde(default)]
    pub unit_cost: Option<f64>,

    /// Fixed cost of placing one order (default: 500).
    #[serde(default = "default_order_cost")]
    pub order_cost: f64,

    /// Annual holding cost as a fraction of unit cost (default: 0.25).
    #[serde(default = "default_holding_cost_rate")]
    pub holding_cost_rate: f64,
}

fn default_safety_days() -> f64 {
    7.0
}

fn default_variability() -> f64 {
    0.2
}

fn default_order_cost() -> f64 {
    500.0
}

fn default_holding_cost_rate() -> f64 {
    0.25
}

/// Reorder point output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ReorderPointResult {
    /// Units consumed while waiting for a delivery.
    pub lead_time_demand: f64,

    /// The larger of the safety-days floor and the variability buffer.
    pub safety_stock: f64,

    /// Stock level that should trigger a new order.
    pub reorder_point: f64,

    /// Economic order quantity; present only when unit_cost was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_order_quantity: Option<f64>,

    pub analysis: String,
}

/// Compute the reorder point and, when costed, the EOQ.
pub fn compute_reorder_point(params: &ReorderPointParams) -> Result<ReorderPointResult, ToolError> {
    require_positive(params.daily_demand, "daily_demand")?;
    require_positive(params.lead_time_days, "lead_time_days")?;
    require_non_negative(params.safety_days, "safety_days")?;
    if !params.demand_variability.is_finite()
        || !(0.0..=1.0).contains(&params.demand_variability)
    {
        return Err(ToolError::domain_validation(format!(
            "'demand_variability' must be in [0, 1], got {}",
            params.demand_variability
        )));
    }

    let lead_time_demand = params.daily_demand * params.lead_time_days;

    let floor_stock = params.daily_demand * params.safety_days;
    let variability_stock = SERVICE_LEVEL_Z
        * params.daily_demand
        * params.demand_variability
        * params.lead_time_days.sqrt();
    let safety_stock = floor_stock.max(variability_stock);

    let reorder_point = lead_time_demand + safety_stock;

    let economic_order_quantity = match params.unit_cost {
        Some(unit_cost) => {
            require_positive(unit_cost, "unit_cost")?;
            require_positive(params.order_cost, "order_cost")?;
            require_positive(params.holding_cost_rate, "holding_cost_rate")?;
            let annual_demand = params.daily_demand * 365.0;
            let holding_cost = unit_cost * params.holding_cost_rate;
            Some((2.0 * annual_demand * params.order_cost / holding_cost).sqrt())
        }
        None => None,
    };

    let analysis = format!(
        "Reorder at {:.0} units: {:.0} consumed during the {}-day lead time plus {:.0} safety stock",
        reorder_point, lead_time_demand, params.lead_time_days, safety_stock
    );

    Ok(ReorderPointResult {
        lead_time_demand,
        safety_stock,
        reorder_point,
        economic_order_quantity,
        analysis,
    })
}

/// Reorder point tool.
pub struct ReorderPointTool;

impl ReorderPointTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "reorder_point";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Calculate the inventory reorder point: lead-time demand plus safety stock (95% service level). Supply unit_cost to also get the economic order quantity.";

    /// Execute the tool logic.
    pub fn execute(params: &ReorderPointParams) -> CallToolResult {
        info!(
            "Reorder point tool called: demand {}/day, lead time {} days",
            params.daily_demand, params.lead_time_days
        );

        match compute_reorder_point(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<ReorderPointParams>(arguments) {
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
            input_schema: cached_schema_for_type::<ReorderPointParams>(),
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
