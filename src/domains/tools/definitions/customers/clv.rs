//! Customer lifetime value tool definition.
//!
//! Simple and NPV-discounted lifetime value with tier bucketing.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, require_positive, structured_result};
use crate::domains::tools::ToolError;

/// Parameters for the customer lifetime value tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClvParams {
    /// Average purchase amount.
    pub avg_purchase: f64,

    /// Purchases per year.
    pub purchases_per_year: f64,

    /// Expected relationship length in years (default: 3).
    #[serde(default = "default_lifespan_years")]
    pub lifespan_years: u32,

    /// Profit margin on revenue, 0-1 (default: 0.3).
    #[serde(default = "default_profit_margin")]
    pub profit_margin: f64,

    /// Annual discount rate for the NPV calculation (default: 0.1).
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
}

fn default_lifespan_years() -> u32 {
    3
}

fn default_profit_margin() -> f64 {
    0.3
}

fn default_discount_rate() -> f64 {
    0.1
}

/// Customer lifetime value output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ClvResult {
    pub annual_revenue: f64,

    /// Undiscounted revenue over the lifespan.
    pub simple_clv: f64,

    /// Discounted profit over the lifespan.
    pub npv_clv: f64,

    pub lifespan_years: u32,

    /// "platinum", "gold", "silver" or "bronze", by npv_clv.
    pub tier: String,

    pub analysis: String,
}

fn clv_tier(npv: f64) -> &'static str {
    if npv >= 1_000_000.0 {
        "platinum"
    } else if npv >= 500_000.0 {
        "gold"
    } else if npv >= 200_000.0 {
        "silver"
    } else {
        "bronze"
    }
}

/// Compute simple and NPV lifetime value.
pub fn compute_clv(params: &ClvParams) -> Result<ClvResult, ToolError> {
    require_positive(params.avg_purchase, "avg_purchase")?;
    require_positive(params.purchases_per_year, "purchases_per_year")?;
    if params.lifespan_years < 1 {
        return Err(ToolError::domain_validation(
            "'lifespan_years' must be at least 1",
        ));
    }
    if !params.profit_margin.is_finite()
        || params.profit_margin <= 0.0
        || params.profit_margin > 1.0
    {
        return Err(ToolError::domain_validation(format!(
            "'profit_margin' must be in (0, 1], got {}",
            params.profit_margin
        )));
    }
    if !params.discount_rate.is_finite() || params.discount_rate < 0.0 {
        return Err(ToolError::domain_validation(format!(
            "'discount_rate' must be non-negative, got {}",
            params.discount_rate
        )));
    }

    let annual_revenue = params.avg_purchase * params.purchases_per_year;
    let simple_clv = annual_revenue * f64::from(params.lifespan_years);

    let annual_profit = annual_revenue * params.profit_margin;
    let npv_clv: f64 = (1..=params.lifespan_years)
        .map(|year| annual_profit / (1.0 + params.discount_rate).powi(year as i32))
        .sum();

    let tier = clv_tier(npv_clv);
    let analysis = format!(
        "Annual revenue {:.0}; {}-year value {:.0} undiscounted, {:.0} NPV ({} tier)",
        annual_revenue, params.lifespan_years, simple_clv, npv_clv, tier
    );

    Ok(ClvResult {
        annual_revenue,
        simple_clv,
        npv_clv,
        lifespan_years: params.lifespan_years,
        tier: tier.to_string(),
        analysis,
    })
}

/// Customer lifetime value tool.
pub struct ClvTool;

impl ClvTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "customer_lifetime_value";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Estimate customer lifetime value: annual revenue, undiscounted lifetime revenue, and NPV of profit over the lifespan, with a platinum/gold/silver/bronze tier.";

    /// Execute the tool logic.
    pub fn execute(params: &ClvParams) -> CallToolResult {
        info!(
            "CLV tool called: {} per purchase, {} purchases/year",
            params.avg_purchase, params.purchases_per_year
        );

        match compute_clv(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<ClvParams>(arguments) {
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
            input_schema: cached_schema_for_type::<ClvParams>(),
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
