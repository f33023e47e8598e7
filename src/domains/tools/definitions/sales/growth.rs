//! Year-over-year and month-over-month growth tools.
//!
//! Both tools share one computation; only the period label differs. The
//! growth rate is reported exactly (no rounding) so callers can do their own
//! arithmetic on it.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, structured_result, trend_label};
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the growth-rate tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GrowthParams {
    /// Sales figure for the current period.
    pub current: f64,

    /// Sales figure for the previous period.
    pub previous: f64,
}

/// Growth computation output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GrowthResult {
    pub current: f64,
    pub previous: f64,
    pub difference: f64,

    /// Percentage growth rate. `null` when the previous period was zero and
    /// the current one is positive (the rate is undefined, not infinite-ish).
    pub growth_rate_percent: Option<f64>,

    /// One of "increase", "decrease", "flat".
    pub trend: String,

    /// Human-readable summary.
    pub analysis: String,
}

/// Compute a period-over-period growth rate.
///
/// `previous == 0` makes the percentage undefined; we report `None` when
/// there is actual growth from a zero base and `0` when both are zero.
pub fn compute_growth(params: &GrowthParams, period: &str) -> Result<GrowthResult, ToolError> {
    let difference = params.current - params.previous;

    let growth_rate_percent = if params.previous == 0.0 {
        if params.current > 0.0 { None } else { Some(0.0) }
    } else {
        Some(difference / params.previous * 100.0)
    };

    let trend = trend_label(difference);

    let analysis = match growth_rate_percent {
        Some(rate) => format!(
            "{} sales: {} of {:.1}% ({} -> {})",
            period, trend, rate.abs(), params.previous, params.current
        ),
        None => format!(
            "{} sales: growth from a zero base to {} (rate undefined)",
            period, params.current
        ),
    };

    Ok(GrowthResult {
        current: params.current,
        previous: params.previous,
        difference,
        growth_rate_percent,
        trend: trend.to_string(),
        analysis,
    })
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Year-over-year growth tool.
pub struct YoyGrowthTool;

impl YoyGrowthTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "yoy_growth";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Calculate year-over-year sales growth: difference, signed growth rate percentage, and trend (increase/decrease/flat). The rate is null when the previous year was zero.";

    /// Execute the tool logic.
    pub fn execute(params: &GrowthParams) -> CallToolResult {
        info!("YoY growth tool called: {} vs {}", params.current, params.previous);

        match compute_growth(params, "Year-over-year") {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<GrowthParams>(arguments) {
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
            input_schema: cached_schema_for_type::<GrowthParams>(),
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

/// Month-over-month growth tool.
pub struct MomGrowthTool;

impl MomGrowthTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "mom_growth";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Calculate month-over-month sales growth: difference, signed growth rate percentage, and trend (increase/decrease/flat). The rate is null when the previous month was zero.";

    /// Execute the tool logic.
    pub fn execute(params: &GrowthParams) -> CallToolResult {
        info!("MoM growth tool called: {} vs {}", params.current, params.previous);

        match compute_growth(params, "Month-over-month") {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<GrowthParams>(arguments) {
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
            input_schema: cached_schema_for_type::<GrowthParams>(),
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

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::super::common::{result_json, result_text};
    use super::*;

    #[test]
    fn test_growth_rate_is_exact() {
        let params = GrowthParams {
            current: 120.0,
            previous: 100.0,
        };
        let result = compute_growth(&params, "Year-over-year").unwrap();
        assert_eq!(result.growth_rate_percent, Some(20.0));
        assert_eq!(result.difference, 20.0);
        assert_eq!(result.trend, "increase");
    }

    #[test]
    fn test_growth_rate_matches_formula() {
        let cases = [(150.0, 120.0), (80.0, 100.0), (33.0, 7.0), (1.0, 3.0)];
        for (current, previous) in cases {
            let result = compute_growth(&GrowthParams { current, previous }, "x").unwrap();
            assert_eq!(
                result.growth_rate_percent,
                Some((current - previous) / previous * 100.0)
            );
        }
    }

    #[test]
    fn test_decrease_has_negative_rate() {
        let params = GrowthParams {
            current: 75.0,
            previous: 100.0,
        };
        let result = compute_growth(&params, "Month-over-month").unwrap();
        assert_eq!(result.growth_rate_percent, Some(-25.0));
        assert_eq!(result.trend, "decrease");
    }

    #[test]
    fn test_zero_previous_positive_current_is_undefined() {
        let params = GrowthParams {
            current: 500.0,
            previous: 0.0,
        };
        let result = compute_growth(&params, "Year-over-year").unwrap();
        assert_eq!(result.growth_rate_percent, None);
        assert_eq!(result.trend, "increase");
    }

    #[test]
    fn test_zero_previous_zero_current_is_zero_rate() {
        let params = GrowthParams {
            current: 0.0,
            previous: 0.0,
        };
        let result = compute_growth(&params, "Year-over-year").unwrap();
        assert_eq!(result.growth_rate_percent, Some(0.0));
        assert_eq!(result.trend, "flat");
    }

    #[test]
    fn test_execute_wraps_single_json_payload() {
        let params = GrowthParams {
            current: 110.0,
            previous: 100.0,
        };
        let result = YoyGrowthTool::execute(&params);
        assert_eq!(result.content.len(), 1);
        let payload = result_json(&result);
        assert_eq!(payload["growth_rate_percent"], serde_json::json!(10.0));
        assert!(payload["analysis"].as_str().unwrap().contains("increase"));
    }

    #[test]
    fn test_dispatch_missing_field_is_invalid_arguments() {
        let result = MomGrowthTool::dispatch(serde_json::json!({"current": 100.0}));
        assert!(result.is_error.unwrap_or(false));
        let text = result_text(&result);
        assert!(text.contains("invalid arguments for tool 'mom_growth'"));
    }

    #[test]
    fn test_dispatch_wrong_type_is_invalid_arguments() {
        let result =
            YoyGrowthTool::dispatch(serde_json::json!({"current": "abc", "previous": 100.0}));
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("invalid arguments for tool 'yoy_growth'"));
    }
}
