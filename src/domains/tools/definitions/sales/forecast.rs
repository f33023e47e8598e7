//! Sales forecast tool definition.
//!
//! Ordinary-least-squares linear fit over the history's index positions,
//! extrapolated a requested number of periods ahead.

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

/// Parameters for the sales forecast tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SalesForecastParams {
    /// Time-ordered historical sales figures, oldest first.
    pub history: Vec<f64>,

    /// How many periods past the end of the history to forecast (default: 1).
    #[serde(default = "default_periods_ahead")]
    pub periods_ahead: usize,
}

fn default_periods_ahead() -> usize {
    1
}

/// A single forecasted point.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ForecastPoint {
    /// 1-based period index, continuing the history's numbering.
    pub period: usize,
    pub value: f64,
}

/// Sales forecast output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SalesForecastResult {
    pub history_length: usize,
    pub intercept: f64,
    pub slope: f64,

    /// One of "increase", "decrease", "flat" - the sign of the fitted slope.
    pub trend: String,

    pub forecasts: Vec<ForecastPoint>,
    pub analysis: String,
}

/// Fit y = intercept + slope * x over x = 1..n and extrapolate.
pub fn compute_forecast(params: &SalesForecastParams) -> Result<SalesForecastResult, ToolError> {
    let n = params.history.len();
    if n < 2 {
        return Err(ToolError::insufficient_data(format!(
            "need at least 2 historical points to fit a trend, got {}",
            n
        )));
    }
    if params.periods_ahead < 1 {
        return Err(ToolError::domain_validation(
            "'periods_ahead' must be at least 1",
        ));
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, y) in params.history.iter().enumerate() {
        let x = (i + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    // The denominator is n * variance of 1..n, never zero for n >= 2.
    let slope = (n_f * sum_xy - sum_x * sum_y) / (n_f * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n_f;

    let forecasts: Vec<ForecastPoint> = (1..=params.periods_ahead)
        .map(|i| ForecastPoint {
            period: n + i,
            value: intercept + slope * (n + i) as f64,
        })
        .collect();

    let trend = trend_label(slope);
    let analysis = format!(
        "Linear fit over {} periods (slope {:.2}, {}); next period forecast: {:.2}",
        n, slope, trend, forecasts[0].value
    );

    Ok(SalesForecastResult {
        history_length: n,
        intercept,
        slope,
        trend: trend.to_string(),
        forecasts,
        analysis,
    })
}

/// Sales forecast tool.
pub struct SalesForecastTool;

impl SalesForecastTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "sales_forecast";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Forecast future sales with an ordinary-least-squares linear fit over the historical series. Requires at least 2 points; returns intercept, slope, trend, and one forecast per requested period.";

    /// Execute the tool logic.
    pub fn execute(params: &SalesForecastParams) -> CallToolResult {
        info!(
            "Sales forecast tool called: {} points, {} periods ahead",
            params.history.len(),
            params.periods_ahead
        );

        match compute_forecast(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<SalesForecastParams>(arguments) {
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
            input_schema: cached_schema_for_type::<SalesForecastParams>(),
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
