//! Moving average tool definition.
//!
//! Sliding-window mean over a series of sales figures, one output per valid
//! window.

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

/// Parameters for the moving average tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MovingAverageParams {
    /// Time-ordered series of sales figures.
    pub values: Vec<f64>,

    /// Window size in data points (default: 3).
    #[serde(default = "default_period")]
    pub period: usize,
}

fn default_period() -> usize {
    3
}

/// Moving average output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MovingAverageResult {
    pub period: usize,
    pub values_count: usize,

    /// One mean per window, `values_count - period + 1` entries.
    pub averages: Vec<f64>,

    /// Sign of the difference between the last two averages.
    pub trend: String,

    pub analysis: String,
}

/// Compute sliding-window means.
pub fn compute_moving_average(
    params: &MovingAverageParams,
) -> Result<MovingAverageResult, ToolError> {
    if params.period < 1 {
        return Err(ToolError::domain_validation("'period' must be at least 1"));
    }
    if params.values.len() < params.period {
        return Err(ToolError::insufficient_data(format!(
            "need at least {} data points for a period of {}, got {}",
            params.period,
            params.period,
            params.values.len()
        )));
    }

    let averages: Vec<f64> = params
        .values
        .windows(params.period)
        .map(|w| w.iter().sum::<f64>() / params.period as f64)
        .collect();

    let trend = if averages.len() >= 2 {
        trend_label(averages[averages.len() - 1] - averages[averages.len() - 2])
    } else {
        "flat"
    };

    let analysis = format!(
        "{}-point moving average over {} values: {} windows, trend {}",
        params.period,
        params.values.len(),
        averages.len(),
        trend
    );

    Ok(MovingAverageResult {
        period: params.period,
        values_count: params.values.len(),
        averages,
        trend: trend.to_string(),
        analysis,
    })
}

/// Moving average tool.
pub struct MovingAverageTool;

impl MovingAverageTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "moving_average";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Calculate the moving average of a sales series for a given window size. Returns one mean per valid window plus the trend of the last two windows.";

    /// Execute the tool logic.
    pub fn execute(params: &MovingAverageParams) -> CallToolResult {
        info!(
            "Moving average tool called: {} values, period {}",
            params.values.len(),
            params.period
        );

        match compute_moving_average(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<MovingAverageParams>(arguments) {
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
            input_schema: cached_schema_for_type::<MovingAverageParams>(),
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

#[cfg(test)]
mod tests {
    use super::super::super::common::result_text;
    use super::*;

    #[test]
    fn test_window_count_and_means() {
        let params = MovingAverageParams {
            values: vec![10.0, 20.0, 30.0, 40.0, 50.0],
            period: 3,
        };
        let result = compute_moving_average(&params).unwrap();
        // len - period + 1 windows
        assert_eq!(result.averages.len(), 3);
        assert_eq!(result.averages, vec![20.0, 30.0, 40.0]);
        assert_eq!(result.trend, "increase");
    }

    #[test]
    fn test_every_window_is_arithmetic_mean() {
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        for period in 1..=values.len() {
            let params = MovingAverageParams {
                values: values.clone(),
                period,
            };
            let result = compute_moving_average(&params).unwrap();
            assert_eq!(result.averages.len(), values.len() - period + 1);
            for (i, avg) in result.averages.iter().enumerate() {
                let expected = values[i..i + period].iter().sum::<f64>() / period as f64;
                assert_eq!(*avg, expected);
            }
        }
    }

    #[test]
    fn test_period_longer_than_series_fails() {
        let params = MovingAverageParams {
            values: vec![1.0, 2.0],
            period: 5,
        };
        let err = compute_moving_average(&params).unwrap_err();
        assert!(matches!(err, ToolError::InsufficientData(_)));
    }

    #[test]
    fn test_zero_period_fails() {
        let params = MovingAverageParams {
            values: vec![1.0, 2.0],
            period: 0,
        };
        let err = compute_moving_average(&params).unwrap_err();
        assert!(matches!(err, ToolError::DomainValidation(_)));
    }

    #[test]
    fn test_single_window_is_flat() {
        let params = MovingAverageParams {
            values: vec![5.0, 7.0],
            period: 2,
        };
        let result = compute_moving_average(&params).unwrap();
        assert_eq!(result.averages, vec![6.0]);
        assert_eq!(result.trend, "flat");
    }

    #[test]
    fn test_default_period_applies() {
        let params: MovingAverageParams =
            serde_json::from_value(serde_json::json!({"values": [1.0, 2.0, 3.0, 4.0]})).unwrap();
        assert_eq!(params.period, 3);
    }

    #[test]
    fn test_execute_insufficient_data_is_error_result() {
        let params = MovingAverageParams {
            values: vec![1.0],
            period: 4,
        };
        let result = MovingAverageTool::execute(&params);
        assert!(result.is_error.unwrap_or(false));
        let text = result_text(&result);
        assert!(text.contains("error executing tool 'moving_average'"));
        assert!(text.contains("Insufficient data"));
    }
}
