//! RFM scoring tool definition.
//!
//! Maps recency/frequency/monetary inputs into 1-5 buckets via fixed,
//! non-overlapping thresholds.

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

/// Parameters for the RFM score tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RfmScoreParams {
    /// Days since the customer's last purchase.
    pub recency_days: u32,

    /// Number of purchases in the measurement window.
    pub frequency: u32,

    /// Total spend in the measurement window.
    pub monetary: f64,
}

/// RFM scoring output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RfmScoreResult {
    /// 1-5; lower recency (more recent) scores higher.
    pub recency_score: u8,

    /// 1-5; more purchases score higher.
    pub frequency_score: u8,

    /// 1-5; higher spend scores higher.
    pub monetary_score: u8,

    pub average_score: f64,
    pub analysis: String,
}

/// Bucket days-since-last-purchase; fewer days is better.
fn recency_score(days: u32) -> u8 {
    match days {
        0..=7 => 5,
        8..=30 => 4,
        31..=90 => 3,
        91..=180 => 2,
        _ => 1,
    }
}

/// Bucket purchase count.
fn frequency_score(frequency: u32) -> u8 {
    match frequency {
        20.. => 5,
        10..=19 => 4,
        5..=9 => 3,
        2..=4 => 2,
        _ => 1,
    }
}

/// Bucket total spend.
fn monetary_score(monetary: f64) -> u8 {
    if monetary >= 500_000.0 {
        5
    } else if monetary >= 300_000.0 {
        4
    } else if monetary >= 100_000.0 {
        3
    } else if monetary >= 50_000.0 {
        2
    } else {
        1
    }
}

/// Score a customer on all three RFM axes.
pub fn compute_rfm(params: &RfmScoreParams) -> Result<RfmScoreResult, ToolError> {
    if !params.monetary.is_finite() || params.monetary < 0.0 {
        return Err(ToolError::domain_validation(format!(
            "'monetary' must be a non-negative number, got {}",
            params.monetary
        )));
    }

    let r = recency_score(params.recency_days);
    let f = frequency_score(params.frequency);
    let m = monetary_score(params.monetary);
    let average_score = f64::from(u16::from(r) + u16::from(f) + u16::from(m)) / 3.0;

    let analysis = format!(
        "RFM {}-{}-{} (avg {:.1}): last purchase {} days ago, {} purchases, {} spent",
        r, f, m, average_score, params.recency_days, params.frequency, params.monetary
    );

    Ok(RfmScoreResult {
        recency_score: r,
        frequency_score: f,
        monetary_score: m,
        average_score,
        analysis,
    })
}

/// RFM score tool.
pub struct RfmScoreTool;

impl RfmScoreTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "rfm_score";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Score a customer 1-5 on recency, frequency, and monetary value using fixed thresholds. Lower recency-days and higher frequency/spend score higher. Returns the triple plus the average.";

    /// Execute the tool logic.
    pub fn execute(params: &RfmScoreParams) -> CallToolResult {
        info!(
            "RFM score tool called: recency {}d, frequency {}, monetary {}",
            params.recency_days, params.frequency, params.monetary
        );

        match compute_rfm(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<RfmScoreParams>(arguments) {
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
            input_schema: cached_schema_for_type::<RfmScoreParams>(),
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
    use super::*;

    #[test]
    fn test_top_bucket_customer() {
        let params = RfmScoreParams {
            recency_days: 3,
            frequency: 25,
            monetary: 600_000.0,
        };
        let result = compute_rfm(&params).unwrap();
        assert_eq!(result.recency_score, 5);
        assert_eq!(result.frequency_score, 5);
        assert_eq!(result.monetary_score, 5);
        assert_eq!(result.average_score, 5.0);
    }

    #[test]
    fn test_bottom_bucket_customer() {
        let params = RfmScoreParams {
            recency_days: 200,
            frequency: 1,
            monetary: 30_000.0,
        };
        let result = compute_rfm(&params).unwrap();
        assert_eq!(result.recency_score, 1);
        assert_eq!(result.frequency_score, 1);
        assert_eq!(result.monetary_score, 1);
        assert_eq!(result.average_score, 1.0);
    }

    #[test]
    fn test_recency_bucket_boundaries() {
        assert_eq!(recency_score(0), 5);
        assert_eq!(recency_score(7), 5);
        assert_eq!(recency_score(8), 4);
        assert_eq!(recency_score(30), 4);
        assert_eq!(recency_score(31), 3);
        assert_eq!(recency_score(90), 3);
        assert_eq!(recency_score(91), 2);
        assert_eq!(recency_score(180), 2);
        assert_eq!(recency_score(181), 1);
    }

    #[test]
    fn test_frequency_bucket_boundaries() {
        assert_eq!(frequency_score(0), 1);
        assert_eq!(frequency_score(1), 1);
        assert_eq!(frequency_score(2), 2);
        assert_eq!(frequency_score(4), 2);
        assert_eq!(frequency_score(5), 3);
        assert_eq!(frequency_score(9), 3);
        assert_eq!(frequency_score(10), 4);
        assert_eq!(frequency_score(19), 4);
        assert_eq!(frequency_score(20), 5);
    }

    #[test]
    fn test_monetary_bucket_boundaries() {
        assert_eq!(monetary_score(49_999.0), 1);
        assert_eq!(monetary_score(50_000.0), 2);
        assert_eq!(monetary_score(100_000.0), 3);
        assert_eq!(monetary_score(300_000.0), 4);
        assert_eq!(monetary_score(499_999.0), 4);
        assert_eq!(monetary_score(500_000.0), 5);
    }

    #[test]
    fn test_mixed_scores_average() {
        let params = RfmScoreParams {
            recency_days: 10,
            frequency: 6,
            monetary: 120_000.0,
        };
        let result = compute_rfm(&params).unwrap();
        assert_eq!(result.recency_score, 4);
        assert_eq!(result.frequency_score, 3);
        assert_eq!(result.monetary_score, 3);
        assert!((result.average_score - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_monetary_fails() {
        let params = RfmScoreParams {
            recency_days: 5,
            frequency: 5,
            monetary: -1.0,
        };
        assert!(matches!(
            compute_rfm(&params).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }
}
