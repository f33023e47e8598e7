//! ABC analysis tool definition.
//!
//! Pareto-style classification of items into A/B/C tiers by cumulative
//! contribution to total value.

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

/// A single item entering the classification.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AbcItem {
    /// Item identifier (product name, SKU).
    pub name: String,

    /// Item value (revenue, contribution) - must be non-negative.
    pub value: f64,
}

/// Parameters for the ABC analysis tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AbcAnalysisParams {
    /// Items to classify.
    pub items: Vec<AbcItem>,

    /// Cumulative-share boundary of rank A (default: 0.7).
    #[serde(default = "default_a_threshold")]
    pub a_threshold: f64,

    /// Cumulative-share boundary of rank B (default: 0.9).
    #[serde(default = "default_b_threshold")]
    pub b_threshold: f64,
}

fn default_a_threshold() -> f64 {
    0.7
}

fn default_b_threshold() -> f64 {
    0.9
}

/// One classified item, in descending-value order.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RankedItem {
    pub name: String,
    pub value: f64,

    /// This item's share of the total value.
    pub share: f64,

    /// Running share including this item; non-decreasing down the list.
    pub cumulative_ratio: f64,

    /// "A", "B" or "C".
    pub rank: String,
}

/// ABC analysis output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AbcAnalysisResult {
    pub total_value: f64,
    pub items: Vec<RankedItem>,
    pub a_count: usize,
    pub b_count: usize,
    pub c_count: usize,
    pub analysis: String,
}

/// Classify items into A/B/C tiers.
///
/// Items are sorted descending by value; an item whose cumulative share lands
/// exactly on a threshold takes the better rank.
pub fn compute_abc(params: &AbcAnalysisParams) -> Result<AbcAnalysisResult, ToolError> {
    if params.items.is_empty() {
        return Err(ToolError::insufficient_data("no items to classify"));
    }
    if !(params.a_threshold > 0.0
        && params.a_threshold < params.b_threshold
        && params.b_threshold <= 1.0)
    {
        return Err(ToolError::domain_validation(format!(
            "thresholds must satisfy 0 < a_threshold < b_threshold <= 1, got a={}, b={}",
            params.a_threshold, params.b_threshold
        )));
    }
    for item in &params.items {
        if !item.value.is_finite() || item.value < 0.0 {
            return Err(ToolError::domain_validation(format!(
                "item '{}' has a negative or non-finite value",
                item.name
            )));
        }
    }

    let total_value: f64 = params.items.iter().map(|i| i.value).sum();
    if total_value <= 0.0 {
        return Err(ToolError::domain_validation(
            "total value is zero, nothing to rank",
        ));
    }

    let mut sorted: Vec<AbcItem> = params.items.clone();
    sorted.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));

    let mut cumulative = 0.0;
    let mut a_count = 0;
    let mut b_count = 0;
    let mut c_count = 0;

    let items: Vec<RankedItem> = sorted
        .into_iter()
        .map(|item| {
            cumulative += item.value;
            let cumulative_ratio = cumulative / total_value;
            let rank = if cumulative_ratio <= params.a_threshold {
                a_count += 1;
                "A"
            } else if cumulative_ratio <= params.b_threshold {
                b_count += 1;
                "B"
            } else {
                c_count += 1;
                "C"
            };
            RankedItem {
                share: item.value / total_value,
                cumulative_ratio,
                rank: rank.to_string(),
                name: item.name,
                value: item.value,
            }
        })
        .collect();

    let analysis = format!(
        "{} items ranked: {} A, {} B, {} C over a total value of {}",
        items.len(),
        a_count,
        b_count,
        c_count,
        total_value
    );

    Ok(AbcAnalysisResult {
        total_value,
        items,
        a_count,
        b_count,
        c_count,
        analysis,
    })
}

/// ABC analysis tool.
pub struct AbcAnalysisTool;

impl AbcAnalysisTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "abc_analysis";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Classify items into A/B/C tiers by cumulative contribution to total value (Pareto analysis). Items are sorted descending; rank A covers the top share up to a_threshold, B up to b_threshold, C the rest.";

    /// Execute the tool logic.
    pub fn execute(params: &AbcAnalysisParams) -> CallToolResult {
        info!("ABC analysis tool called with {} items", params.items.len());

        match compute_abc(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<AbcAnalysisParams>(arguments) {
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
            input_schema: cached_schema_for_type::<AbcAnalysisParams>(),
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
