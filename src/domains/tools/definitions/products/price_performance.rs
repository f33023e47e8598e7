//! Price-performance tool definition.
//!
//! Cost-per-point and a normalized 1-100 value score with a five-band rating.

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

/// Cost-per-point at which a product scores the midpoint value of 50.
const BASELINE_COST_PER_POINT: f64 = 1_000.0;

/// Parameters for the price-performance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PricePerformanceParams {
    /// Product price - must be positive.
    pub price: f64,

    /// Performance score on a 1-100 scale.
    pub score: f64,
}

/// Price-performance output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PricePerformanceResult {
    pub price: f64,
    pub score: f64,

    /// Price paid per performance point.
    pub cost_per_point: f64,

    /// 1-100; 50 means baseline cost-per-point, higher is better value.
    pub value_score: f64,

    /// One of "excellent", "good", "average", "below_average", "poor".
    pub rating: String,

    pub analysis: String,
}

/// Rate a 1-100 value score into five bands.
fn value_rating(value_score: f64) -> &'static str {
    if value_score >= 80.0 {
        "excellent"
    } else if value_score >= 60.0 {
        "good"
    } else if value_score >= 40.0 {
        "average"
    } else if value_score >= 20.0 {
        "below_average"
    } else {
        "poor"
    }
}

/// Compute cost-per-point and the normalized value score.
pub fn compute_price_performance(
    params: &PricePerformanceParams,
) -> Result<PricePerformanceResult, ToolError> {
    if !params.price.is_finite() || params.price <= 0.0 {
        return Err(ToolError::domain_validation(format!(
            "'price' must be positive, got {}",
            params.price
        )));
    }
    if !params.score.is_finite() || !(1.0..=100.0).contains(&params.score) {
        return Err(ToolError::domain_validation(format!(
            "'score' must be between 1 and 100, got {}",
            params.score
        )));
    }

    let cost_per_point = params.price / params.score;
    let value_score = (BASELINE_COST_PER_POINT / cost_per_point * 50.0).clamp(1.0, 100.0);
    let rating = value_rating(value_score);

    let analysis = format!(
        "Cost per performance point {:.1}; value score {:.0}/100 ({})",
        cost_per_point, value_score, rating
    );

    Ok(PricePerformanceResult {
        price: params.price,
        score: params.score,
        cost_per_point,
        value_score,
        rating: rating.to_string(),
        analysis,
    })
}

/// Price-performance tool.
pub struct PricePerformanceTool;

impl PricePerformanceTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "price_performance";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Rate a product's price-performance: cost per performance point and a 1-100 value score (50 = baseline cost-per-point of 1000), banded from excellent to poor.";

    /// Execute the tool logic.
    pub fn execute(params: &PricePerformanceParams) -> CallToolResult {
        info!(
            "Price performance tool called: price {}, score {}",
            params.price, params.score
        );

        match compute_price_performance(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<PricePerformanceParams>(arguments) {
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
            input_schema: cached_schema_for_type::<PricePerformanceParams>(),
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

    fn params(price: f64, score: f64) -> PricePerformanceParams {
        PricePerformanceParams { price, score }
    }

    #[test]
    fn test_baseline_scores_fifty() {
        // 50,000 / 50 points = baseline cost per point
        let result = compute_price_performance(&params(50_000.0, 50.0)).unwrap();
        assert_eq!(result.cost_per_point, 1_000.0);
        assert_eq!(result.value_score, 50.0);
        assert_eq!(result.rating, "average");
    }

    #[test]
    fn test_cheap_and_good_is_excellent() {
        // Half the baseline cost per point doubles the value score
        let result = compute_price_performance(&params(40_000.0, 80.0)).unwrap();
        assert_eq!(result.cost_per_point, 500.0);
        assert_eq!(result.value_score, 100.0);
        assert_eq!(result.rating, "excellent");
    }

    #[test]
    fn test_expensive_and_weak_is_poor() {
        let result = compute_price_performance(&params(100_000.0, 20.0)).unwrap();
        assert_eq!(result.cost_per_point, 5_000.0);
        assert_eq!(result.value_score, 10.0);
        assert_eq!(result.rating, "poor");
    }

    #[test]
    fn test_value_score_is_clamped() {
        // Absurdly good value still caps at 100
        let high = compute_price_performance(&params(100.0, 100.0)).unwrap();
        assert_eq!(high.value_score, 100.0);

        // Absurdly bad value still floors at 1
        let low = compute_price_performance(&params(10_000_000.0, 1.0)).unwrap();
        assert_eq!(low.value_score, 1.0);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(value_rating(85.0), "excellent");
        assert_eq!(value_rating(80.0), "excellent");
        assert_eq!(value_rating(60.0), "good");
        assert_eq!(value_rating(40.0), "average");
        assert_eq!(value_rating(20.0), "below_average");
        assert_eq!(value_rating(19.9), "poor");
    }

    #[test]
    fn test_zero_price_fails() {
        assert!(matches!(
            compute_price_performance(&params(0.0, 50.0)).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }

    #[test]
    fn test_out_of_range_score_fails() {
        assert!(matches!(
            compute_price_performance(&params(1000.0, 0.5)).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
        assert!(matches!(
            compute_price_performance(&params(1000.0, 101.0)).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }
}
