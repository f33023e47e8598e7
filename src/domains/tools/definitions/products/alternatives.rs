//! Alternative-product suggestion tool definition.
//!
//! Scores candidates against a base product on category, price proximity,
//! and feature overlap, then ranks them.

use std::collections::HashSet;

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

/// Maximum points awarded per scoring dimension.
const CATEGORY_POINTS: f64 = 30.0;
const PRICE_POINTS_CLOSE: f64 = 30.0;
const PRICE_POINTS_NEAR: f64 = 20.0;
const PRICE_POINTS_FAR: f64 = 10.0;
const FEATURE_POINTS: f64 = 40.0;

/// A product considered as an alternative.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CandidateProduct {
    pub name: String,
    pub category: String,
    pub price: f64,

    /// Feature labels used for overlap scoring.
    #[serde(default)]
    pub features: Vec<String>,
}

/// Parameters for the alternative-suggestion tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SuggestAlternativesParams {
    /// The product to find alternatives for.
    pub base: CandidateProduct,

    /// Candidate products to score and rank.
    pub candidates: Vec<CandidateProduct>,
}

/// One scored candidate.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ScoredCandidate {
    pub name: String,
    pub category: String,
    pub price: f64,

    /// 0-100 composite: 30 category + up to 30 price proximity + up to 40
    /// feature overlap.
    pub score: f64,

    pub category_match: bool,

    /// Jaccard overlap of the feature sets, 0-1.
    pub feature_overlap: f64,
}

/// Alternative-suggestion output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SuggestAlternativesResult {
    pub base: String,

    /// Candidates in descending score order.
    pub ranked: Vec<ScoredCandidate>,

    /// Name of the highest-scoring candidate.
    pub top_pick: String,

    pub analysis: String,
}

/// Jaccard similarity of two feature lists. Empty-vs-empty counts as zero
/// overlap rather than a perfect match.
fn feature_overlap(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: HashSet<&str> = b.iter().map(|s| s.as_str()).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Points for price proximity to the base price.
fn price_proximity_points(base_price: f64, candidate_price: f64) -> f64 {
    let deviation = (candidate_price - base_price).abs() / base_price;
    if deviation <= 0.2 {
        PRICE_POINTS_CLOSE
    } else if deviation <= 0.4 {
        PRICE_POINTS_NEAR
    } else if deviation <= 0.6 {
        PRICE_POINTS_FAR
    } else {
        0.0
    }
}

/// Score and rank candidates against the base product.
pub fn compute_alternatives(
    params: &SuggestAlternativesParams,
) -> Result<SuggestAlternativesResult, ToolError> {
    if params.candidates.is_empty() {
        return Err(ToolError::insufficient_data("no candidates to rank"));
    }
    if !params.base.price.is_finite() || params.base.price <= 0.0 {
        return Err(ToolError::domain_validation(format!(
            "'base.price' must be positive, got {}",
            params.base.price
        )));
    }
    for candidate in &params.candidates {
        if !candidate.price.is_finite() || candidate.price < 0.0 {
            return Err(ToolError::domain_validation(format!(
                "candidate '{}' has a negative or non-finite price",
                candidate.name
            )));
        }
    }

    let mut ranked: Vec<ScoredCandidate> = params
        .candidates
        .iter()
        .map(|candidate| {
            let category_match = candidate.category == params.base.category;
            let overlap = feature_overlap(&params.base.features, &candidate.features);

            let score = if category_match { CATEGORY_POINTS } else { 0.0 }
                + price_proximity_points(params.base.price, candidate.price)
                + FEATURE_POINTS * overlap;

            ScoredCandidate {
                name: candidate.name.clone(),
                category: candidate.category.clone(),
                price: candidate.price,
                score,
                category_match,
                feature_overlap: overlap,
            }
        })
        .collect();

    // Stable sort keeps input order between equal scores
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let top_pick = ranked[0].name.clone();
    let analysis = format!(
        "Ranked {} alternatives to '{}'; best match '{}' with score {:.0}/100",
        ranked.len(),
        params.base.name,
        top_pick,
        ranked[0].score
    );

    Ok(SuggestAlternativesResult {
        base: params.base.name.clone(),
        ranked,
        top_pick,
        analysis,
    })
}

/// Alternative-suggestion tool.
pub struct SuggestAlternativesTool;

impl SuggestAlternativesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "suggest_alternatives";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Rank candidate products as alternatives to a base product: 30 points for category match, up to 30 for price within ±20/40/60% bands, up to 40 for feature-set overlap.";

    /// Execute the tool logic.
    pub fn execute(params: &SuggestAlternativesParams) -> CallToolResult {
        info!(
            "Suggest alternatives tool called: '{}' with {} candidates",
            params.base.name,
            params.candidates.len()
        );

        match compute_alternatives(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<SuggestAlternativesParams>(arguments) {
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
            input_schema: cached_schema_for_type::<SuggestAlternativesParams>(),
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

    fn product(name: &str, category: &str, price: f64, features: &[&str]) -> CandidateProduct {
        CandidateProduct {
            name: name.to_string(),
            category: category.to_string(),
            price,
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_identical_product_scores_full_marks() {
        let base = product("base", "laptop", 1000.0, &["ssd", "16gb"]);
        let params = SuggestAlternativesParams {
            base: base.clone(),
            candidates: vec![product("twin", "laptop", 1000.0, &["ssd", "16gb"])],
        };
        let result = compute_alternatives(&params).unwrap();
        assert_eq!(result.ranked[0].score, 100.0);
        assert_eq!(result.top_pick, "twin");
    }

    #[test]
    fn test_price_bands() {
        assert_eq!(price_proximity_points(1000.0, 1100.0), 30.0); // 10% off
        assert_eq!(price_proximity_points(1000.0, 1200.0), 30.0); // exactly 20%
        assert_eq!(price_proximity_points(1000.0, 1300.0), 20.0); // 30%
        assert_eq!(price_proximity_points(1000.0, 1500.0), 10.0); // 50%
        assert_eq!(price_proximity_points(1000.0, 2000.0), 0.0); // 100%
    }

    #[test]
    fn test_feature_overlap_is_jaccard() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["y".to_string(), "z".to_string()];
        // Intersection 1, union 3
        assert!((feature_overlap(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(feature_overlap(&a, &a), 1.0);
        assert_eq!(feature_overlap(&[], &[]), 0.0);
    }

    #[test]
    fn test_ranking_is_descending() {
        let params = SuggestAlternativesParams {
            base: product("base", "laptop", 1000.0, &["ssd"]),
            candidates: vec![
                product("far", "tablet", 3000.0, &[]),
                product("close", "laptop", 1050.0, &["ssd"]),
                product("mid", "laptop", 1500.0, &[]),
            ],
        };
        let result = compute_alternatives(&params).unwrap();
        let names: Vec<&str> = result.ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["close", "mid", "far"]);
        assert_eq!(result.top_pick, "close");
        let scores: Vec<f64> = result.ranked.iter().map(|c| c.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_empty_candidates_fails() {
        let params = SuggestAlternativesParams {
            base: product("base", "laptop", 1000.0, &[]),
            candidates: vec![],
        };
        assert!(matches!(
            compute_alternatives(&params).unwrap_err(),
            ToolError::InsufficientData(_)
        ));
    }

    #[test]
    fn test_zero_base_price_fails() {
        let params = SuggestAlternativesParams {
            base: product("base", "laptop", 0.0, &[]),
            candidates: vec![product("c", "laptop", 100.0, &[])],
        };
        assert!(matches!(
            compute_alternatives(&params).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }
}
