//! Customer segment classification tool definition.
//!
//! Ordered decision rules over RFM scores; the first matching rule wins.

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

/// Parameters for the segment classification tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClassifySegmentParams {
    /// Recency score, 1-5.
    pub recency_score: u8,

    /// Frequency score, 1-5.
    pub frequency_score: u8,

    /// Monetary score, 1-5.
    pub monetary_score: u8,
}

/// A named customer segment with its outreach playbook.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub name: &'static str,
    pub priority: u8,
    pub description: &'static str,
    pub actions: &'static [&'static str],
}

/// The eight segments, in rule order. First match wins.
const CHAMPION: Segment = Segment {
    name: "champion",
    priority: 1,
    description: "Recent, frequent, high-spending customer",
    actions: &[
        "Offer early access to new products",
        "Invite to loyalty program tier upgrades",
        "Ask for reviews and referrals",
    ],
};

const AT_RISK_BIG_SPENDER: Segment = Segment {
    name: "at_risk_big_spender",
    priority: 1,
    description: "High spend but has not purchased recently",
    actions: &[
        "Reach out personally before they churn",
        "Offer a targeted win-back discount",
    ],
};

const LOYAL: Segment = Segment {
    name: "loyal",
    priority: 2,
    description: "Buys regularly and recently",
    actions: &[
        "Reward with loyalty points",
        "Recommend complementary products",
    ],
};

const AT_RISK: Segment = Segment {
    name: "at_risk",
    priority: 2,
    description: "Was a frequent buyer, now lapsing",
    actions: &[
        "Send a reactivation campaign",
        "Survey for dissatisfaction signals",
    ],
};

const NEW_CUSTOMER: Segment = Segment {
    name: "new_customer",
    priority: 3,
    description: "Recent first purchases, little history",
    actions: &[
        "Send onboarding content",
        "Offer a second-purchase coupon",
    ],
};

const POTENTIAL_LOYALIST: Segment = Segment {
    name: "potential_loyalist",
    priority: 3,
    description: "Moderately recent and repeat-buying",
    actions: &[
        "Propose a membership or subscription",
        "Cross-sell from purchase history",
    ],
};

const DORMANT: Segment = Segment {
    name: "dormant",
    priority: 5,
    description: "Long inactive, low engagement",
    actions: &[
        "Include in low-cost reactivation batches",
        "Suppress from high-frequency campaigns",
    ],
};

const REGULAR: Segment = Segment {
    name: "regular",
    priority: 4,
    description: "Average recency, frequency, and spend",
    actions: &[
        "Keep in the standard newsletter",
        "Promote seasonal offers",
    ],
};

/// Classify an RFM score triple into a segment. First matching rule wins.
pub fn classify(r: u8, f: u8, m: u8) -> Segment {
    if r >= 4 && f >= 4 && m >= 4 {
        CHAMPION
    } else if r <= 2 && m >= 4 {
        AT_RISK_BIG_SPENDER
    } else if r >= 4 && f >= 3 {
        LOYAL
    } else if r <= 2 && f >= 3 {
        AT_RISK
    } else if r >= 4 {
        NEW_CUSTOMER
    } else if r >= 3 && f >= 2 {
        POTENTIAL_LOYALIST
    } else if r <= 1 {
        DORMANT
    } else {
        REGULAR
    }
}

/// Segment classification output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ClassifySegmentResult {
    pub segment: String,

    /// 1 (act first) to 5 (act last).
    pub priority: u8,

    pub description: String,
    pub recommended_actions: Vec<String>,
    pub analysis: String,
}

/// Validate scores and classify.
pub fn compute_segment(params: &ClassifySegmentParams) -> Result<ClassifySegmentResult, ToolError> {
    for (label, score) in [
        ("recency_score", params.recency_score),
        ("frequency_score", params.frequency_score),
        ("monetary_score", params.monetary_score),
    ] {
        if !(1..=5).contains(&score) {
            return Err(ToolError::domain_validation(format!(
                "'{}' must be between 1 and 5, got {}",
                label, score
            )));
        }
    }

    let segment = classify(
        params.recency_score,
        params.frequency_score,
        params.monetary_score,
    );

    let analysis = format!(
        "RFM {}-{}-{} maps to segment '{}' (priority {}): {}",
        params.recency_score,
        params.frequency_score,
        params.monetary_score,
        segment.name,
        segment.priority,
        segment.description
    );

    Ok(ClassifySegmentResult {
        segment: segment.name.to_string(),
        priority: segment.priority,
        description: segment.description.to_string(),
        recommended_actions: segment.actions.iter().map(|a| a.to_string()).collect(),
        analysis,
    })
}

/// Segment classification tool.
pub struct ClassifySegmentTool;

impl ClassifySegmentTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "classify_segment";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Classify a customer into one of eight segments from their 1-5 RFM scores, using ordered first-match rules. Returns the segment name, action priority, and recommended actions.";

    /// Execute the tool logic.
    pub fn execute(params: &ClassifySegmentParams) -> CallToolResult {
        info!(
            "Classify segment tool called: {}-{}-{}",
            params.recency_score, params.frequency_score, params.monetary_score
        );

        match compute_segment(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<ClassifySegmentParams>(arguments) {
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
            input_schema: cached_schema_for_type::<ClassifySegmentParams>(),
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
    fn test_top_scores_are_champion() {
        let segment = classify(5, 5, 5);
        assert_eq!(segment.name, "champion");
        assert_eq!(segment.priority, 1);
    }

    #[test]
    fn test_high_spend_low_recency_is_priority_one() {
        // High monetary, long absent: the (1,2,4) case
        let segment = classify(1, 2, 4);
        assert_eq!(segment.name, "at_risk_big_spender");
        assert_eq!(segment.priority, 1);
    }

    #[test]
    fn test_recent_frequent_is_loyal() {
        assert_eq!(classify(5, 4, 2).name, "loyal");
        assert_eq!(classify(4, 3, 3).name, "loyal");
    }

    #[test]
    fn test_lapsing_frequent_is_at_risk() {
        assert_eq!(classify(2, 4, 2).name, "at_risk");
    }

    #[test]
    fn test_recent_first_timer_is_new_customer() {
        assert_eq!(classify(5, 1, 1).name, "new_customer");
    }

    #[test]
    fn test_mid_recency_repeat_is_potential_loyalist() {
        assert_eq!(classify(3, 3, 2).name, "potential_loyalist");
    }

    #[test]
    fn test_long_inactive_is_dormant() {
        assert_eq!(classify(1, 1, 1).name, "dormant");
        assert_eq!(classify(1, 2, 2).name, "dormant");
    }

    #[test]
    fn test_fallback_is_regular() {
        assert_eq!(classify(2, 1, 2).name, "regular");
        assert_eq!(classify(3, 1, 3).name, "regular");
    }

    #[test]
    fn test_every_combination_gets_a_segment() {
        // The rule chain is total over the 1-5 cube
        for r in 1..=5 {
            for f in 1..=5 {
                for m in 1..=5 {
                    let segment = classify(r, f, m);
                    assert!((1..=5).contains(&segment.priority));
                    assert!(!segment.name.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_score_fails() {
        let params = ClassifySegmentParams {
            recency_score: 0,
            frequency_score: 3,
            monetary_score: 3,
        };
        assert!(matches!(
            compute_segment(&params).unwrap_err(),
            ToolError::DomainValidation(_)
        ));

        let params = ClassifySegmentParams {
            recency_score: 3,
            frequency_score: 6,
            monetary_score: 3,
        };
        assert!(matches!(
            compute_segment(&params).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }
}
