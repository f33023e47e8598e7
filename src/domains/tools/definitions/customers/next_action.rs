//! Next-action recommendation tool definition.
//!
//! Catalog lookup by segment name with urgency escalation for customers
//! drifting toward churn.

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

/// Parameters for the next-action recommendation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NextActionParams {
    /// Segment name, e.g. from the classify_segment tool. Unknown names fall
    /// back to a generic recommendation.
    pub segment: String,

    /// Days since the customer's last purchase, if known.
    #[serde(default)]
    pub last_purchase_days: Option<u32>,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
struct ActionEntry {
    channel: &'static str,
    urgency: &'static str,
    offer_type: &'static str,
}

/// Look up the playbook entry for a segment. `None` means unknown segment.
fn action_for_segment(segment: &str) -> Option<ActionEntry> {
    let entry = match segment {
        "champion" => ActionEntry {
            channel: "personal_outreach",
            urgency: "low",
            offer_type: "exclusive_preview",
        },
        "at_risk_big_spender" => ActionEntry {
            channel: "phone",
            urgency: "high",
            offer_type: "winback_discount",
        },
        "loyal" => ActionEntry {
            channel: "email",
            urgency: "medium",
            offer_type: "loyalty_reward",
        },
        "at_risk" => ActionEntry {
            channel: "email",
            urgency: "high",
            offer_type: "winback_discount",
        },
        "new_customer" => ActionEntry {
            channel: "email",
            urgency: "medium",
            offer_type: "onboarding_coupon",
        },
        "potential_loyalist" => ActionEntry {
            channel: "email",
            urgency: "medium",
            offer_type: "membership_invite",
        },
        "dormant" => ActionEntry {
            channel: "direct_mail",
            urgency: "low",
            offer_type: "reactivation_campaign",
        },
        "regular" => ActionEntry {
            channel: "newsletter",
            urgency: "low",
            offer_type: "cross_sell",
        },
        _ => return None,
    };
    Some(entry)
}

const GENERIC_ENTRY: ActionEntry = ActionEntry {
    channel: "email",
    urgency: "medium",
    offer_type: "general_promotion",
};

/// Days without a purchase after which urgency is escalated.
const ESCALATION_DAYS: u32 = 90;

/// Next-action output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct NextActionResult {
    pub segment: String,

    /// Whether the segment was found in the catalog.
    pub known_segment: bool,

    pub channel: String,
    pub urgency: String,
    pub offer_type: String,

    /// True when urgency was raised because of purchase inactivity.
    pub escalated: bool,

    pub analysis: String,
}

/// Resolve the recommendation for a segment.
///
/// The dormant segment is deliberately low-urgency (the customer is already
/// considered churned) and is exempt from inactivity escalation.
pub fn compute_next_action(params: &NextActionParams) -> Result<NextActionResult, ToolError> {
    if params.segment.trim().is_empty() {
        return Err(ToolError::domain_validation("'segment' must not be empty"));
    }

    let segment = params.segment.trim().to_lowercase();
    let looked_up = action_for_segment(&segment);
    let known_segment = looked_up.is_some();
    let entry = looked_up.unwrap_or(GENERIC_ENTRY);

    let inactivity_exceeded = params
        .last_purchase_days
        .is_some_and(|days| days > ESCALATION_DAYS);
    let escalated = inactivity_exceeded && segment != "dormant" && entry.urgency != "high";
    let urgency = if escalated { "high" } else { entry.urgency };

    let analysis = if escalated {
        format!(
            "Segment '{}': contact via {} with a {} offer; urgency raised to high after {}+ days without a purchase",
            segment, entry.channel, entry.offer_type, ESCALATION_DAYS
        )
    } else {
        format!(
            "Segment '{}': contact via {} with a {} offer ({} urgency)",
            segment, entry.channel, entry.offer_type, urgency
        )
    };

    Ok(NextActionResult {
        segment,
        known_segment,
        channel: entry.channel.to_string(),
        urgency: urgency.to_string(),
        offer_type: entry.offer_type.to_string(),
        escalated,
        analysis,
    })
}

/// Next-action recommendation tool.
pub struct NextActionTool;

impl NextActionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "recommend_next_action";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Recommend the next marketing action (channel, urgency, offer type) for a customer segment. Urgency escalates to high after 90 days without a purchase, except for the dormant segment.";

    /// Execute the tool logic.
    pub fn execute(params: &NextActionParams) -> CallToolResult {
        info!("Next action tool called for segment '{}'", params.segment);

        match compute_next_action(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<NextActionParams>(arguments) {
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
            input_schema: cached_schema_for_type::<NextActionParams>(),
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

    fn params(segment: &str, last_purchase_days: Option<u32>) -> NextActionParams {
        NextActionParams {
            segment: segment.to_string(),
            last_purchase_days,
        }
    }

    #[test]
    fn test_known_segment_lookup() {
        let result = compute_next_action(&params("champion", None)).unwrap();
        assert!(result.known_segment);
        assert_eq!(result.channel, "personal_outreach");
        assert_eq!(result.urgency, "low");
        assert_eq!(result.offer_type, "exclusive_preview");
        assert!(!result.escalated);
    }

    #[test]
    fn test_unknown_segment_falls_back_to_generic() {
        let result = compute_next_action(&params("whale", None)).unwrap();
        assert!(!result.known_segment);
        assert_eq!(result.channel, "email");
        assert_eq!(result.offer_type, "general_promotion");
    }

    #[test]
    fn test_segment_name_is_normalized() {
        let result = compute_next_action(&params("  Loyal ", None)).unwrap();
        assert!(result.known_segment);
        assert_eq!(result.segment, "loyal");
    }

    #[test]
    fn test_inactivity_escalates_urgency() {
        let result = compute_next_action(&params("regular", Some(120))).unwrap();
        assert!(result.escalated);
        assert_eq!(result.urgency, "high");
    }

    #[test]
    fn test_ninety_days_exactly_does_not_escalate() {
        let result = compute_next_action(&params("regular", Some(90))).unwrap();
        assert!(!result.escalated);
        assert_eq!(result.urgency, "low");
    }

    #[test]
    fn test_dormant_is_never_escalated() {
        let result = compute_next_action(&params("dormant", Some(365))).unwrap();
        assert!(!result.escalated);
        assert_eq!(result.urgency, "low");
    }

    #[test]
    fn test_already_high_urgency_is_not_marked_escalated() {
        let result = compute_next_action(&params("at_risk", Some(200))).unwrap();
        assert!(!result.escalated);
        assert_eq!(result.urgency, "high");
    }

    #[test]
    fn test_empty_segment_fails() {
        assert!(matches!(
            compute_next_action(&params("  ", None)).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }

    #[test]
    fn test_optional_days_defaults_to_none() {
        let p: NextActionParams =
            serde_json::from_value(serde_json::json!({"segment": "loyal"})).unwrap();
        assert_eq!(p.last_purchase_days, None);
    }
}
