//! Common utilities shared across the analytics tools.
//!
//! This module provides shared result-formatting and validation helpers so
//! every tool produces the same envelope shape: exactly one text content item
//! carrying a JSON payload.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

/// Create a success result with a single JSON-encoded text content item.
///
/// Every tool result flows through here, which is what keeps the protocol
/// invariant: one content item, JSON text, per call.
pub fn structured_result<T: Serialize>(data: &T) -> CallToolResult {
    match serde_json::to_string_pretty(data) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => error_result(&format!("failed to serialize result: {}", e)),
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Classify a trend from the sign of a difference.
pub fn trend_label(difference: f64) -> &'static str {
    if difference > 0.0 {
        "increase"
    } else if difference < 0.0 {
        "decrease"
    } else {
        "flat"
    }
}

/// Check that a value is a finite, non-negative number.
pub fn require_non_negative(value: f64, field: &str) -> Result<(), crate::domains::tools::ToolError> {
    if !value.is_finite() || value < 0.0 {
        return Err(crate::domains::tools::ToolError::domain_validation(format!(
            "'{}' must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Check that a value is a finite, strictly positive number.
pub fn require_positive(value: f64, field: &str) -> Result<(), crate::domains::tools::ToolError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(crate::domains::tools::ToolError::domain_validation(format!(
            "'{}' must be a positive number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Extract the text payload from a result (test helper, used across modules).
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

/// Parse the JSON payload from a success result (test helper).
#[cfg(test)]
pub fn result_json(result: &CallToolResult) -> serde_json::Value {
    assert!(
        !result.is_error.unwrap_or(false),
        "expected success, got error: {}",
        result_text(result)
    );
    serde_json::from_str(result_text(result)).expect("result payload is JSON")
}
