//! Bundle discount tool definition.
//!
//! Per-line quantity discounts plus a bundle discount when the order mixes
//! two or more distinct products.

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

/// One order line.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LineItem {
    /// Product identifier; distinct names enable the bundle discount.
    pub product: String,

    /// Price per unit - must be positive.
    pub unit_price: f64,

    /// Units ordered - must be at least 1.
    pub quantity: u32,
}

/// Parameters for the bundle discount tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BundleDiscountParams {
    /// Order lines to price.
    pub line_items: Vec<LineItem>,

    /// Quantity at or above which a line earns the quantity discount
    /// (default: 10).
    #[serde(default = "default_quantity_threshold")]
    pub quantity_threshold: u32,

    /// Discount rate applied to qualifying lines (default: 0.05).
    #[serde(default = "default_quantity_discount_rate")]
    pub quantity_discount_rate: f64,

    /// Discount rate applied to the post-quantity-discount subtotal when the
    /// order has 2+ distinct products (default: 0.03).
    #[serde(default = "default_bundle_discount_rate")]
    pub bundle_discount_rate: f64,
}

fn default_quantity_threshold() -> u32 {
    10
}

fn default_quantity_discount_rate() -> f64 {
    0.05
}

fn default_bundle_discount_rate() -> f64 {
    0.03
}

/// One priced order line.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PricedLine {
    pub product: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,

    /// Quantity discount on this line; zero below the threshold.
    pub quantity_discount: f64,
}

/// Bundle discount output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BundleDiscountResult {
    pub lines: Vec<PricedLine>,

    /// Sum of line totals before any discount.
    pub subtotal: f64,

    pub quantity_discount_total: f64,

    /// Applied only when the order has 2+ distinct products.
    pub bundle_discount: f64,

    pub total_discount: f64,
    pub final_total: f64,
    pub analysis: String,
}

/// Price an order with quantity and bundle discounts.
pub fn compute_bundle_discount(
    params: &BundleDiscountParams,
) -> Result<BundleDiscountResult, ToolError> {
    if params.line_items.is_empty() {
        return Err(ToolError::insufficient_data("no line items to price"));
    }
    for rate in [params.quantity_discount_rate, params.bundle_discount_rate] {
        if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
            return Err(ToolError::domain_validation(format!(
                "discount rates must be in [0, 1), got {}",
                rate
            )));
        }
    }
    for line in &params.line_items {
        if !line.unit_price.is_finite() || line.unit_price <= 0.0 {
            return Err(ToolError::domain_validation(format!(
                "line '{}' has a non-positive unit price",
                line.product
            )));
        }
        if line.quantity == 0 {
            return Err(ToolError::domain_validation(format!(
                "line '{}' has zero quantity",
                line.product
            )));
        }
    }

    let lines: Vec<PricedLine> = params
        .line_items
        .iter()
        .map(|line| {
            let line_total = line.unit_price * f64::from(line.quantity);
            let quantity_discount = if line.quantity >= params.quantity_threshold {
                line_total * params.quantity_discount_rate
            } else {
                0.0
            };
            PricedLine {
                product: line.product.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total,
                quantity_discount,
            }
        })
        .collect();

    let subtotal: f64 = lines.iter().map(|l| l.line_total).sum();
    let quantity_discount_total: f64 = lines.iter().map(|l| l.quantity_discount).sum();

    let distinct_products: HashSet<&str> =
        params.line_items.iter().map(|l| l.product.as_str()).collect();
    let bundle_discount = if distinct_products.len() >= 2 {
        (subtotal - quantity_discount_total) * params.bundle_discount_rate
    } else {
        0.0
    };

    let total_discount = quantity_discount_total + bundle_discount;
    let final_total = subtotal - total_discount;

    let analysis = format!(
        "{} lines ({} distinct products): subtotal {:.2}, discounts {:.2} ({:.2} quantity + {:.2} bundle), total {:.2}",
        lines.len(),
        distinct_products.len(),
        subtotal,
        total_discount,
        quantity_discount_total,
        bundle_discount,
        final_total
    );

    Ok(BundleDiscountResult {
        lines,
        subtotal,
        quantity_discount_total,
        bundle_discount,
        total_discount,
        final_total,
        analysis,
    })
}

/// Bundle discount tool.
pub struct BundleDiscountTool;

impl BundleDiscountTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "bundle_discount";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Price an order with quantity discounts (per line at or above the quantity threshold) and a bundle discount on the discounted subtotal when 2+ distinct products are ordered.";

    /// Execute the tool logic.
    pub fn execute(params: &BundleDiscountParams) -> CallToolResult {
        info!(
            "Bundle discount tool called with {} line items",
            params.line_items.len()
        );

        match compute_bundle_discount(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<BundleDiscountParams>(arguments) {
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
            input_schema: cached_schema_for_type::<BundleDiscountParams>(),
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

    fn line(product: &str, unit_price: f64, quantity: u32) -> LineItem {
        LineItem {
            product: product.to_string(),
            unit_price,
            quantity,
        }
    }

    fn params(line_items: Vec<LineItem>) -> BundleDiscountParams {
        BundleDiscountParams {
            line_items,
            quantity_threshold: default_quantity_threshold(),
            quantity_discount_rate: default_quantity_discount_rate(),
            bundle_discount_rate: default_bundle_discount_rate(),
        }
    }

    #[test]
    fn test_no_discounts_below_thresholds() {
        // Single product, quantity under threshold
        let result = compute_bundle_discount(&params(vec![line("a", 100.0, 5)])).unwrap();
        assert_eq!(result.subtotal, 500.0);
        assert_eq!(result.total_discount, 0.0);
        assert_eq!(result.final_total, 500.0);
    }

    #[test]
    fn test_quantity_discount_at_threshold() {
        let result = compute_bundle_discount(&params(vec![line("a", 100.0, 10)])).unwrap();
        assert_eq!(result.subtotal, 1000.0);
        assert_eq!(result.quantity_discount_total, 50.0);
        // One distinct product: no bundle discount
        assert_eq!(result.bundle_discount, 0.0);
        assert_eq!(result.final_total, 950.0);
    }

    #[test]
    fn test_bundle_discount_needs_two_distinct_products() {
        let result =
            compute_bundle_discount(&params(vec![line("a", 100.0, 2), line("b", 50.0, 2)]))
                .unwrap();
        assert_eq!(result.subtotal, 300.0);
        assert_eq!(result.quantity_discount_total, 0.0);
        assert!((result.bundle_discount - 9.0).abs() < 1e-9);
        assert!((result.final_total - 291.0).abs() < 1e-9);
    }

    #[test]
    fn test_bundle_applies_after_quantity_discount() {
        let result =
            compute_bundle_discount(&params(vec![line("a", 100.0, 10), line("b", 50.0, 2)]))
                .unwrap();
        assert_eq!(result.subtotal, 1100.0);
        assert_eq!(result.quantity_discount_total, 50.0);
        // Bundle rate applies to 1050, not 1100
        assert!((result.bundle_discount - 1050.0 * 0.03).abs() < 1e-9);
        let expected_total = 1100.0 - 50.0 - 1050.0 * 0.03;
        assert!((result.final_total - expected_total).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_product_is_not_a_bundle() {
        let result =
            compute_bundle_discount(&params(vec![line("a", 100.0, 2), line("a", 100.0, 3)]))
                .unwrap();
        assert_eq!(result.bundle_discount, 0.0);
    }

    #[test]
    fn test_final_total_is_subtotal_minus_discounts() {
        let result = compute_bundle_discount(&params(vec![
            line("a", 80.0, 12),
            line("b", 40.0, 15),
            line("c", 25.0, 3),
        ]))
        .unwrap();
        assert!(
            (result.final_total - (result.subtotal - result.total_discount)).abs() < 1e-9
        );
        assert!(result.final_total < result.subtotal);
    }

    #[test]
    fn test_empty_lines_fails() {
        assert!(matches!(
            compute_bundle_discount(&params(vec![])).unwrap_err(),
            ToolError::InsufficientData(_)
        ));
    }

    #[test]
    fn test_zero_quantity_fails() {
        assert!(matches!(
            compute_bundle_discount(&params(vec![line("a", 100.0, 0)])).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }

    #[test]
    fn test_defaults_apply() {
        let p: BundleDiscountParams = serde_json::from_value(serde_json::json!({
            "line_items": [{"product": "a", "unit_price": 10.0, "quantity": 1}]
        }))
        .unwrap();
        assert_eq!(p.quantity_threshold, 10);
        assert_eq!(p.quantity_discount_rate, 0.05);
        assert_eq!(p.bundle_discount_rate, 0.03);
    }
}
