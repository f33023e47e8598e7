//! Product comparison tool definition.
//!
//! Spec-by-spec comparison of two products: numeric specs get a winner,
//! non-numeric specs are reported side by side.

use std::collections::BTreeMap;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::super::common::{error_result, require_non_negative, structured_result};
use crate::domains::tools::ToolError;

/// A product entering the comparison.
///
/// Specs map arbitrary attribute names to values; a BTreeMap keeps the
/// comparison output ordering deterministic.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct Product {
    pub name: String,
    pub price: f64,

    /// Attribute name -> value (numbers are compared, other types reported).
    #[serde(default)]
    pub specs: BTreeMap<String, serde_json::Value>,
}

/// Parameters for the product comparison tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompareProductsParams {
    pub product_a: Product,
    pub product_b: Product,
}

/// Comparison outcome for one shared spec key.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SpecComparison {
    pub key: String,
    pub value_a: serde_json::Value,
    pub value_b: serde_json::Value,

    /// Name of the product with the higher numeric value; absent for
    /// non-numeric specs and for ties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Product comparison output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CompareProductsResult {
    pub product_a: String,
    pub product_b: String,

    /// Shared spec keys in sorted order.
    pub spec_comparison: Vec<SpecComparison>,

    pub wins_a: usize,
    pub wins_b: usize,

    pub price_difference: f64,

    /// Name of the cheaper product, or "tie".
    pub cheaper_product: String,

    pub analysis: String,
}

/// Compare two products spec by spec.
pub fn compute_comparison(
    params: &CompareProductsParams,
) -> Result<CompareProductsResult, ToolError> {
    let a = &params.product_a;
    let b = &params.product_b;
    require_non_negative(a.price, "product_a.price")?;
    require_non_negative(b.price, "product_b.price")?;

    let mut wins_a = 0;
    let mut wins_b = 0;

    let spec_comparison: Vec<SpecComparison> = a
        .specs
        .iter()
        .filter_map(|(key, value_a)| {
            let value_b = b.specs.get(key)?;
            let winner = match (value_a.as_f64(), value_b.as_f64()) {
                (Some(num_a), Some(num_b)) if num_a > num_b => {
                    wins_a += 1;
                    Some(a.name.clone())
                }
                (Some(num_a), Some(num_b)) if num_b > num_a => {
                    wins_b += 1;
                    Some(b.name.clone())
                }
                _ => None,
            };
            Some(SpecComparison {
                key: key.clone(),
                value_a: value_a.clone(),
                value_b: value_b.clone(),
                winner,
            })
        })
        .collect();

    let price_difference = (a.price - b.price).abs();
    let cheaper_product = if a.price < b.price {
        a.name.clone()
    } else if b.price < a.price {
        b.name.clone()
    } else {
        "tie".to_string()
    };

    let analysis = format!(
        "'{}' wins {} specs, '{}' wins {}; {} is cheaper by {}",
        a.name,
        wins_a,
        b.name,
        wins_b,
        if cheaper_product == "tie" {
            "neither"
        } else {
            &cheaper_product
        },
        price_difference
    );

    Ok(CompareProductsResult {
        product_a: a.name.clone(),
        product_b: b.name.clone(),
        spec_comparison,
        wins_a,
        wins_b,
        price_difference,
        cheaper_product,
        analysis,
    })
}

/// Product comparison tool.
pub struct CompareProductsTool;

impl CompareProductsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "compare_products";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Compare two products spec by spec. Numeric specs get a winner (higher value), non-numeric specs are listed without one; also reports the price difference and the cheaper product.";

    /// Execute the tool logic.
    pub fn execute(params: &CompareProductsParams) -> CallToolResult {
        info!(
            "Compare products tool called: '{}' vs '{}'",
            params.product_a.name, params.product_b.name
        );

        match compute_comparison(params) {
            Ok(result) => structured_result(&result),
            Err(e) => error_result(&format!("error executing tool '{}': {}", Self::NAME, e)),
        }
    }

    /// Deserialize arguments and execute, reporting failures in-band.
    pub fn dispatch(arguments: serde_json::Value) -> CallToolResult {
        match serde_json::from_value::<CompareProductsParams>(arguments) {
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
            input_schema: cached_schema_for_type::<CompareProductsParams>(),
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

    fn product(name: &str, price: f64, specs: serde_json::Value) -> Product {
        Product {
            name: name.to_string(),
            price,
            specs: serde_json::from_value(specs).unwrap(),
        }
    }

    #[test]
    fn test_numeric_specs_get_winners() {
        let params = CompareProductsParams {
            product_a: product(
                "Alpha",
                1000.0,
                serde_json::json!({"ram_gb": 16, "battery_hours": 8}),
            ),
            product_b: product(
                "Beta",
                1200.0,
                serde_json::json!({"ram_gb": 8, "battery_hours": 12}),
            ),
        };
        let result = compute_comparison(&params).unwrap();
        assert_eq!(result.wins_a, 1);
        assert_eq!(result.wins_b, 1);

        let ram = result
            .spec_comparison
            .iter()
            .find(|c| c.key == "ram_gb")
            .unwrap();
        assert_eq!(ram.winner.as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_non_numeric_specs_have_no_winner() {
        let params = CompareProductsParams {
            product_a: product("Alpha", 100.0, serde_json::json!({"color": "red"})),
            product_b: product("Beta", 100.0, serde_json::json!({"color": "blue"})),
        };
        let result = compute_comparison(&params).unwrap();
        assert_eq!(result.spec_comparison.len(), 1);
        assert_eq!(result.spec_comparison[0].winner, None);
        assert_eq!(result.cheaper_product, "tie");
    }

    #[test]
    fn test_equal_numeric_specs_are_a_tie() {
        let params = CompareProductsParams {
            product_a: product("Alpha", 100.0, serde_json::json!({"weight": 2.5})),
            product_b: product("Beta", 90.0, serde_json::json!({"weight": 2.5})),
        };
        let result = compute_comparison(&params).unwrap();
        assert_eq!(result.spec_comparison[0].winner, None);
        assert_eq!(result.wins_a, 0);
        assert_eq!(result.wins_b, 0);
    }

    #[test]
    fn test_unshared_specs_are_skipped() {
        let params = CompareProductsParams {
            product_a: product("Alpha", 100.0, serde_json::json!({"ram_gb": 16, "only_a": 1})),
            product_b: product("Beta", 90.0, serde_json::json!({"ram_gb": 8, "only_b": 2})),
        };
        let result = compute_comparison(&params).unwrap();
        let keys: Vec<&str> = result.spec_comparison.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["ram_gb"]);
    }

    #[test]
    fn test_price_delta_and_cheaper_label() {
        let params = CompareProductsParams {
            product_a: product("Alpha", 1500.0, serde_json::json!({})),
            product_b: product("Beta", 1200.0, serde_json::json!({})),
        };
        let result = compute_comparison(&params).unwrap();
        assert_eq!(result.price_difference, 300.0);
        assert_eq!(result.cheaper_product, "Beta");
    }

    #[test]
    fn test_spec_keys_are_sorted() {
        let params = CompareProductsParams {
            product_a: product(
                "Alpha",
                10.0,
                serde_json::json!({"zeta": 1, "alpha": 2, "mid": 3}),
            ),
            product_b: product(
                "Beta",
                10.0,
                serde_json::json!({"zeta": 2, "alpha": 1, "mid": 3}),
            ),
        };
        let result = compute_comparison(&params).unwrap();
        let keys: Vec<&str> = result.spec_comparison.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_negative_price_fails() {
        let params = CompareProductsParams {
            product_a: product("Alpha", -5.0, serde_json::json!({})),
            product_b: product("Beta", 10.0, serde_json::json!({})),
        };
        assert!(matches!(
            compute_comparison(&params).unwrap_err(),
            ToolError::DomainValidation(_)
        ));
    }
}
