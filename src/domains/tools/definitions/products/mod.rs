//! Product comparison calculator module.
//!
//! Head-to-head spec comparison, price-performance rating, alternative
//! ranking, and bundle pricing.

pub mod alternatives;
pub mod bundle;
pub mod compare;
pub mod price_performance;

pub use alternatives::{SuggestAlternativesParams, SuggestAlternativesTool};
pub use bundle::{BundleDiscountParams, BundleDiscountTool};
pub use compare::{CompareProductsParams, CompareProductsTool};
pub use price_performance::{PricePerformanceParams, PricePerformanceTool};
