//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own
//! route, and every route dispatches through the same argument-validating
//! entry point the registry uses, so both transports behave identically.

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AbcAnalysisTool, BundleDiscountTool, ClassifySegmentTool, ClvTool, CompareProductsTool,
    InventoryTurnoverTool, MomGrowthTool, MovingAverageTool, NextActionTool, PricePerformanceTool,
    ReorderPointTool, RfmScoreTool, SalesForecastTool, SlowMovingTool, SuggestAlternativesTool,
    YoyGrowthTool,
};

/// Build the tool router with all registered tools, in catalog order.
pub fn build_tool_router<S>() -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(YoyGrowthTool::create_route())
        .with_route(MomGrowthTool::create_route())
        .with_route(MovingAverageTool::create_route())
        .with_route(AbcAnalysisTool::create_route())
        .with_route(SalesForecastTool::create_route())
        .with_route(RfmScoreTool::create_route())
        .with_route(ClassifySegmentTool::create_route())
        .with_route(ClvTool::create_route())
        .with_route(NextActionTool::create_route())
        .with_route(InventoryTurnoverTool::create_route())
        .with_route(ReorderPointTool::create_route())
        .with_route(SlowMovingTool::create_route())
        .with_route(CompareProductsTool::create_route())
        .with_route(PricePerformanceTool::create_route())
        .with_route(SuggestAlternativesTool::create_route())
        .with_route(BundleDiscountTool::create_route())
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router();
        let tools = router.list_all();
        assert_eq!(tools.len(), 16);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"yoy_growth"));
        assert!(names.contains(&"abc_analysis"));
        assert!(names.contains(&"sales_forecast"));
        assert!(names.contains(&"classify_segment"));
        assert!(names.contains(&"reorder_point"));
        assert!(names.contains(&"bundle_discount"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router expose the same tools
        let registry = ToolRegistry::new();
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router();
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_every_tool_has_description_and_schema() {
        let router: ToolRouter<TestServer> = build_tool_router();
        for tool in router.list_all() {
            assert!(tool.description.as_ref().is_some_and(|d| !d.is_empty()));
            assert!(!tool.input_schema.is_empty());
        }
    }
}
