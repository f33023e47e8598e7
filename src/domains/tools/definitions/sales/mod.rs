//! Sales analysis calculator module.
//!
//! Trend and contribution analytics over sales figures:
//! - `growth`: year-over-year and month-over-month growth rates
//! - `moving_average`: sliding-window means
//! - `abc_analysis`: Pareto A/B/C ranking
//! - `forecast`: linear-regression extrapolation

pub mod abc_analysis;
pub mod forecast;
pub mod growth;
pub mod moving_average;

pub use abc_analysis::{AbcAnalysisParams, AbcAnalysisTool};
pub use forecast::{SalesForecastParams, SalesForecastTool};
pub use growth::{GrowthParams, MomGrowthTool, YoyGrowthTool};
pub use moving_average::{MovingAverageParams, MovingAverageTool};
