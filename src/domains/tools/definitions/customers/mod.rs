//! Customer segmentation calculator module.
//!
//! RFM scoring, segment classification, lifetime value, and next-action
//! recommendations. `rfm_score` feeds `classify_segment`, whose output feeds
//! `recommend_next_action`; each tool also stands alone.

pub mod clv;
pub mod next_action;
pub mod rfm_score;
pub mod segment;

pub use clv::{ClvParams, ClvTool};
pub use next_action::{NextActionParams, NextActionTool};
pub use rfm_score::{RfmScoreParams, RfmScoreTool};
pub use segment::{ClassifySegmentParams, ClassifySegmentTool};
