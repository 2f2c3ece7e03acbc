//! Analysis services

mod analysis;
mod cost_aggregator;
mod flow_correlator;
mod recommender;

pub use analysis::{AnalysisRequest, AnalysisService, DEFAULT_MAX_FLOW_FILES, DEFAULT_TOP_N};
pub use cost_aggregator::{aggregate_line_items, CostAggregator};
pub use flow_correlator::FlowCorrelator;
pub use recommender::Recommender;
