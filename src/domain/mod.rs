//! Domain layer - Core analysis entities and rules

pub mod cost;
pub mod error;
pub mod flow;
pub mod period;
pub mod recommendation;
pub mod report;

pub use cost::{CostAggregate, CostKey, CostLineItem};
pub use error::AnalysisError;
pub use flow::{
    CorrelationStatus, ExactMatcher, FlowAggregate, FlowCorrelation, FlowKey, FlowRecord,
    ResourceMatcher, SubstringMatcher,
};
pub use period::BillingPeriod;
pub use recommendation::{
    CostFigure, Priority, Recommendation, RecommendationRule, COST_THRESHOLD, HIGH_TRAFFIC_BYTES,
    RESOURCE_RULES, TRAFFIC_PATTERN_RESOURCE, TRAFFIC_PATTERN_RULE,
};
pub use report::{AnalysisReport, AnalysisSummary, ReportStatus};
