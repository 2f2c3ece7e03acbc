//! Single-pass analysis orchestration

use std::sync::Arc;

use tracing::info;

use crate::domain::{AnalysisError, AnalysisReport, BillingPeriod};
use crate::infrastructure::object_store::{ObjectStore, StoreLocation};
use crate::infrastructure::services::{CostAggregator, FlowCorrelator, Recommender};

/// Default number of top cost groups to analyze.
pub const DEFAULT_TOP_N: usize = 10;

/// Default bound on flow log files scanned per run.
pub const DEFAULT_MAX_FLOW_FILES: usize = 10;

/// Everything one analysis run needs to know.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub cur_location: StoreLocation,
    pub flow_location: StoreLocation,
    pub period: BillingPeriod,
    pub top_n: usize,
    pub max_flow_files: usize,
}

impl AnalysisRequest {
    pub fn new(
        cur_location: StoreLocation,
        flow_location: StoreLocation,
        period: BillingPeriod,
    ) -> Self {
        Self {
            cur_location,
            flow_location,
            period,
            top_n: DEFAULT_TOP_N,
            max_flow_files: DEFAULT_MAX_FLOW_FILES,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_max_flow_files(mut self, max_flow_files: usize) -> Self {
        self.max_flow_files = max_flow_files;
        self
    }
}

/// Sequences cost aggregation, flow correlation and recommendation for one
/// billing period and assembles the report.
///
/// Stages run strictly in order since correlation needs the resource set
/// from aggregation. The service holds no state between runs.
#[derive(Debug)]
pub struct AnalysisService {
    aggregator: CostAggregator,
    correlator: FlowCorrelator,
    recommender: Recommender,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            aggregator: CostAggregator::new(store.clone()),
            correlator: FlowCorrelator::new(store),
            recommender: Recommender::new(),
        }
    }

    /// Run the full pipeline.
    ///
    /// Only source-level unavailability of the billing export is fatal;
    /// an empty cost result short-circuits into a `NoData` report and
    /// correlation faults degrade into the report's correlation status.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        info!(period = %request.period, cur = %request.cur_location, "starting DTO analysis");

        let aggregates = self
            .aggregator
            .aggregate(&request.cur_location, request.period, request.top_n)
            .await?;

        if aggregates.is_empty() {
            info!(period = %request.period, "no DTO cost data, skipping correlation");
            return Ok(AnalysisReport::no_data(request.period));
        }

        let resource_ids: Vec<String> = aggregates
            .iter()
            .map(|aggregate| aggregate.resource_id.clone())
            .filter(|id| !id.is_empty())
            .collect();

        let correlation = self
            .correlator
            .correlate(&resource_ids, &request.flow_location, request.max_flow_files)
            .await;

        let recommendations = self.recommender.recommend(&aggregates, &correlation);
        info!(
            resources = aggregates.len(),
            recommendations = recommendations.len(),
            "analysis complete"
        );

        Ok(AnalysisReport::success(
            request.period,
            aggregates,
            correlation,
            recommendations,
        ))
    }
}
