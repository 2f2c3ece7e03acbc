//! The terminal analysis report

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cost::CostAggregate;
use crate::domain::flow::{CorrelationStatus, FlowCorrelation};
use crate::domain::period::BillingPeriod;
use crate::domain::recommendation::Recommendation;

/// Terminal state of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The pipeline ran to completion.
    Success,
    /// No DTO line items matched the period filter; correlation and
    /// recommendation never ran.
    NoData,
}

/// Headline totals for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub target_month: BillingPeriod,
    pub total_dto_cost: Decimal,
    pub resources_analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_logs_status: Option<CorrelationStatus>,
    pub recommendations_count: usize,
}

/// Assembled output of one orchestrated run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub status: ReportStatus,
    pub summary: AnalysisSummary,
    pub expensive_resources: Vec<CostAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_correlation: Option<FlowCorrelation>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisReport {
    /// Build the early-exit report for a period with no qualifying cost data.
    pub fn no_data(period: BillingPeriod) -> Self {
        Self {
            status: ReportStatus::NoData,
            summary: AnalysisSummary {
                target_month: period,
                total_dto_cost: Decimal::ZERO,
                resources_analyzed: 0,
                flow_logs_status: None,
                recommendations_count: 0,
            },
            expensive_resources: Vec::new(),
            flow_correlation: None,
            recommendations: Vec::new(),
            message: Some(format!(
                "No expensive DTO resources found in CUR data for {period}"
            )),
        }
    }

    /// Build the full report once every stage has run.
    pub fn success(
        period: BillingPeriod,
        expensive_resources: Vec<CostAggregate>,
        flow_correlation: FlowCorrelation,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let total_dto_cost = expensive_resources
            .iter()
            .map(|aggregate| aggregate.total_cost)
            .sum();
        Self {
            status: ReportStatus::Success,
            summary: AnalysisSummary {
                target_month: period,
                total_dto_cost,
                resources_analyzed: expensive_resources.len(),
                flow_logs_status: Some(flow_correlation.status),
                recommendations_count: recommendations.len(),
            },
            expensive_resources,
            flow_correlation: Some(flow_correlation),
            recommendations,
            message: None,
        }
    }
}
