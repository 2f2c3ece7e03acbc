//! Network flow records, correlation aggregates and matching strategies

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// One observed network flow between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: u32,
    pub dst_port: u32,
    /// Protocol identifier as it appears in the log (`6`, `17`, ...).
    pub protocol: String,
    pub bytes: u64,
    pub window_start: i64,
    pub window_end: i64,
}

/// Grouping key for flow aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub src_addr: String,
    pub dst_addr: String,
    pub protocol: String,
}

/// Summed traffic for one (source, destination, protocol) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowAggregate {
    pub src_addr: String,
    pub dst_addr: String,
    pub protocol: String,
    pub total_bytes: u64,
    pub flow_count: u64,
}

impl FlowAggregate {
    pub fn new(key: FlowKey) -> Self {
        Self {
            src_addr: key.src_addr,
            dst_addr: key.dst_addr,
            protocol: key.protocol,
            total_bytes: 0,
            flow_count: 0,
        }
    }

    pub fn add(&mut self, record: &FlowRecord) {
        self.total_bytes += record.bytes;
        self.flow_count += 1;
    }
}

impl FlowRecord {
    pub fn key(&self) -> FlowKey {
        FlowKey {
            src_addr: self.src_addr.clone(),
            dst_addr: self.dst_addr.clone(),
            protocol: self.protocol.clone(),
        }
    }
}

/// Outcome tag of a correlation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStatus {
    /// Flow records were scanned and aggregated.
    Success,
    /// No resource identifiers were supplied; nothing was read.
    NoResources,
    /// The flow source listing was empty.
    NoFiles,
    /// Scanning failed; correlation is absent but the run continues.
    Error,
}

/// Result of correlating high-cost resources against flow records.
///
/// Correlation never fails the analysis: faults degrade into the
/// [`CorrelationStatus::Error`] tag with a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCorrelation {
    pub status: CorrelationStatus,
    /// Aggregates ordered by descending total bytes, at most
    /// [`FlowCorrelation::MAX_FLOWS`].
    pub flows: Vec<FlowAggregate>,
    pub total_flows: usize,
    /// True when the file-count bound stopped the scan before all matching
    /// files were read.
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlowCorrelation {
    /// Cap on aggregates retained in one correlation result.
    pub const MAX_FLOWS: usize = 100;

    pub fn success(mut flows: Vec<FlowAggregate>, partial: bool) -> Self {
        flows.truncate(Self::MAX_FLOWS);
        let total_flows = flows.len();
        Self {
            status: CorrelationStatus::Success,
            flows,
            total_flows,
            partial,
            error: None,
        }
    }

    pub fn no_resources() -> Self {
        Self {
            status: CorrelationStatus::NoResources,
            flows: Vec::new(),
            total_flows: 0,
            partial: false,
            error: None,
        }
    }

    pub fn no_files() -> Self {
        Self {
            status: CorrelationStatus::NoFiles,
            flows: Vec::new(),
            total_flows: 0,
            partial: false,
            error: Some("No VPC flow log files found".into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: CorrelationStatus::Error,
            flows: Vec::new(),
            total_flows: 0,
            partial: false,
            error: Some(message.into()),
        }
    }
}

/// Strategy for deciding whether a flow endpoint belongs to a resource.
///
/// Resource identifiers (instance IDs, bucket names) do not map 1:1 onto IP
/// addresses, so matching is pluggable. The default substring heuristic is
/// deliberately loose; swap in an address-book backed matcher where an
/// authoritative mapping exists.
pub trait ResourceMatcher: Send + Sync + Debug {
    fn matches(&self, resource_id: &str, addr: &str) -> bool;
}

/// Known-imprecise default: the identifier appearing anywhere inside the
/// address text counts as a match.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl ResourceMatcher for SubstringMatcher {
    fn matches(&self, resource_id: &str, addr: &str) -> bool {
        !resource_id.is_empty() && addr.contains(resource_id)
    }
}

/// Strict equality between identifier and address text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactMatcher;

impl ResourceMatcher for ExactMatcher {
    fn matches(&self, resource_id: &str, addr: &str) -> bool {
        !resource_id.is_empty() && resource_id == addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(src: &str, dst: &str, protocol: &str, bytes: u64) -> FlowRecord {
        FlowRecord {
            src_addr: src.into(),
            dst_addr: dst.into(),
            src_port: 443,
            dst_port: 52100,
            protocol: protocol.into(),
            bytes,
            window_start: 1_704_067_200,
            window_end: 1_704_067_260,
        }
    }

    #[test]
    fn test_aggregate_folds_bytes_and_count() {
        let a = record("10.0.1.100", "8.8.8.8", "6", 1_000);
        let b = record("10.0.1.100", "8.8.8.8", "6", 2_500);
        let mut agg = FlowAggregate::new(a.key());
        agg.add(&a);
        agg.add(&b);
        assert_eq!(agg.total_bytes, 3_500);
        assert_eq!(agg.flow_count, 2);
    }

    #[test]
    fn test_success_truncates_to_cap() {
        let flows: Vec<FlowAggregate> = (0..150)
            .map(|i| {
                let mut agg = FlowAggregate::new(record(&format!("10.0.0.{i}"), "8.8.8.8", "6", 1).key());
                agg.total_bytes = (150 - i) as u64;
                agg
            })
            .collect();
        let correlation = FlowCorrelation::success(flows, false);
        assert_eq!(correlation.flows.len(), FlowCorrelation::MAX_FLOWS);
        assert_eq!(correlation.total_flows, FlowCorrelation::MAX_FLOWS);
    }

    #[test]
    fn test_substring_matcher() {
        let matcher = SubstringMatcher;
        assert!(matcher.matches("10.0.1.100", "10.0.1.100"));
        assert!(matcher.matches("0.1.10", "10.0.1.100"));
        assert!(!matcher.matches("10.0.2.200", "10.0.1.100"));
        assert!(!matcher.matches("", "10.0.1.100"));
    }

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactMatcher;
        assert!(matcher.matches("10.0.1.100", "10.0.1.100"));
        assert!(!matcher.matches("0.1.10", "10.0.1.100"));
    }

    #[test]
    fn test_status_serialization_tags() {
        assert_eq!(
            serde_json::to_string(&CorrelationStatus::NoResources).unwrap(),
            "\"no_resources\""
        );
        assert_eq!(
            serde_json::to_string(&CorrelationStatus::Success).unwrap(),
            "\"success\""
        );
    }
}
