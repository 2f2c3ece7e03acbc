//! Correlation of high-cost resources against flow records

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    AnalysisError, FlowAggregate, FlowCorrelation, FlowKey, ResourceMatcher, SubstringMatcher,
};
use crate::infrastructure::object_store::{ObjectStore, StoreLocation};
use crate::infrastructure::records::FlowReader;

/// Scans flow records and aggregates the traffic touching a set of
/// high-cost resources.
///
/// Correlation degrades instead of failing: any fault during the scan is
/// absorbed into an `Error`-tagged result so the analysis can still finish
/// on cost data alone.
#[derive(Debug)]
pub struct FlowCorrelator {
    reader: FlowReader,
    matcher: Arc<dyn ResourceMatcher>,
}

impl FlowCorrelator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            reader: FlowReader::new(store),
            matcher: Arc::new(SubstringMatcher),
        }
    }

    /// Swap the endpoint matching strategy.
    pub fn with_matcher(mut self, matcher: Arc<dyn ResourceMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Correlate `resource_ids` against flow records under `location`.
    ///
    /// An empty identifier set short-circuits before any store access.
    pub async fn correlate(
        &self,
        resource_ids: &[String],
        location: &StoreLocation,
        max_files: usize,
    ) -> FlowCorrelation {
        if resource_ids.is_empty() {
            return FlowCorrelation::no_resources();
        }

        match self.try_correlate(resource_ids, location, max_files).await {
            Ok(correlation) => correlation,
            Err(error) => {
                warn!(%error, "flow correlation failed, continuing without it");
                FlowCorrelation::failed(error.to_string())
            }
        }
    }

    async fn try_correlate(
        &self,
        resource_ids: &[String],
        location: &StoreLocation,
        max_files: usize,
    ) -> Result<FlowCorrelation, AnalysisError> {
        let scan = self.reader.scan(location, max_files).await?;
        if scan.files_listed == 0 {
            return Ok(FlowCorrelation::no_files());
        }

        let mut index: HashMap<FlowKey, usize> = HashMap::new();
        let mut aggregates: Vec<FlowAggregate> = Vec::new();
        let mut matched = 0usize;

        for record in &scan.records {
            let touches_resource = resource_ids.iter().any(|id| {
                self.matcher.matches(id, &record.src_addr) || self.matcher.matches(id, &record.dst_addr)
            });
            if !touches_resource {
                continue;
            }
            matched += 1;
            let key = record.key();
            let position = *index.entry(key.clone()).or_insert_with(|| {
                aggregates.push(FlowAggregate::new(key));
                aggregates.len() - 1
            });
            aggregates[position].add(record);
        }

        aggregates.sort_by(|a, b| {
            b.total_bytes.cmp(&a.total_bytes).then_with(|| {
                (&a.src_addr, &a.dst_addr, &a.protocol).cmp(&(
                    &b.src_addr,
                    &b.dst_addr,
                    &b.protocol,
                ))
            })
        });

        info!(
            scanned = scan.records.len(),
            matched,
            triples = aggregates.len(),
            partial = scan.partial,
            "correlated flow records"
        );

        Ok(FlowCorrelation::success(aggregates, scan.partial))
    }
}
