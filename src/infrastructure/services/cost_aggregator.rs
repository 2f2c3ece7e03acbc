//! Cost aggregation over DTO line items

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::{AnalysisError, BillingPeriod, CostAggregate, CostKey, CostLineItem};
use crate::infrastructure::object_store::{ObjectStore, StoreLocation};
use crate::infrastructure::records::CurReader;

/// Filters billing line items to the data-transfer subset for one period and
/// ranks the resulting (resource, service, region) groups by cost.
#[derive(Debug, Clone)]
pub struct CostAggregator {
    reader: CurReader,
}

impl CostAggregator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            reader: CurReader::new(store),
        }
    }

    /// Produce the `top_n` most expensive DTO groups for `period`.
    ///
    /// An empty result is a valid outcome (the period simply had no DTO
    /// spend), distinct from a source-read failure.
    pub async fn aggregate(
        &self,
        location: &StoreLocation,
        period: BillingPeriod,
        top_n: usize,
    ) -> Result<Vec<CostAggregate>, AnalysisError> {
        let items = self.reader.read_period(location, period).await?;
        let aggregates = aggregate_line_items(&items, period, top_n);
        info!(
            period = %period,
            line_items = items.len(),
            groups = aggregates.len(),
            "aggregated DTO costs"
        );
        Ok(aggregates)
    }
}

/// Pure aggregation core: filter, group, rank, truncate.
///
/// Groups keep first-seen order, so equal costs tie-break deterministically
/// by input order (the sort below is stable).
pub fn aggregate_line_items(
    items: &[CostLineItem],
    period: BillingPeriod,
    top_n: usize,
) -> Vec<CostAggregate> {
    let mut index: HashMap<CostKey, usize> = HashMap::new();
    let mut aggregates: Vec<CostAggregate> = Vec::new();

    for item in items {
        if !period.contains(item.usage_start) || !item.is_data_transfer() {
            continue;
        }
        let key = item.key();
        let position = *index.entry(key.clone()).or_insert_with(|| {
            aggregates.push(CostAggregate::new(key));
            aggregates.len() - 1
        });
        aggregates[position].add(item);
    }

    aggregates.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
    aggregates.truncate(top_n);
    aggregates
}
