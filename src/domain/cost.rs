//! Cost line items and aggregates from the billing export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billed usage record from a CUR export.
///
/// `resource_id` may be empty: the export leaves it blank for usage that is
/// not attributable to a single resource, and the aggregation keeps those
/// rows grouped under the empty identifier rather than dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub resource_id: String,
    pub service_name: String,
    pub region: String,
    pub usage_type: String,
    pub product_family: String,
    pub usage_start: NaiveDate,
    pub blended_cost: Decimal,
    pub usage_amount: Decimal,
}

impl CostLineItem {
    /// Whether this line item is data-transfer related.
    ///
    /// Matches the CUR conventions: a `Data Transfer` product family, or a
    /// usage type carrying a `DataTransfer` marker
    /// (`us-east-1-DataTransfer-Out-Bytes` and the like).
    pub fn is_data_transfer(&self) -> bool {
        self.product_family.contains("Data Transfer") || self.usage_type.contains("DataTransfer")
    }
}

/// Grouping key for cost aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostKey {
    pub resource_id: String,
    pub service_name: String,
    pub region: String,
}

/// Summed cost and usage for one (resource, service, region) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAggregate {
    pub resource_id: String,
    pub service_name: String,
    pub region: String,
    pub total_cost: Decimal,
    pub total_usage: Decimal,
}

impl CostAggregate {
    pub fn new(key: CostKey) -> Self {
        Self {
            resource_id: key.resource_id,
            service_name: key.service_name,
            region: key.region,
            total_cost: Decimal::ZERO,
            total_usage: Decimal::ZERO,
        }
    }

    /// Fold one line item into this aggregate.
    pub fn add(&mut self, item: &CostLineItem) {
        self.total_cost += item.blended_cost;
        self.total_usage += item.usage_amount;
    }
}

impl CostLineItem {
    pub fn key(&self) -> CostKey {
        CostKey {
            resource_id: self.resource_id.clone(),
            service_name: self.service_name.clone(),
            region: self.region.clone(),
        }
    }
}
