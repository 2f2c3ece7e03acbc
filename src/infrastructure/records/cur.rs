//! CUR billing export reader

use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{AnalysisError, BillingPeriod, CostLineItem};
use crate::infrastructure::object_store::{ObjectStore, StoreLocation};

// CUR column headers, as emitted by the billing export.
const COL_RESOURCE_ID: &str = "lineItem/resourceId";
const COL_SERVICE_NAME: &str = "product/serviceName";
const COL_REGION: &str = "product/region";
const COL_USAGE_TYPE: &str = "lineItem/usageType";
const COL_PRODUCT_FAMILY: &str = "product/productFamily";
const COL_USAGE_START: &str = "lineItem/usageStartDate";
const COL_BLENDED_COST: &str = "lineItem/blendedCost";
const COL_USAGE_AMOUNT: &str = "lineItem/usageAmount";

/// Reads cost line items for one billing period from an object store.
///
/// Accepts plain and gzip-compressed CSV shards; files whose key does not
/// carry the period label are skipped without being fetched.
#[derive(Debug, Clone)]
pub struct CurReader {
    store: Arc<dyn ObjectStore>,
}

impl CurReader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Read every parseable line item for `period` under `location`.
    pub async fn read_period(
        &self,
        location: &StoreLocation,
        period: BillingPeriod,
    ) -> Result<Vec<CostLineItem>, AnalysisError> {
        let keys = self.store.list(&location.bucket, &location.prefix).await?;

        let mut items = Vec::new();
        for key in keys {
            if !is_cur_key(&key) || !period.matches_key(&key) {
                debug!(key = %key, "skipping non-matching export file");
                continue;
            }

            let data = self.store.get(&location.bucket, &key).await?;
            match parse_line_items(&data, &key) {
                Ok(mut parsed) => items.append(&mut parsed),
                Err(error) if !error.is_fatal() => {
                    warn!(key = %key, %error, "skipping malformed export file");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(items)
    }
}

fn is_cur_key(key: &str) -> bool {
    key.ends_with(".csv") || key.ends_with(".csv.gz")
}

/// Parse one CSV shard, decompressing when the key says so.
fn parse_line_items(data: &[u8], key: &str) -> Result<Vec<CostLineItem>, AnalysisError> {
    let decoded;
    let content: &[u8] = if key.ends_with(".gz") {
        let mut decoder = GzDecoder::new(data);
        let mut buffer = Vec::new();
        decoder
            .read_to_end(&mut buffer)
            .map_err(|e| AnalysisError::malformed_record(key, format!("gzip decode: {e}")))?;
        decoded = buffer;
        &decoded
    } else {
        data
    };

    let mut reader = csv::Reader::from_reader(content);
    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::malformed_record(key, format!("csv header: {e}")))?
        .clone();

    let column = |name: &str| -> Result<usize, AnalysisError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::malformed_record(key, format!("missing column '{name}'")))
    };

    let resource_id = column(COL_RESOURCE_ID)?;
    let service_name = column(COL_SERVICE_NAME)?;
    let region = column(COL_REGION)?;
    let usage_type = column(COL_USAGE_TYPE)?;
    let product_family = column(COL_PRODUCT_FAMILY)?;
    let usage_start = column(COL_USAGE_START)?;
    let blended_cost = column(COL_BLENDED_COST)?;
    let usage_amount = column(COL_USAGE_AMOUNT)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AnalysisError::malformed_record(key, format!("csv row: {e}")))?;
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        items.push(CostLineItem {
            // Blank resource IDs are legitimate: usage not attributable to a
            // single resource stays grouped under the empty identifier.
            resource_id: field(resource_id).to_string(),
            service_name: field(service_name).to_string(),
            region: field(region).to_string(),
            usage_type: field(usage_type).to_string(),
            product_family: field(product_family).to_string(),
            usage_start: parse_usage_date(field(usage_start), key)?,
            blended_cost: parse_decimal(field(blended_cost), key)?,
            usage_amount: parse_decimal(field(usage_amount), key)?,
        });
    }

    Ok(items)
}

/// Usage start dates appear as plain dates or as timestamps; only the date
/// part matters for monthly filtering.
fn parse_usage_date(value: &str, key: &str) -> Result<NaiveDate, AnalysisError> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AnalysisError::malformed_record(key, format!("invalid usage date '{value}'")))
}

fn parse_decimal(value: &str, key: &str) -> Result<Decimal, AnalysisError> {
    value
        .parse()
        .map_err(|_| AnalysisError::malformed_record(key, format!("invalid amount '{value}'")))
}
