//! VPC flow log reader

use std::sync::Arc;

use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use tracing::{debug, warn};

use crate::domain::{AnalysisError, FlowRecord};
use crate::infrastructure::object_store::{ObjectStore, StoreLocation};

// Space-separated flow log field positions:
// version account interface srcaddr dstaddr srcport dstport protocol
// packets bytes windowstart windowend action status
const TEXT_FIELD_COUNT: usize = 14;
const IDX_SRC_ADDR: usize = 3;
const IDX_DST_ADDR: usize = 4;
const IDX_SRC_PORT: usize = 5;
const IDX_DST_PORT: usize = 6;
const IDX_PROTOCOL: usize = 7;
const IDX_BYTES: usize = 9;
const IDX_WINDOW_START: usize = 10;
const IDX_WINDOW_END: usize = 11;

/// Everything one bounded scan of a flow source produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowScan {
    pub records: Vec<FlowRecord>,
    /// Matching flow log files present under the prefix.
    pub files_listed: usize,
    /// Files actually fetched before the bound was hit.
    pub files_read: usize,
    /// True when `files_listed > files_read`.
    pub partial: bool,
}

/// Reads flow records from an object store, bounded by a file count.
///
/// Handles space-separated text logs and columnar parquet files with the
/// same logical schema.
#[derive(Debug, Clone)]
pub struct FlowReader {
    store: Arc<dyn ObjectStore>,
}

impl FlowReader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Scan up to `max_files` flow log files under `location`.
    ///
    /// The bound is a latency control: hitting it marks the scan partial but
    /// is not an error. Undecodable files are logged and skipped.
    pub async fn scan(
        &self,
        location: &StoreLocation,
        max_files: usize,
    ) -> Result<FlowScan, AnalysisError> {
        let keys = self.store.list(&location.bucket, &location.prefix).await?;
        let flow_keys: Vec<String> = keys.into_iter().filter(|key| is_flow_key(key)).collect();
        let files_listed = flow_keys.len();

        let mut records = Vec::new();
        let mut files_read = 0;
        for key in flow_keys.into_iter().take(max_files) {
            let data = self.store.get(&location.bucket, &key).await?;
            files_read += 1;

            let parsed = if key.ends_with(".parquet") {
                parse_parquet(data, &key)
            } else {
                parse_text(&data, &key)
            };
            match parsed {
                Ok(mut file_records) => records.append(&mut file_records),
                Err(error) if !error.is_fatal() => {
                    warn!(key = %key, %error, "skipping undecodable flow log file");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(FlowScan {
            records,
            files_listed,
            files_read,
            partial: files_listed > files_read,
        })
    }
}

fn is_flow_key(key: &str) -> bool {
    key.ends_with(".txt") || key.ends_with(".log") || key.ends_with(".parquet")
}

/// Parse one space-separated flow log file.
///
/// Lines with fewer fields than the standard format are skipped; a
/// non-numeric byte count reads as zero, matching how collectors emit `-`
/// for skipped records.
fn parse_text(data: &[u8], key: &str) -> Result<Vec<FlowRecord>, AnalysisError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| AnalysisError::malformed_record(key, format!("not utf-8: {e}")))?;

    let mut records = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < TEXT_FIELD_COUNT {
            debug!(key = %key, line = %line, "skipping short flow log line");
            continue;
        }

        records.push(FlowRecord {
            src_addr: fields[IDX_SRC_ADDR].to_string(),
            dst_addr: fields[IDX_DST_ADDR].to_string(),
            src_port: fields[IDX_SRC_PORT].parse().unwrap_or(0),
            dst_port: fields[IDX_DST_PORT].parse().unwrap_or(0),
            protocol: fields[IDX_PROTOCOL].to_string(),
            bytes: fields[IDX_BYTES].parse().unwrap_or(0),
            window_start: fields[IDX_WINDOW_START].parse().unwrap_or(0),
            window_end: fields[IDX_WINDOW_END].parse().unwrap_or(0),
        });
    }

    Ok(records)
}

/// Parse one columnar flow log file with named fields.
fn parse_parquet(data: Bytes, key: &str) -> Result<Vec<FlowRecord>, AnalysisError> {
    let reader = SerializedFileReader::new(data)
        .map_err(|e| AnalysisError::malformed_record(key, format!("parquet open: {e}")))?;
    let rows = reader
        .get_row_iter(None)
        .map_err(|e| AnalysisError::malformed_record(key, format!("parquet rows: {e}")))?;

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| AnalysisError::malformed_record(key, format!("parquet row: {e}")))?;
        records.push(parquet_row_to_record(&row, key)?);
    }

    Ok(records)
}

fn parquet_row_to_record(row: &Row, key: &str) -> Result<FlowRecord, AnalysisError> {
    let mut src_addr = None;
    let mut dst_addr = None;
    let mut src_port = 0;
    let mut dst_port = 0;
    let mut protocol = None;
    let mut bytes = 0;

    for (name, field) in row.get_column_iter() {
        match name.as_str() {
            "srcaddr" => src_addr = field_to_string(field),
            "dstaddr" => dst_addr = field_to_string(field),
            "srcport" => src_port = field_to_u64(field).unwrap_or(0) as u32,
            "dstport" => dst_port = field_to_u64(field).unwrap_or(0) as u32,
            "protocol" => protocol = field_to_string(field),
            // A null byte count reads as zero, like the text format.
            "bytes" => bytes = field_to_u64(field).unwrap_or(0),
            _ => {}
        }
    }

    let required = |value: Option<String>, name: &str| {
        value.ok_or_else(|| AnalysisError::malformed_record(key, format!("missing field '{name}'")))
    };

    Ok(FlowRecord {
        src_addr: required(src_addr, "srcaddr")?,
        dst_addr: required(dst_addr, "dstaddr")?,
        src_port,
        dst_port,
        protocol: required(protocol, "protocol")?,
        bytes,
        window_start: 0,
        window_end: 0,
    })
}

fn field_to_string(field: &Field) -> Option<String> {
    match field {
        Field::Str(value) => Some(value.clone()),
        Field::Int(value) => Some(value.to_string()),
        Field::Long(value) => Some(value.to_string()),
        _ => None,
    }
}

fn field_to_u64(field: &Field) -> Option<u64> {
    match field {
        Field::Int(value) => u64::try_from(*value).ok(),
        Field::Long(value) => u64::try_from(*value).ok(),
        Field::UInt(value) => Some(u64::from(*value)),
        Field::ULong(value) => Some(*value),
        _ => None,
    }
}
