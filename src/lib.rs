//! DTO Cost Analyzer
//!
//! Finds the cloud resources driving data-transfer-out spend in a billing
//! period and correlates them with network flow records:
//! - CUR billing exports read from S3 (plain or gzip CSV)
//! - VPC flow logs in text or parquet form
//! - A fixed rule table turning both signals into prioritized
//!   recommendations

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{AnalysisError, AnalysisReport, BillingPeriod};
pub use infrastructure::services::{AnalysisRequest, AnalysisService};
