//! Analyze command - one batch analysis run against S3

use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::BillingPeriod;
use crate::infrastructure::logging;
use crate::infrastructure::object_store::{S3ObjectStore, StoreLocation};
use crate::infrastructure::services::{AnalysisRequest, AnalysisService};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Billing period to analyze, e.g. 2024-01
    #[arg(long)]
    pub month: String,

    /// Bucket holding the CUR export
    #[arg(long)]
    pub cur_bucket: Option<String>,

    /// Key prefix of the CUR export
    #[arg(long)]
    pub cur_prefix: Option<String>,

    /// Bucket holding VPC flow logs
    #[arg(long)]
    pub flow_bucket: Option<String>,

    /// Key prefix of the flow logs
    #[arg(long)]
    pub flow_prefix: Option<String>,

    /// How many top cost groups to analyze
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Bound on flow log files scanned
    #[arg(long)]
    pub max_flow_files: Option<usize>,
}

/// Run one analysis and print the report as pretty JSON on stdout.
pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("invalid configuration")?;
    logging::init_logging(&config.logging);

    let period: BillingPeriod = args.month.parse()?;
    let cur_bucket = args
        .cur_bucket
        .or_else(|| config.analysis.cur_bucket.clone())
        .context("no CUR bucket configured; pass --cur-bucket or set DTO__ANALYSIS__CUR_BUCKET")?;
    let flow_bucket = args
        .flow_bucket
        .or_else(|| config.analysis.flow_bucket.clone())
        .context(
            "no flow log bucket configured; pass --flow-bucket or set DTO__ANALYSIS__FLOW_BUCKET",
        )?;

    let request = AnalysisRequest::new(
        StoreLocation::new(
            cur_bucket,
            args.cur_prefix.unwrap_or_else(|| config.analysis.cur_prefix.clone()),
        ),
        StoreLocation::new(
            flow_bucket,
            args.flow_prefix.unwrap_or_else(|| config.analysis.flow_prefix.clone()),
        ),
        period,
    )
    .with_top_n(args.top_n.unwrap_or(config.analysis.top_n))
    .with_max_flow_files(args.max_flow_files.unwrap_or(config.analysis.max_flow_files));

    let store = Arc::new(S3ObjectStore::from_env().await);
    let service = AnalysisService::new(store);
    let report = service.run(&request).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
