//! End-to-end pipeline tests against an in-memory object store

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use rust_decimal::Decimal;

use dto_cost_analyzer::domain::{CorrelationStatus, CostFigure, Priority, ReportStatus};
use dto_cost_analyzer::infrastructure::object_store::{InMemoryObjectStore, StoreLocation};
use dto_cost_analyzer::{AnalysisRequest, AnalysisService, BillingPeriod};

const CUR_HEADER: &str = "lineItem/usageStartDate,lineItem/usageEndDate,lineItem/resourceId,lineItem/usageType,lineItem/blendedCost,lineItem/usageAmount,product/serviceName,product/region,product/productFamily";

fn cur_csv(rows: &[(&str, &str, &str, &str)]) -> String {
    // (date, resource_id, cost, service)
    let mut body = String::from(CUR_HEADER);
    for (date, resource_id, cost, service) in rows {
        body.push_str(&format!(
            "\n{date},{date},{resource_id},DataTransfer-Out-Bytes,{cost},100,{service},us-east-1,Data Transfer"
        ));
    }
    body
}

fn gzip(content: &str) -> Bytes {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    Bytes::from(encoder.finish().unwrap())
}

fn flow_line(src: &str, dst: &str, bytes: u64) -> String {
    format!("2 123456789012 eni-1a2b3c4d {src} {dst} 49152 443 6 25 {bytes} 1704067200 1704067260 ACCEPT OK")
}

fn request(period: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        StoreLocation::new("billing", "cur-reports/"),
        StoreLocation::new("logs", "vpc-flow-logs/"),
        period.parse::<BillingPeriod>().unwrap(),
    )
}

#[tokio::test]
async fn high_cost_ec2_without_flow_files() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.put(
        "billing",
        "cur-reports/cur-2024-01/shard.csv",
        Bytes::from(cur_csv(&[("2024-01-03", "i-1", "250", "Amazon EC2")])),
    );
    store.create_bucket("logs");

    let service = AnalysisService::new(store);
    let report = service.run(&request("2024-01")).await.unwrap();

    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.summary.total_dto_cost, Decimal::from(250));
    assert_eq!(
        report.summary.flow_logs_status,
        Some(CorrelationStatus::NoFiles)
    );

    assert_eq!(report.recommendations.len(), 1);
    let recommendation = &report.recommendations[0];
    assert_eq!(recommendation.resource_id, "i-1");
    assert_eq!(recommendation.category, "EC2 Data Transfer Optimization");
    assert_eq!(recommendation.priority, Priority::High);
}

#[tokio::test]
async fn empty_cost_data_short_circuits_to_no_data() {
    let store = Arc::new(InMemoryObjectStore::new());
    // Export exists but holds another period; the flow bucket is absent on
    // purpose, so any correlation attempt would surface as an error status.
    store.put(
        "billing",
        "cur-reports/cur-2023-12/shard.csv",
        Bytes::from(cur_csv(&[("2023-12-03", "i-1", "250", "Amazon EC2")])),
    );

    let service = AnalysisService::new(store);
    let report = service.run(&request("2024-01")).await.unwrap();

    assert_eq!(report.status, ReportStatus::NoData);
    assert!(report.expensive_resources.is_empty());
    assert!(report.recommendations.is_empty());
    assert!(report.flow_correlation.is_none());
    assert!(report.summary.flow_logs_status.is_none());
    assert!(report.message.unwrap().contains("2024-01"));
}

#[tokio::test]
async fn medium_s3_with_high_traffic_pattern() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.put(
        "billing",
        "cur-reports/cur-2024-01/shard.csv",
        Bytes::from(cur_csv(&[("2024-01-10", "10.0.1.100", "80", "Amazon S3")])),
    );
    store.put(
        "logs",
        "vpc-flow-logs/2024-01/part-0.txt",
        Bytes::from(flow_line("10.0.1.100", "8.8.8.8", 600_000_000)),
    );

    let service = AnalysisService::new(store);
    let report = service.run(&request("2024-01")).await.unwrap();

    assert_eq!(report.status, ReportStatus::Success);
    let correlation = report.flow_correlation.unwrap();
    assert_eq!(correlation.status, CorrelationStatus::Success);
    assert_eq!(correlation.flows.len(), 1);
    assert_eq!(correlation.flows[0].total_bytes, 600_000_000);

    assert_eq!(report.recommendations.len(), 2);
    assert_eq!(
        report.recommendations[0].category,
        "S3 Data Transfer Optimization"
    );
    assert_eq!(report.recommendations[0].priority, Priority::Medium);
    assert_eq!(
        report.recommendations[1].category,
        "Network Architecture Optimization"
    );
    assert_eq!(report.recommendations[1].priority, Priority::High);
    assert_eq!(report.recommendations[1].cost, CostFigure::Variable);
}

#[tokio::test]
async fn gzip_export_and_mixed_flow_sources() {
    let store = Arc::new(InMemoryObjectStore::new());
    let rows = [
        ("2024-01-03", "10.0.1.100", "300", "Amazon EC2"),
        ("2024-01-04", "10.0.1.100", "150", "Amazon EC2"),
        ("2024-01-05", "10.0.2.200", "60", "Amazon RDS"),
    ];
    store.put(
        "billing",
        "cur-reports/cur-2024-01/shard.csv.gz",
        gzip(&cur_csv(&rows)),
    );
    let flows = [
        flow_line("10.0.1.100", "8.8.8.8", 1_000),
        flow_line("8.8.8.8", "10.0.2.200", 2_000),
        flow_line("203.0.113.9", "198.51.100.7", 9_999),
    ]
    .join("\n");
    store.put("logs", "vpc-flow-logs/2024-01/part-0.txt", Bytes::from(flows));

    let service = AnalysisService::new(store);
    let report = service.run(&request("2024-01")).await.unwrap();

    // Two line items collapse into one EC2 group; RDS stays separate.
    assert_eq!(report.summary.resources_analyzed, 2);
    assert_eq!(report.expensive_resources[0].total_cost, Decimal::from(450));
    assert_eq!(report.summary.total_dto_cost, Decimal::from(510));

    let correlation = report.flow_correlation.unwrap();
    assert_eq!(correlation.status, CorrelationStatus::Success);
    // The unmatched external flow is excluded.
    assert_eq!(correlation.flows.len(), 2);
    assert_eq!(correlation.flows[0].total_bytes, 2_000);

    assert_eq!(report.recommendations.len(), 2);
    assert_eq!(report.recommendations[0].priority, Priority::High);
    assert_eq!(
        report.recommendations[1].category,
        "RDS Data Transfer Optimization"
    );
    assert_eq!(
        report.recommendations[0].cost,
        CostFigure::Fixed(Decimal::from(450))
    );
}

#[tokio::test]
async fn unreachable_billing_bucket_is_fatal() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.create_bucket("logs");

    let service = AnalysisService::new(store);
    let error = service.run(&request("2024-01")).await.unwrap_err();
    assert!(error.to_string().contains("billing"));
}

#[tokio::test]
async fn report_serializes_with_stable_tags() {
    let store = Arc::new(InMemoryObjectStore::new());
    store.put(
        "billing",
        "cur-reports/cur-2024-01/shard.csv",
        Bytes::from(cur_csv(&[("2024-01-03", "i-1", "250", "Amazon EC2")])),
    );
    store.create_bucket("logs");

    let service = AnalysisService::new(store);
    let report = service.run(&request("2024-01")).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["summary"]["target_month"], "2024-01");
    assert_eq!(json["summary"]["flow_logs_status"], "no_files");
    assert_eq!(json["recommendations"][0]["priority"], "High");
}
