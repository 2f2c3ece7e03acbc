//! Recommendation entities and the optimization rule table

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum total cost before a resource is worth a recommendation, in
/// currency units.
pub const COST_THRESHOLD: i64 = 50;

/// Traffic volume above which a flow pattern triggers the network
/// architecture recommendation.
pub const HIGH_TRAFFIC_BYTES: u64 = 500_000_000;

/// Sentinel resource identifier for pattern-level findings that are not tied
/// to a single billed resource.
pub const TRAFFIC_PATTERN_RESOURCE: &str = "Network Traffic Pattern";

/// Urgency of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

/// Cost figure attached to a recommendation.
///
/// Pattern-level findings have no single billed cost, so they carry the
/// symbolic `Variable` marker instead of a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostFigure {
    Fixed(Decimal),
    Variable,
}

impl Serialize for CostFigure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(cost) => Serialize::serialize(cost, serializer),
            Self::Variable => serializer.serialize_str("Variable"),
        }
    }
}

/// One actionable cost-optimization finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub resource_id: String,
    pub service: String,
    pub cost: CostFigure,
    pub category: String,
    pub priority: Priority,
    pub action: String,
    pub implementation: String,
    pub documentation: String,
    pub estimated_savings: String,
}

/// One row of the per-resource rule table.
///
/// The table is data rather than branching logic so thresholds and guidance
/// can be tested and extended without touching the evaluation code.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    /// Substring of the billed service name that selects this rule.
    pub service_marker: &'static str,
    pub category: &'static str,
    /// Cost above which the finding is High priority; `None` pins Medium.
    pub high_above: Option<i64>,
    pub action: &'static str,
    pub implementation: &'static str,
    pub documentation: &'static str,
    pub estimated_savings: &'static str,
}

impl RecommendationRule {
    pub fn priority(&self, cost: Decimal) -> Priority {
        match self.high_above {
            Some(threshold) if cost > Decimal::from(threshold) => Priority::High,
            _ => Priority::Medium,
        }
    }
}

/// Per-resource rules, evaluated in order; the first matching service marker
/// wins.
pub const RESOURCE_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        service_marker: "EC2",
        category: "EC2 Data Transfer Optimization",
        high_above: Some(200),
        action: "Implement VPC endpoints to reduce NAT gateway data transfer charges",
        implementation: "Create VPC endpoints for frequently accessed AWS services",
        documentation: "https://docs.aws.amazon.com/vpc/latest/privatelink/vpc-endpoints.html",
        estimated_savings: "Up to 50% reduction in data transfer costs",
    },
    RecommendationRule {
        service_marker: "S3",
        category: "S3 Data Transfer Optimization",
        high_above: Some(100),
        action: "Use CloudFront CDN or S3 Transfer Acceleration",
        implementation: "Configure CloudFront distribution for frequently accessed objects",
        documentation:
            "https://docs.aws.amazon.com/AmazonCloudFront/latest/DeveloperGuide/Introduction.html",
        estimated_savings: "Up to 60% reduction in data transfer costs",
    },
    RecommendationRule {
        service_marker: "RDS",
        category: "RDS Data Transfer Optimization",
        high_above: None,
        action: "Optimize database queries and implement read replicas in same AZ",
        implementation: "Create read replicas closer to application servers",
        documentation: "https://docs.aws.amazon.com/AmazonRDS/latest/UserGuide/USER_ReadRepl.html",
        estimated_savings: "Up to 40% reduction in cross-AZ charges",
    },
];

/// Pattern-level rule applied once per report when correlation surfaces a
/// high-traffic flow.
pub const TRAFFIC_PATTERN_RULE: RecommendationRule = RecommendationRule {
    service_marker: "VPC",
    category: "Network Architecture Optimization",
    high_above: None,
    action: "Optimize data locality and reduce cross-AZ/cross-region traffic",
    implementation: "Review application architecture for data locality patterns",
    documentation:
        "https://docs.aws.amazon.com/wellarchitected/latest/cost-optimization-pillar/networking.html",
    estimated_savings: "Up to 70% reduction in inter-AZ charges",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(marker: &'static str) -> &'static RecommendationRule {
        RESOURCE_RULES
            .iter()
            .find(|r| r.service_marker == marker)
            .unwrap()
    }

    #[test]
    fn test_ec2_priority_thresholds() {
        let ec2 = rule("EC2");
        assert_eq!(ec2.priority(Decimal::from(250)), Priority::High);
        assert_eq!(ec2.priority(Decimal::from(200)), Priority::Medium);
        assert_eq!(ec2.priority(Decimal::from(60)), Priority::Medium);
    }

    #[test]
    fn test_s3_priority_thresholds() {
        let s3 = rule("S3");
        assert_eq!(s3.priority(Decimal::from(101)), Priority::High);
        assert_eq!(s3.priority(Decimal::from(80)), Priority::Medium);
    }

    #[test]
    fn test_rds_is_always_medium() {
        let rds = rule("RDS");
        assert_eq!(rds.priority(Decimal::from(10_000)), Priority::Medium);
    }

    #[test]
    fn test_cost_figure_serialization() {
        assert_eq!(
            serde_json::to_string(&CostFigure::Fixed(Decimal::new(1250, 1))).unwrap(),
            "\"125.0\""
        );
        assert_eq!(
            serde_json::to_string(&CostFigure::Variable).unwrap(),
            "\"Variable\""
        );
    }
}
