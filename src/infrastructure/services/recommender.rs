//! Rule-table evaluation over cost aggregates and flow correlation

use rust_decimal::Decimal;

use crate::domain::{
    CorrelationStatus, CostAggregate, CostFigure, FlowCorrelation, Priority, Recommendation,
    RecommendationRule, COST_THRESHOLD, HIGH_TRAFFIC_BYTES, RESOURCE_RULES,
    TRAFFIC_PATTERN_RESOURCE, TRAFFIC_PATTERN_RULE,
};

/// Turns ranked cost aggregates plus the correlation result into prioritized
/// recommendations.
///
/// Pure evaluation over the rule table; no I/O. Output follows the input
/// cost order, with the pattern-level finding appended last.
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: &'static [RecommendationRule],
    cost_threshold: Decimal,
    high_traffic_bytes: u64,
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            rules: RESOURCE_RULES,
            cost_threshold: Decimal::from(COST_THRESHOLD),
            high_traffic_bytes: HIGH_TRAFFIC_BYTES,
        }
    }
}

impl Recommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommend(
        &self,
        aggregates: &[CostAggregate],
        correlation: &FlowCorrelation,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = aggregates
            .iter()
            .filter(|aggregate| aggregate.total_cost > self.cost_threshold)
            .filter_map(|aggregate| self.recommend_resource(aggregate))
            .collect();

        if self.has_high_traffic_pattern(correlation) {
            recommendations.push(traffic_pattern_recommendation());
        }

        recommendations
    }

    fn recommend_resource(&self, aggregate: &CostAggregate) -> Option<Recommendation> {
        // First matching service marker wins; unmatched services are a
        // silent skip, not an error.
        let rule = self
            .rules
            .iter()
            .find(|rule| aggregate.service_name.contains(rule.service_marker))?;
        Some(Recommendation {
            resource_id: aggregate.resource_id.clone(),
            service: aggregate.service_name.clone(),
            cost: CostFigure::Fixed(aggregate.total_cost),
            category: rule.category.to_string(),
            priority: rule.priority(aggregate.total_cost),
            action: rule.action.to_string(),
            implementation: rule.implementation.to_string(),
            documentation: rule.documentation.to_string(),
            estimated_savings: rule.estimated_savings.to_string(),
        })
    }

    fn has_high_traffic_pattern(&self, correlation: &FlowCorrelation) -> bool {
        correlation.status == CorrelationStatus::Success
            && correlation
                .flows
                .iter()
                .any(|flow| flow.total_bytes > self.high_traffic_bytes)
    }
}

fn traffic_pattern_recommendation() -> Recommendation {
    let rule = TRAFFIC_PATTERN_RULE;
    Recommendation {
        resource_id: TRAFFIC_PATTERN_RESOURCE.to_string(),
        service: rule.service_marker.to_string(),
        cost: CostFigure::Variable,
        category: rule.category.to_string(),
        priority: Priority::High,
        action: rule.action.to_string(),
        implementation: rule.implementation.to_string(),
        documentation: rule.documentation.to_string(),
        estimated_savings: rule.estimated_savings.to_string(),
    }
}
