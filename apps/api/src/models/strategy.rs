use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// A single marketing campaign recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Free-form channel label: "Email", "Social Media", "SEO", "PPC", ...
    #[serde(default, deserialize_with = "lenient::string")]
    pub channel: String,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub budget: u64,
    #[serde(default, deserialize_with = "lenient::timeline")]
    pub timeline: String,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub expected_reach: u64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_breakdown: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub amount: u64,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub percentage: u8,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub size: u64,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub characteristics: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOption {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cons: Vec<String>,
}

/// The strategy payload rendered by the dashboard.
///
/// Deserialization is the validation boundary: every list defaults to empty,
/// numbers are coerced to whole values and percentages clamped to `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyData {
    #[serde(default, deserialize_with = "lenient::list")]
    pub campaigns: Vec<Campaign>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub budget_allocation: Vec<BudgetItem>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub target_segments: Vec<Segment>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub actionable_tips: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub strategy_options: Vec<StrategyOption>,
}

/// Which path produced a strategy. The dashboard and the logs both need to know.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StrategyOutcome {
    Generated {
        strategy: StrategyData,
    },
    Fallback {
        strategy: StrategyData,
        reason: String,
    },
}

impl StrategyOutcome {
    pub fn strategy(&self) -> &StrategyData {
        match self {
            StrategyOutcome::Generated { strategy } => strategy,
            StrategyOutcome::Fallback { strategy, .. } => strategy,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StrategyOutcome::Fallback { .. })
    }
}

/// Cross-check of a strategy's allocation against the requested budget.
/// Reported alongside the strategy; the numbers themselves are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheck {
    pub requested_budget: f64,
    pub allocated_amount: u64,
    pub percentage_total: u32,
    pub consistent: bool,
}

/// Percentages may drift by this many points before a plan is flagged.
const PERCENTAGE_TOLERANCE: u32 = 2;
/// Allocated dollars may drift by this share of the budget.
const AMOUNT_TOLERANCE: f64 = 0.05;

impl BudgetCheck {
    pub fn evaluate(strategy: &StrategyData, requested_budget: f64) -> Self {
        // Remote amounts are unbounded, so the totals saturate instead of overflowing.
        let allocated_amount = strategy
            .budget_allocation
            .iter()
            .fold(0u64, |total, b| total.saturating_add(b.amount));
        let percentage_total = strategy
            .budget_allocation
            .iter()
            .fold(0u32, |total, b| total.saturating_add(u32::from(b.percentage)));

        let percentages_ok = percentage_total.abs_diff(100) <= PERCENTAGE_TOLERANCE;
        let amounts_ok =
            (allocated_amount as f64 - requested_budget).abs() <= requested_budget * AMOUNT_TOLERANCE;

        Self {
            requested_budget,
            allocated_amount,
            percentage_total,
            consistent: !strategy.budget_allocation.is_empty() && percentages_ok && amounts_ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_default_to_empty() {
        let strategy: StrategyData =
            serde_json::from_str(r#"{"campaigns": [{"name": "Launch", "channel": "Email"}]}"#)
                .unwrap();
        assert_eq!(strategy.campaigns.len(), 1);
        assert!(strategy.budget_allocation.is_empty());
        assert!(strategy.target_segments.is_empty());
        assert!(strategy.actionable_tips.is_empty());
        assert!(strategy.strategy_options.is_empty());
    }

    #[test]
    fn test_null_lists_default_to_empty() {
        let strategy: StrategyData =
            serde_json::from_str(r#"{"campaigns": null, "actionableTips": null}"#).unwrap();
        assert!(strategy.campaigns.is_empty());
        assert!(strategy.actionable_tips.is_empty());
    }

    #[test]
    fn test_percentages_are_clamped() {
        let strategy: StrategyData = serde_json::from_value(serde_json::json!({
            "budgetAllocation": [
                {"category": "Ads", "amount": 500, "percentage": 140},
                {"category": "Tools", "amount": -20, "percentage": -5}
            ]
        }))
        .unwrap();
        assert_eq!(strategy.budget_allocation[0].percentage, 100);
        assert_eq!(strategy.budget_allocation[1].percentage, 0);
        assert_eq!(strategy.budget_allocation[1].amount, 0);
    }

    #[test]
    fn test_numbers_as_strings_and_floats_are_coerced() {
        let campaign: Campaign = serde_json::from_value(serde_json::json!({
            "name": "Search",
            "channel": "PPC",
            "budget": "$1,500",
            "timeline": 8,
            "expectedReach": 12000.6
        }))
        .unwrap();
        assert_eq!(campaign.budget, 1500);
        assert_eq!(campaign.timeline, "8 weeks");
        assert_eq!(campaign.expected_reach, 12001);
        assert!(campaign.description.is_none());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let strategy: StrategyData = serde_json::from_value(serde_json::json!({
            "campaigns": ["just text", {"name": "Real", "channel": "SEO"}, 42]
        }))
        .unwrap();
        assert_eq!(strategy.campaigns.len(), 1);
        assert_eq!(strategy.campaigns[0].name, "Real");
    }

    #[test]
    fn test_outcome_serializes_with_source_tag() {
        let generated = serde_json::to_value(StrategyOutcome::Generated {
            strategy: StrategyData::default(),
        })
        .unwrap();
        assert_eq!(generated["source"], "generated");
        assert!(generated["strategy"]["campaigns"].is_array());

        let fallback = serde_json::to_value(StrategyOutcome::Fallback {
            strategy: StrategyData::default(),
            reason: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(fallback["source"], "fallback");
        assert_eq!(fallback["reason"], "timeout");
        assert!(fallback["strategy"]["budgetAllocation"].is_array());
    }

    #[test]
    fn test_budget_check_saturates_on_huge_amounts() {
        let strategy: StrategyData = serde_json::from_value(serde_json::json!({
            "budgetAllocation": [
                {"category": "Ads", "amount": 1e19, "percentage": 50},
                {"category": "Tools", "amount": 1e19, "percentage": 50}
            ]
        }))
        .unwrap();
        let check = BudgetCheck::evaluate(&strategy, 5000.0);
        assert_eq!(check.allocated_amount, u64::MAX);
        assert_eq!(check.percentage_total, 100);
        assert!(!check.consistent);
    }

    #[test]
    fn test_budget_check_flags_inconsistent_allocation() {
        let strategy = StrategyData {
            budget_allocation: vec![
                BudgetItem {
                    category: "Ads".to_string(),
                    amount: 3000,
                    percentage: 60,
                    explanation: None,
                },
                BudgetItem {
                    category: "Email".to_string(),
                    amount: 3000,
                    percentage: 60,
                    explanation: None,
                },
            ],
            ..Default::default()
        };
        let check = BudgetCheck::evaluate(&strategy, 5000.0);
        assert_eq!(check.percentage_total, 120);
        assert_eq!(check.allocated_amount, 6000);
        assert!(!check.consistent);
    }

    #[test]
    fn test_budget_check_accepts_matching_allocation() {
        let strategy = StrategyData {
            budget_allocation: vec![
                BudgetItem {
                    category: "Ads".to_string(),
                    amount: 2999,
                    percentage: 60,
                    explanation: None,
                },
                BudgetItem {
                    category: "Email".to_string(),
                    amount: 2000,
                    percentage: 40,
                    explanation: None,
                },
            ],
            ..Default::default()
        };
        assert!(BudgetCheck::evaluate(&strategy, 5000.0).consistent);
    }
}
