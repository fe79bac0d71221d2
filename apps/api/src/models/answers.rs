use serde::{Deserialize, Serialize};

/// The four free-text wizard answers. Budget stays a string until a consumer
/// needs a number (see `strategy::fallback::parse_budget`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAnswers {
    pub product: String,
    pub budget: String,
    pub customers: String,
    pub growth_goal: String,
}

/// Partial update sent while the wizard is in progress. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersPatch {
    pub product: Option<String>,
    pub budget: Option<String>,
    pub customers: Option<String>,
    pub growth_goal: Option<String>,
}

impl UserAnswers {
    pub fn apply(&mut self, patch: AnswersPatch) {
        if let Some(product) = patch.product {
            self.product = product;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(customers) = patch.customers {
            self.customers = customers;
        }
        if let Some(growth_goal) = patch.growth_goal {
            self.growth_goal = growth_goal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_use_camel_case_on_the_wire() {
        let answers: UserAnswers = serde_json::from_value(serde_json::json!({
            "product": "Handmade candles",
            "budget": "1500",
            "customers": "Gift shoppers",
            "growthGoal": "Double online sales"
        }))
        .unwrap();
        assert_eq!(answers.growth_goal, "Double online sales");

        let json = serde_json::to_value(&answers).unwrap();
        assert!(json.get("growthGoal").is_some());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let answers: UserAnswers = serde_json::from_str(r#"{"product": "Tea"}"#).unwrap();
        assert_eq!(answers.product, "Tea");
        assert!(answers.budget.is_empty());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut answers = UserAnswers {
            product: "Tea".to_string(),
            budget: "500".to_string(),
            ..Default::default()
        };
        let patch: AnswersPatch = serde_json::from_str(r#"{"budget": "900"}"#).unwrap();
        answers.apply(patch);
        assert_eq!(answers.product, "Tea");
        assert_eq!(answers.budget, "900");
    }
}
