//! Axum route handlers for the one-shot Strategy API.

use axum::{extract::Multipart, extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::dataset::upload::read_profile_form;
use crate::dataset::{analyze_rows, CsvInsight};
use crate::errors::AppError;
use crate::models::strategy::{BudgetCheck, StrategyOutcome};
use crate::state::AppState;
use crate::strategy::{parse_budget, request_strategy, BudgetTier};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResponse {
    pub outcome: StrategyOutcome,
    pub insight: CsvInsight,
    pub budget_tier: BudgetTier,
    pub budget_check: BudgetCheck,
}

/// POST /api/v1/strategy
///
/// Multipart form with `product`, `budget`, `customers`, `growthGoal` and an
/// optional CSV `file`. Always answers with a strategy; `outcome.source` says
/// whether it came from the model or the fallback generator.
pub async fn handle_generate_strategy(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StrategyResponse>, AppError> {
    let form = read_profile_form(multipart).await?;

    let rows = match &form.file {
        Some(file) => file.parse()?,
        None => Vec::new(),
    };
    let insight = analyze_rows(&rows);

    let outcome = request_strategy(state.generator.as_ref(), &form.answers, &insight).await;
    let budget = parse_budget(&form.answers.budget);
    let budget_check = BudgetCheck::evaluate(outcome.strategy(), budget);

    if !budget_check.consistent {
        info!(
            "Strategy allocation does not match budget {}: {} allocated, {}% total",
            budget, budget_check.allocated_amount, budget_check.percentage_total
        );
    }

    Ok(Json(StrategyResponse {
        outcome,
        insight,
        budget_tier: BudgetTier::for_budget(budget),
        budget_check,
    }))
}
