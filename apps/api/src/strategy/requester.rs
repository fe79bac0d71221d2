//! Strategy Requester: turns a business profile into a strategy.
//!
//! Flow: build prompt → remote generation → extract `{...}` span → parse into
//! `StrategyData`. Any failure on the way produces the deterministic fallback
//! instead, tagged so callers can tell the two apart.

use thiserror::Error;
use tracing::{info, warn};

use crate::dataset::CsvInsight;
use crate::llm_client::prompts::{fill_template, REALISM_INSTRUCTION};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::answers::UserAnswers;
use crate::models::strategy::{StrategyData, StrategyOutcome};
use crate::strategy::benchmarks::benchmark_block;
use crate::strategy::fallback::{
    parse_budget, strategy_for_budget, HIGH_TIER_MIN, MEDIUM_TIER_MIN,
};
use crate::strategy::prompts::{
    CSV_CONTEXT_TEMPLATE, NO_CSV_CONTEXT, STRATEGY_PROMPT_TEMPLATE, STRATEGY_SYSTEM,
};

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("remote generation failed: {0}")]
    Remote(#[from] LlmError),

    #[error("no JSON object found in response")]
    MissingJson,

    #[error("malformed JSON in response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Produces a strategy for the profile. Never fails: remote or parse errors
/// are logged and answered with the fallback strategy.
pub async fn request_strategy(
    generator: &dyn TextGenerator,
    answers: &UserAnswers,
    insight: &CsvInsight,
) -> StrategyOutcome {
    match generate_strategy(generator, answers, insight).await {
        Ok(strategy) => {
            info!(
                "Strategy generated by {}: {} campaigns, {} segments",
                generator.backend(),
                strategy.campaigns.len(),
                strategy.target_segments.len()
            );
            StrategyOutcome::Generated { strategy }
        }
        Err(e) => {
            let budget = parse_budget(&answers.budget);
            warn!("Strategy generation failed, using fallback for budget {budget}: {e}");
            StrategyOutcome::Fallback {
                strategy: strategy_for_budget(budget),
                reason: e.to_string(),
            }
        }
    }
}

/// The remote path alone, without fallback.
pub async fn generate_strategy(
    generator: &dyn TextGenerator,
    answers: &UserAnswers,
    insight: &CsvInsight,
) -> Result<StrategyData, StrategyError> {
    let prompt = build_strategy_prompt(answers, insight);
    let text = generator.generate(&prompt, STRATEGY_SYSTEM).await?;
    parse_strategy_response(&text)
}

/// Parses the model's free text into a strategy.
pub fn parse_strategy_response(text: &str) -> Result<StrategyData, StrategyError> {
    let span = extract_json_object(text).ok_or(StrategyError::MissingJson)?;
    Ok(serde_json::from_str(span)?)
}

/// Greedy match from the first `{` to the last `}`, so prose before and after
/// the object is ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Fills the strategy template with the profile, CSV context, tier rules and benchmarks.
pub fn build_strategy_prompt(answers: &UserAnswers, insight: &CsvInsight) -> String {
    let budget = format_budget(parse_budget(&answers.budget));
    let csv_context = csv_context(insight);
    let low_max = format_budget(MEDIUM_TIER_MIN);
    let high_min = format_budget(HIGH_TIER_MIN);
    let benchmarks = benchmark_block();

    fill_template(
        STRATEGY_PROMPT_TEMPLATE,
        &[
            ("product", answers.product.trim()),
            ("budget", budget.as_str()),
            ("customers", answers.customers.trim()),
            ("growth_goal", answers.growth_goal.trim()),
            ("csv_context", csv_context.as_str()),
            ("low_max", low_max.as_str()),
            ("high_min", high_min.as_str()),
            ("benchmarks", benchmarks.as_str()),
            ("realism_instruction", REALISM_INSTRUCTION),
        ],
    )
}

fn csv_context(insight: &CsvInsight) -> String {
    if insight.is_empty() {
        return NO_CSV_CONTEXT.to_string();
    }

    let total_rows = insight.total_rows.to_string();
    let columns = insight.columns.join(", ");
    let insights = insight.insights.join("; ");
    let sample_json = serde_json::to_string(&insight.sample_data).unwrap_or_else(|_| "[]".into());

    fill_template(
        CSV_CONTEXT_TEMPLATE,
        &[
            ("total_rows", total_rows.as_str()),
            ("columns", columns.as_str()),
            ("insights", insights.as_str()),
            ("sample_json", sample_json.as_str()),
        ],
    )
}

fn format_budget(budget: f64) -> String {
    if budget.fract() == 0.0 {
        format!("{budget:.0}")
    } else {
        format!("{budget:.2}")
    }
}
