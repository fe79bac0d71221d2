//! Wizard state machine: Landing → Onboarding(1..=6) → Results → Landing.
//!
//! Steps: 1 product, 2 budget, 3 customers, 4 growth goal, 5 CSV upload
//! (skippable), 6 review and generate.
//!
//! Generation is split in two halves so the session lock is not held across
//! the remote call. `begin_generation` hands out a ticket; `complete_generation`
//! applies the result only if that ticket is still current. Going back or
//! resetting in between invalidates the ticket and the late result is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::dataset::{analyze_rows, CsvInsight, ParsedRow};
use crate::models::answers::{AnswersPatch, UserAnswers};
use crate::models::strategy::{BudgetCheck, StrategyOutcome};
use crate::strategy::parse_budget;

pub const FIRST_STEP: u8 = 1;
pub const UPLOAD_STEP: u8 = 5;
pub const TOTAL_STEPS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Stage {
    Landing,
    Onboarding { step: u8 },
    Results,
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Landing => "landing",
            Stage::Onboarding { .. } => "onboarding",
            Stage::Results => "results",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("'{action}' is not allowed while the wizard is in {stage}")]
    WrongStage {
        action: &'static str,
        stage: &'static str,
    },

    #[error("step {0} is not complete")]
    StepIncomplete(u8),

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the last step; generate the strategy instead")]
    AtLastStep,

    #[error("the upload can only be skipped at step 5")]
    NotAtUploadStep,

    #[error("a strategy is already being generated")]
    GenerationInProgress,
}

/// An uploaded dataset reduced to what the strategy needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub file_name: Option<String>,
    pub row_count: usize,
}

#[derive(Debug, Clone)]
struct Upload {
    summary: UploadSummary,
    insight: CsvInsight,
}

/// Proof that a generation was started. Only the latest ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// Everything the strategy requester needs, copied out of the session.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub ticket: GenerationTicket,
    pub answers: UserAnswers,
    pub insight: CsvInsight,
}

#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    stage: Stage,
    answers: UserAnswers,
    upload: Option<Upload>,
    strategy: Option<StrategyOutcome>,
    generation: u64,
    pending: Option<GenerationTicket>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub stage: Stage,
    pub total_steps: u8,
    pub progress_percent: u8,
    pub can_go_next: bool,
    pub can_go_back: bool,
    pub generating: bool,
    pub answers: UserAnswers,
    pub upload: Option<UploadSummary>,
    pub insight: Option<CsvInsight>,
    pub strategy: Option<StrategyOutcome>,
    pub budget_check: Option<BudgetCheck>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            stage: Stage::Landing,
            answers: UserAnswers::default(),
            upload: None,
            strategy: None,
            generation: 0,
            pending: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Time of the last state change.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Landing → Onboarding(1).
    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.stage {
            Stage::Landing => {
                self.stage = Stage::Onboarding { step: FIRST_STEP };
                self.touch();
                Ok(())
            }
            other => Err(wrong_stage("start", other)),
        }
    }

    pub fn update_answers(&mut self, patch: AnswersPatch) -> Result<(), TransitionError> {
        self.require_onboarding("update answers")?;
        self.require_idle()?;
        self.answers.apply(patch);
        self.touch();
        Ok(())
    }

    /// Stores the parsed rows of an upload. Rejected uploads never reach here,
    /// so an invalid file leaves the session untouched.
    pub fn attach_upload(
        &mut self,
        file_name: Option<String>,
        rows: &[ParsedRow],
    ) -> Result<(), TransitionError> {
        self.require_onboarding("upload a file")?;
        self.require_idle()?;
        self.upload = Some(Upload {
            summary: UploadSummary {
                file_name,
                row_count: rows.len(),
            },
            insight: analyze_rows(rows),
        });
        self.touch();
        Ok(())
    }

    /// Completion predicate that gates "next" for each step.
    pub fn is_step_complete(&self, step: u8) -> bool {
        match step {
            1 => !self.answers.product.trim().is_empty(),
            2 => !self.answers.budget.trim().is_empty(),
            3 => !self.answers.customers.trim().is_empty(),
            4 => !self.answers.growth_goal.trim().is_empty(),
            UPLOAD_STEP => self.upload.is_some(),
            _ => false,
        }
    }

    pub fn next(&mut self) -> Result<(), TransitionError> {
        let step = self.require_onboarding("go to the next step")?;
        if step >= TOTAL_STEPS {
            return Err(TransitionError::AtLastStep);
        }
        if !self.is_step_complete(step) {
            return Err(TransitionError::StepIncomplete(step));
        }
        self.stage = Stage::Onboarding { step: step + 1 };
        self.touch();
        Ok(())
    }

    /// Always allowed after step 1. Cancels a pending generation.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        let step = self.require_onboarding("go back")?;
        if step <= FIRST_STEP {
            return Err(TransitionError::AtFirstStep);
        }
        self.pending = None;
        self.stage = Stage::Onboarding { step: step - 1 };
        self.touch();
        Ok(())
    }

    pub fn skip_upload(&mut self) -> Result<(), TransitionError> {
        let step = self.require_onboarding("skip the upload")?;
        if step != UPLOAD_STEP {
            return Err(TransitionError::NotAtUploadStep);
        }
        self.stage = Stage::Onboarding {
            step: UPLOAD_STEP + 1,
        };
        self.touch();
        Ok(())
    }

    /// Starts a generation from the review step and snapshots its inputs.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, TransitionError> {
        let step = self.require_onboarding("generate a strategy")?;
        if step != TOTAL_STEPS {
            return Err(wrong_stage("generate a strategy", self.stage));
        }
        self.require_idle()?;

        self.generation += 1;
        let ticket = GenerationTicket(self.generation);
        self.pending = Some(ticket);
        self.touch();

        Ok(GenerationRequest {
            ticket,
            answers: self.answers.clone(),
            insight: self
                .upload
                .as_ref()
                .map(|u| u.insight.clone())
                .unwrap_or_default(),
        })
    }

    /// Applies a finished generation. Returns `false` and leaves the session
    /// alone when the ticket was invalidated in the meantime.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: StrategyOutcome,
    ) -> bool {
        let current = self.pending == Some(ticket)
            && self.stage == Stage::Onboarding { step: TOTAL_STEPS };
        if !current {
            return false;
        }
        self.pending = None;
        self.strategy = Some(outcome);
        self.stage = Stage::Results;
        self.touch();
        true
    }

    /// Releases a generation whose caller went away before completing it.
    /// Only the current ticket is released; a newer generation is left alone.
    pub fn abandon_generation(&mut self, ticket: GenerationTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.touch();
        true
    }

    /// "Start over": back to Landing with every answer discarded.
    pub fn reset(&mut self) {
        self.stage = Stage::Landing;
        self.answers = UserAnswers::default();
        self.upload = None;
        self.strategy = None;
        self.pending = None;
        self.touch();
    }

    pub fn view(&self) -> SessionView {
        let (progress_percent, can_go_next, can_go_back) = match self.stage {
            Stage::Onboarding { step } => (
                ((u16::from(step) * 100 + u16::from(TOTAL_STEPS) / 2) / u16::from(TOTAL_STEPS))
                    as u8,
                step < TOTAL_STEPS && self.is_step_complete(step),
                step > FIRST_STEP,
            ),
            Stage::Results => (100, false, false),
            Stage::Landing => (0, false, false),
        };

        let budget_check = self
            .strategy
            .as_ref()
            .map(|s| BudgetCheck::evaluate(s.strategy(), parse_budget(&self.answers.budget)));

        SessionView {
            id: self.id,
            stage: self.stage,
            total_steps: TOTAL_STEPS,
            progress_percent,
            can_go_next,
            can_go_back,
            generating: self.is_generating(),
            answers: self.answers.clone(),
            upload: self.upload.as_ref().map(|u| u.summary.clone()),
            insight: self.upload.as_ref().map(|u| u.insight.clone()),
            strategy: self.strategy.clone(),
            budget_check,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn require_onboarding(&self, action: &'static str) -> Result<u8, TransitionError> {
        match self.stage {
            Stage::Onboarding { step } => Ok(step),
            other => Err(wrong_stage(action, other)),
        }
    }

    fn require_idle(&self) -> Result<(), TransitionError> {
        if self.pending.is_some() {
            return Err(TransitionError::GenerationInProgress);
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_stage(action: &'static str, stage: Stage) -> TransitionError {
    TransitionError::WrongStage {
        action,
        stage: stage.label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::csv::parse_csv;
    use crate::models::strategy::StrategyData;
    use crate::strategy::fallback::fallback_strategy;

    fn patch(product: &str, budget: &str, customers: &str, goal: &str) -> AnswersPatch {
        AnswersPatch {
            product: Some(product.to_string()),
            budget: Some(budget.to_string()),
            customers: Some(customers.to_string()),
            growth_goal: Some(goal.to_string()),
        }
    }

    /// Session parked on the review step with all answers filled and the upload skipped.
    fn at_review_step() -> WizardSession {
        let mut session = WizardSession::new();
        session.start().unwrap();
        session
            .update_answers(patch("Candles", "1500", "Gift buyers", "Grow 20%"))
            .unwrap();
        for _ in 1..UPLOAD_STEP {
            session.next().unwrap();
        }
        session.skip_upload().unwrap();
        assert_eq!(session.stage(), Stage::Onboarding { step: TOTAL_STEPS });
        session
    }

    fn fallback_outcome() -> StrategyOutcome {
        StrategyOutcome::Fallback {
            strategy: fallback_strategy("1500"),
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_start_moves_landing_to_first_step() {
        let mut session = WizardSession::new();
        assert_eq!(session.stage(), Stage::Landing);
        session.start().unwrap();
        assert_eq!(session.stage(), Stage::Onboarding { step: 1 });
        assert!(session.start().is_err());
    }

    #[test]
    fn test_next_is_gated_by_step_completion() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        assert_eq!(session.next(), Err(TransitionError::StepIncomplete(1)));

        session
            .update_answers(AnswersPatch {
                product: Some("Candles".to_string()),
                ..Default::default()
            })
            .unwrap();
        session.next().unwrap();
        assert_eq!(session.next(), Err(TransitionError::StepIncomplete(2)));
    }

    #[test]
    fn test_whitespace_does_not_complete_a_step() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        session
            .update_answers(AnswersPatch {
                product: Some("   ".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(!session.is_step_complete(1));
    }

    #[test]
    fn test_back_is_refused_at_first_step_only() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        assert_eq!(session.back(), Err(TransitionError::AtFirstStep));

        session.update_answers(patch("a", "1", "c", "d")).unwrap();
        session.next().unwrap();
        session.next().unwrap();
        session.back().unwrap();
        assert_eq!(session.stage(), Stage::Onboarding { step: 2 });
    }

    #[test]
    fn test_upload_step_needs_file_or_skip() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        session.update_answers(patch("a", "1", "c", "d")).unwrap();
        for _ in 1..UPLOAD_STEP {
            session.next().unwrap();
        }
        assert_eq!(session.next(), Err(TransitionError::StepIncomplete(UPLOAD_STEP)));

        let rows = parse_csv("region\nNorth\nSouth\n");
        session.attach_upload(Some("customers.csv".to_string()), &rows).unwrap();
        session.next().unwrap();
        assert_eq!(session.stage(), Stage::Onboarding { step: TOTAL_STEPS });
        assert_eq!(session.next(), Err(TransitionError::AtLastStep));
    }

    #[test]
    fn test_skip_upload_only_at_upload_step() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        assert_eq!(session.skip_upload(), Err(TransitionError::NotAtUploadStep));
    }

    #[test]
    fn test_generation_moves_to_results() {
        let mut session = at_review_step();
        let request = session.begin_generation().unwrap();
        assert_eq!(request.answers.product, "Candles");
        assert!(request.insight.is_empty());
        assert!(session.is_generating());

        assert!(session.complete_generation(request.ticket, fallback_outcome()));
        assert_eq!(session.stage(), Stage::Results);
        let view = session.view();
        assert!(view.strategy.unwrap().is_fallback());
        assert!(view.budget_check.unwrap().consistent);
    }

    #[test]
    fn test_generation_only_from_review_step() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        assert!(matches!(
            session.begin_generation(),
            Err(TransitionError::WrongStage { .. })
        ));
    }

    #[test]
    fn test_concurrent_generation_is_refused() {
        let mut session = at_review_step();
        session.begin_generation().unwrap();
        assert_eq!(
            session.begin_generation().unwrap_err(),
            TransitionError::GenerationInProgress
        );
    }

    #[test]
    fn test_back_during_generation_discards_late_result() {
        let mut session = at_review_step();
        let request = session.begin_generation().unwrap();
        session.back().unwrap();
        assert!(!session.is_generating());

        assert!(!session.complete_generation(request.ticket, fallback_outcome()));
        assert_eq!(session.stage(), Stage::Onboarding { step: UPLOAD_STEP });
        assert!(session.view().strategy.is_none());
    }

    #[test]
    fn test_stale_ticket_does_not_complete_newer_generation() {
        let mut session = at_review_step();
        let stale = session.begin_generation().unwrap();
        session.back().unwrap();
        session.skip_upload().unwrap();
        let fresh = session.begin_generation().unwrap();

        assert!(!session.complete_generation(stale.ticket, fallback_outcome()));
        assert!(session.is_generating());
        assert!(session.complete_generation(
            fresh.ticket,
            StrategyOutcome::Generated {
                strategy: StrategyData::default()
            }
        ));
        assert!(!session.view().strategy.unwrap().is_fallback());
    }

    #[test]
    fn test_reset_discards_everything_and_pending_result() {
        let mut session = at_review_step();
        let request = session.begin_generation().unwrap();
        session.reset();
        assert_eq!(session.stage(), Stage::Landing);
        assert_eq!(session.view().answers, UserAnswers::default());
        assert!(!session.complete_generation(request.ticket, fallback_outcome()));
        assert_eq!(session.stage(), Stage::Landing);
    }

    #[test]
    fn test_view_progress() {
        let mut session = WizardSession::new();
        assert_eq!(session.view().progress_percent, 0);
        session.start().unwrap();
        let view = session.view();
        assert_eq!(view.progress_percent, 17);
        assert!(!view.can_go_back);
        assert!(!view.can_go_next);
    }

    #[test]
    fn test_view_serializes_stage_with_step() {
        let mut session = WizardSession::new();
        session.start().unwrap();
        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["stage"]["name"], "onboarding");
        assert_eq!(json["stage"]["step"], 1);
        assert_eq!(json["totalSteps"], 6);
    }

    #[test]
    fn test_abandoned_generation_unlocks_the_session() {
        let mut session = at_review_step();
        let request = session.begin_generation().unwrap();
        assert_eq!(
            session.update_answers(AnswersPatch::default()),
            Err(TransitionError::GenerationInProgress)
        );

        assert!(session.abandon_generation(request.ticket));
        assert!(!session.is_generating());
        assert_eq!(session.stage(), Stage::Onboarding { step: TOTAL_STEPS });
        assert!(session.update_answers(AnswersPatch::default()).is_ok());
        assert!(!session.complete_generation(request.ticket, fallback_outcome()));
    }

    #[test]
    fn test_abandoning_a_stale_ticket_keeps_the_newer_generation() {
        let mut session = at_review_step();
        let stale = session.begin_generation().unwrap();
        session.back().unwrap();
        session.skip_upload().unwrap();
        let fresh = session.begin_generation().unwrap();

        assert!(!session.abandon_generation(stale.ticket));
        assert!(session.is_generating());
        assert!(session.complete_generation(fresh.ticket, fallback_outcome()));
    }

    #[test]
    fn test_view_survives_oversized_remote_amounts() {
        let mut session = at_review_step();
        let request = session.begin_generation().unwrap();
        let strategy: StrategyData = serde_json::from_value(serde_json::json!({
            "budgetAllocation": [
                {"category": "Ads", "amount": 1e19, "percentage": 60},
                {"category": "Tools", "amount": 1e19, "percentage": 40}
            ]
        }))
        .unwrap();
        assert!(session.complete_generation(request.ticket, StrategyOutcome::Generated { strategy }));

        let check = session.view().budget_check.unwrap();
        assert_eq!(check.allocated_amount, u64::MAX);
        assert!(!check.consistent);
    }
}
