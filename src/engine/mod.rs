//! Mastery Engine
//!
//! Entry point tying the pipeline together:
//! attempts → replay → confidence / uncertainty → classification → report.
//!
//! Each call recomputes from the full history. Learners share nothing, so
//! batch computation runs them in parallel.

use rayon::prelude::*;
use tracing::debug;

use crate::classify::{
    classify, complexity_decision, select_session_mode, ComplexityDecision, SessionMode,
};
use crate::confidence::{compute_confidence, success_rate, uncertainty_range};
use crate::config::EngineConfig;
use crate::error::MasteryError;
use crate::priors::SkillPriorTable;
use crate::replay::HistoryReplayer;
use crate::types::{
    Attempt, ComputeOptions, LearnerHistory, MasteryClassification, MasteryReport,
    SkillMasteryResult, SkillState,
};

/// Mastery engine: an immutable prior table and config shared by every compute call
#[derive(Debug)]
pub struct MasteryEngine {
    priors: SkillPriorTable,
    config: EngineConfig,
}

impl MasteryEngine {
    pub fn new(priors: SkillPriorTable, config: EngineConfig) -> Result<Self, MasteryError> {
        config.validate()?;
        Ok(Self { priors, config })
    }

    pub fn priors(&self) -> &SkillPriorTable {
        &self.priors
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the mastery report for one learner's history
    pub fn compute(
        &self,
        attempts: &[Attempt],
        options: &ComputeOptions,
    ) -> Result<MasteryReport, MasteryError> {
        options.validate()?;
        if options.use_cross_student_priors {
            // Aggregation strategy undefined; the flag is accepted and ignored.
            debug!("useCrossStudentPriors requested but not implemented, ignoring");
        }

        let outcome = HistoryReplayer::new(&self.priors, &self.config).replay(attempts)?;

        let mut skills: Vec<SkillMasteryResult> = outcome
            .states
            .values()
            .map(|state| self.summarize(state, options.confidence_threshold))
            .collect();
        skills.sort_by(|a, b| {
            a.p_known
                .total_cmp(&b.p_known)
                .then_with(|| a.skill_id.cmp(&b.skill_id))
        });

        let intervention_needed = skills
            .iter()
            .filter(|s| s.classification == MasteryClassification::Struggling)
            .cloned()
            .collect();
        let strengths = skills
            .iter()
            .filter(|s| s.classification == MasteryClassification::Mastered)
            .cloned()
            .collect();

        Ok(MasteryReport {
            skills,
            intervention_needed,
            strengths,
            diagnostics: outcome.diagnostics,
        })
    }

    /// Compute reports for many learners in parallel, preserving input order
    pub fn compute_batch(
        &self,
        learners: &[LearnerHistory],
        options: &ComputeOptions,
    ) -> Vec<(String, Result<MasteryReport, MasteryError>)> {
        learners
            .par_iter()
            .map(|learner| {
                (
                    learner.learner_id.clone(),
                    self.compute(&learner.attempts, options),
                )
            })
            .collect()
    }

    /// Difficulty decision for one skill result
    pub fn complexity_for(&self, result: &SkillMasteryResult) -> ComplexityDecision {
        complexity_decision(
            result.p_known,
            result.confidence,
            result.opportunities,
            &self.config.complexity,
        )
    }

    /// Difficulty decision for a skill looked up by id; None if the skill was never practiced
    pub fn complexity_for_skill(
        &self,
        report: &MasteryReport,
        skill_id: &str,
    ) -> Option<ComplexityDecision> {
        report.skill(skill_id).map(|result| self.complexity_for(result))
    }

    pub fn session_mode<S: AsRef<str>>(
        &self,
        report: &MasteryReport,
        target_skills: &[S],
    ) -> SessionMode {
        select_session_mode(&report.skills, target_skills, &self.config.complexity)
    }

    fn summarize(&self, state: &SkillState, confidence_threshold: f64) -> SkillMasteryResult {
        let rate = success_rate(state.success_count, state.opportunities);
        let confidence = compute_confidence(state.opportunities, rate, &self.config.confidence);
        SkillMasteryResult {
            skill_id: state.skill_id.clone(),
            p_known: state.p_known,
            confidence,
            uncertainty_range: uncertainty_range(
                state.p_known,
                confidence,
                &self.config.confidence,
            ),
            opportunities: state.opportunities,
            success_count: state.success_count,
            last_practiced_at: state.last_practiced_at,
            classification: classify(
                state.p_known,
                confidence,
                confidence_threshold,
                &self.config.classification,
            ),
        }
    }
}
