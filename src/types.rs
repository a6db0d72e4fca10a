//! Common Types and Constants
//!
//! Shared data structures used across all mastery modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MasteryError;

// ==================== Constants ====================

/// Highest help level an attempt can record (full worked solution shown)
pub const MAX_HELP_LEVEL: u8 = 3;

/// Default confidence gate for mastery classification
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

// ==================== Input Types ====================

/// One problem-solving event from a learner's session log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Skills exercised by the problem (order irrelevant)
    pub skill_ids: Vec<String>,
    /// Whether the answer was correct
    pub is_correct: bool,
    /// 0 = none, 1 = hint, 2 = significant help, 3 = full solution
    pub help_level: u8,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Raw answer as typed; carried for callers, unused by the engine
    pub answer: Option<String>,
}

impl Attempt {
    pub fn new(
        timestamp: i64,
        skill_ids: Vec<String>,
        is_correct: bool,
        help_level: u8,
        response_time_ms: u64,
    ) -> Self {
        Self {
            timestamp,
            skill_ids,
            is_correct,
            help_level,
            response_time_ms,
            answer: None,
        }
    }
}

/// One learner's full attempt history, used for batch computation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerHistory {
    pub learner_id: String,
    pub attempts: Vec<Attempt>,
}

/// Per-skill BKT parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillParams {
    /// Probability the skill is known before any exposure
    pub p_init: f64,
    /// Probability of unknown -> known per exposure
    pub p_learn: f64,
    /// Probability of an incorrect answer despite knowing
    pub p_slip: f64,
    /// Probability of a correct answer despite not knowing
    pub p_guess: f64,
}

impl SkillParams {
    pub fn new(p_init: f64, p_learn: f64, p_slip: f64, p_guess: f64) -> Self {
        Self {
            p_init,
            p_learn,
            p_slip,
            p_guess,
        }
    }

    /// Returns the name of the first field that is non-finite or outside [0, 1]
    pub fn invalid_field(&self) -> Option<&'static str> {
        [
            ("pInit", self.p_init),
            ("pLearn", self.p_learn),
            ("pSlip", self.p_slip),
            ("pGuess", self.p_guess),
        ]
        .into_iter()
        .find(|(_, value)| !crate::sanitize::is_probability(*value))
        .map(|(name, _)| name)
    }
}

/// Options for one compute call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeOptions {
    /// Minimum confidence before a skill is labelled mastered or struggling
    pub confidence_threshold: f64,
    /// Reserved: accepted but ignored until an aggregation strategy exists
    pub use_cross_student_priors: bool,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            use_cross_student_priors: false,
        }
    }
}

impl ComputeOptions {
    /// The confidence threshold must be a finite value in [0, 1]
    pub fn validate(&self) -> Result<(), MasteryError> {
        if crate::sanitize::is_probability(self.confidence_threshold) {
            Ok(())
        } else {
            Err(MasteryError::InvalidConfig(format!(
                "confidenceThreshold must be in [0, 1], got {}",
                self.confidence_threshold
            )))
        }
    }
}

// ==================== Replay State ====================

/// Accumulated per-skill state during one replay pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillState {
    pub skill_id: String,
    /// Current posterior P(known), always in [0, 1]
    pub p_known: f64,
    /// Attempts that referenced this skill
    pub opportunities: u32,
    /// Correct attempts that referenced this skill
    pub success_count: u32,
    /// Timestamp of the most recent attempt touching this skill
    pub last_practiced_at: Option<i64>,
    /// Parameters the state was initialized with
    pub params: SkillParams,
}

impl SkillState {
    /// Fresh state for a skill seen for the first time
    pub fn new(skill_id: impl Into<String>, params: SkillParams) -> Self {
        Self {
            skill_id: skill_id.into(),
            p_known: crate::sanitize::clamp_probability(params.p_init),
            opportunities: 0,
            success_count: 0,
            last_practiced_at: None,
            params,
        }
    }
}

/// Counters for attempts and updates the replay recovered from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayDiagnostics {
    /// Attempts folded into skill state
    pub attempts_processed: u32,
    /// Attempts skipped because they named no skill
    pub attempts_skipped: u32,
    /// Skill updates where the observation had ~zero likelihood and the prior was kept
    pub degenerate_updates: u32,
}

// ==================== Output Types ====================

/// Confidence-gated mastery label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryClassification {
    Mastered,
    Learning,
    Struggling,
}

impl MasteryClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryClassification::Mastered => "mastered",
            MasteryClassification::Learning => "learning",
            MasteryClassification::Struggling => "struggling",
        }
    }
}

/// Symmetric band around pKnown, clamped to [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyRange {
    pub low: f64,
    pub high: f64,
}

/// Per-skill summary consumed by the dashboard and problem generator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMasteryResult {
    pub skill_id: String,
    pub p_known: f64,
    pub confidence: f64,
    pub uncertainty_range: UncertaintyRange,
    pub opportunities: u32,
    pub success_count: u32,
    pub last_practiced_at: Option<i64>,
    pub classification: MasteryClassification,
}

impl SkillMasteryResult {
    /// Whole days since the skill was last practiced.
    ///
    /// Staleness is a display signal only; it never feeds back into `p_known`.
    pub fn days_since_practice(&self, now: DateTime<Utc>) -> Option<i64> {
        let last = DateTime::<Utc>::from_timestamp_millis(self.last_practiced_at?)?;
        Some(now.signed_duration_since(last).num_days().max(0))
    }
}

/// Full compute output for one learner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryReport {
    /// All skills, ascending by pKnown (struggling first)
    pub skills: Vec<SkillMasteryResult>,
    /// Skills classified struggling
    pub intervention_needed: Vec<SkillMasteryResult>,
    /// Skills classified mastered
    pub strengths: Vec<SkillMasteryResult>,
    pub diagnostics: ReplayDiagnostics,
}

impl MasteryReport {
    pub fn skill(&self, skill_id: &str) -> Option<&SkillMasteryResult> {
        self.skills.iter().find(|s| s.skill_id == skill_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_result(last_practiced_at: Option<i64>) -> SkillMasteryResult {
        SkillMasteryResult {
            skill_id: "basic.add".to_string(),
            p_known: 0.6,
            confidence: 0.4,
            uncertainty_range: UncertaintyRange { low: 0.42, high: 0.78 },
            opportunities: 4,
            success_count: 3,
            last_practiced_at,
            classification: MasteryClassification::Learning,
        }
    }

    #[test]
    fn test_skill_params_validation() {
        assert_eq!(SkillParams::new(0.1, 0.3, 0.1, 0.05).invalid_field(), None);
        assert_eq!(SkillParams::new(0.0, 1.0, 0.0, 1.0).invalid_field(), None);
        assert_eq!(
            SkillParams::new(1.2, 0.3, 0.1, 0.05).invalid_field(),
            Some("pInit")
        );
        assert_eq!(
            SkillParams::new(0.1, 0.3, f64::NAN, 0.05).invalid_field(),
            Some("pSlip")
        );
        assert_eq!(
            SkillParams::new(0.1, 0.3, 0.1, -0.01).invalid_field(),
            Some("pGuess")
        );
    }

    #[test]
    fn test_new_skill_state_starts_at_p_init() {
        let state = SkillState::new("basic.add", SkillParams::new(0.25, 0.1, 0.1, 0.2));
        assert_eq!(state.p_known, 0.25);
        assert_eq!(state.opportunities, 0);
        assert_eq!(state.success_count, 0);
        assert_eq!(state.last_practiced_at, None);
    }

    #[test]
    fn test_compute_options_threshold_validation() {
        assert!(ComputeOptions::default().validate().is_ok());
        for threshold in [0.0, 1.0] {
            let options = ComputeOptions {
                confidence_threshold: threshold,
                use_cross_student_priors: false,
            };
            assert!(options.validate().is_ok());
        }
        for threshold in [f64::NAN, f64::NEG_INFINITY, -0.01, 1.01] {
            let options = ComputeOptions {
                confidence_threshold: threshold,
                use_cross_student_priors: true,
            };
            assert!(matches!(options.validate(), Err(MasteryError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_days_since_practice() {
        let last = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 11, 0, 0).unwrap();
        let result = sample_result(Some(last.timestamp_millis()));
        assert_eq!(result.days_since_practice(now), Some(9));
        assert_eq!(result.days_since_practice(last), Some(0));
    }

    #[test]
    fn test_days_since_practice_never_practiced() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 11, 0, 0).unwrap();
        assert_eq!(sample_result(None).days_since_practice(now), None);
    }

    #[test]
    fn test_classification_serializes_lowercase() {
        let json = serde_json::to_string(&MasteryClassification::Struggling).unwrap();
        assert_eq!(json, "\"struggling\"");
        assert_eq!(MasteryClassification::Mastered.as_str(), "mastered");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(sample_result(Some(5))).unwrap();
        assert!(json.get("pKnown").is_some());
        assert!(json.get("uncertaintyRange").is_some());
        assert!(json.get("lastPracticedAt").is_some());
    }
}
