//! Mastery Classification & Complexity Mapping
//!
//! Classification (confidence-gated):
//! - mastered:   pKnown ≥ 0.8 and confidence ≥ threshold
//! - struggling: pKnown < 0.5 and confidence ≥ threshold
//! - learning:   everything else, including any low-confidence estimate
//!
//! Complexity multiplier for the problem generator:
//! - Adaptive: 4 - 3·pKnown ∈ [1, 4], only with confidence ≥ 0.5 and ≥ 20 opportunities
//! - Otherwise the decision is `InsufficientConfidence` and the caller falls
//!   back to the classic fluency table

use serde::{Deserialize, Serialize};

use crate::config::{ClassificationConfig, ComplexityConfig};
use crate::sanitize::clamp_probability;
use crate::types::{MasteryClassification, SkillMasteryResult};

// ==================== Classification ====================

pub fn classify(
    p_known: f64,
    confidence: f64,
    confidence_threshold: f64,
    config: &ClassificationConfig,
) -> MasteryClassification {
    if confidence.is_nan() || confidence_threshold.is_nan() || confidence < confidence_threshold {
        return MasteryClassification::Learning;
    }
    if p_known >= config.mastered_p_known {
        MasteryClassification::Mastered
    } else if p_known < config.struggling_p_known {
        MasteryClassification::Struggling
    } else {
        MasteryClassification::Learning
    }
}

// ==================== Complexity ====================

/// Whether the mastery estimate is trustworthy enough to drive difficulty
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ComplexityDecision {
    Adaptive {
        multiplier: f64,
    },
    #[serde(rename_all = "camelCase")]
    InsufficientConfidence {
        confidence: f64,
        opportunities: u32,
    },
}

impl ComplexityDecision {
    pub fn multiplier(&self) -> Option<f64> {
        match self {
            ComplexityDecision::Adaptive { multiplier } => Some(*multiplier),
            ComplexityDecision::InsufficientConfidence { .. } => None,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self, ComplexityDecision::Adaptive { .. })
    }
}

pub fn complexity_decision(
    p_known: f64,
    confidence: f64,
    opportunities: u32,
    config: &ComplexityConfig,
) -> ComplexityDecision {
    if confidence < config.min_confidence || opportunities < config.min_opportunities {
        return ComplexityDecision::InsufficientConfidence {
            confidence,
            opportunities,
        };
    }

    let lightest = config.max_multiplier - config.multiplier_span;
    let multiplier = (config.max_multiplier - clamp_probability(p_known) * config.multiplier_span)
        .clamp(lightest, config.max_multiplier);
    ComplexityDecision::Adaptive { multiplier }
}

/// Fluency label computed by the caller from raw streak/accuracy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluencyState {
    Effortless,
    Fluent,
    Rusty,
    Practicing,
    NotPracticing,
}

impl FluencyState {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "effortless" => Some(FluencyState::Effortless),
            "fluent" => Some(FluencyState::Fluent),
            "rusty" => Some(FluencyState::Rusty),
            "practicing" => Some(FluencyState::Practicing),
            "not_practicing" => Some(FluencyState::NotPracticing),
            _ => None,
        }
    }

    pub fn classic_multiplier(&self) -> f64 {
        match self {
            FluencyState::Effortless => 1.0,
            FluencyState::Fluent => 2.0,
            FluencyState::Rusty => 3.0,
            FluencyState::Practicing => 3.0,
            FluencyState::NotPracticing => 4.0,
        }
    }
}

/// Adaptive multiplier when available, otherwise the classic fluency multiplier
pub fn resolve_multiplier(decision: &ComplexityDecision, fluency: FluencyState) -> f64 {
    decision
        .multiplier()
        .unwrap_or_else(|| fluency.classic_multiplier())
}

// ==================== Session Mode ====================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Adaptive,
    Classic,
}

/// Adaptive only when every targeted skill has a result that passes the adaptive gate
pub fn select_session_mode<S: AsRef<str>>(
    results: &[SkillMasteryResult],
    target_skills: &[S],
    config: &ComplexityConfig,
) -> SessionMode {
    if target_skills.is_empty() {
        return SessionMode::Classic;
    }

    let all_confident = target_skills.iter().all(|skill| {
        results
            .iter()
            .find(|r| r.skill_id == skill.as_ref())
            .map(|r| {
                complexity_decision(r.p_known, r.confidence, r.opportunities, config).is_adaptive()
            })
            .unwrap_or(false)
    });

    if all_confident {
        SessionMode::Adaptive
    } else {
        SessionMode::Classic
    }
}
