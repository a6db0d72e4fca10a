//! Bayesian Knowledge Tracing - single-skill update
//!
//! Core theory:
//! - A skill is a hidden binary state: known / not known
//! - Each observation (correct / incorrect) updates P(known) via Bayes' rule
//! - Each exposure may also teach the skill (learning transition)
//!
//! Mathematical formulas:
//! - Correct:   P(L|C) = P(L)(1-S) / [P(L)(1-S) + (1-P(L))G]
//! - Incorrect: P(L|W) = P(L)S / [P(L)S + (1-P(L))(1-G)]
//! - Learning:  P(L') = P(L) + (1-P(L))T
//!   - S: slip, G: guess, T: learn
//!
//! When the observation likelihood (the denominator) is numerically zero the
//! update is degenerate and the prior is returned unchanged.
//!
//! References:
//! - Corbett, A. T., & Anderson, J. R. (1994). Knowledge tracing.

use crate::config::DEFAULT_DEGENERATE_EPSILON;
use crate::sanitize::clamp_probability;
use crate::types::SkillParams;

/// Posterior of one observation update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BktOutcome {
    /// Posterior P(known), in [0, 1]
    pub posterior: f64,
    /// True when the observation had ~zero likelihood and the prior was kept
    pub degenerate: bool,
}

/// Update P(known) from one observation, using the default degenerate epsilon
pub fn bkt_update(prior: f64, is_correct: bool, params: &SkillParams) -> f64 {
    bkt_update_checked(prior, is_correct, params, DEFAULT_DEGENERATE_EPSILON).posterior
}

/// Update P(known) from one observation, reporting degenerate evidence
pub fn bkt_update_checked(
    prior: f64,
    is_correct: bool,
    params: &SkillParams,
    degenerate_epsilon: f64,
) -> BktOutcome {
    let prior = clamp_probability(prior);
    let slip = clamp_probability(params.p_slip);
    let guess = clamp_probability(params.p_guess);

    let (numerator, likelihood) = if is_correct {
        let known = prior * (1.0 - slip);
        (known, known + (1.0 - prior) * guess)
    } else {
        let known = prior * slip;
        (known, known + (1.0 - prior) * (1.0 - guess))
    };

    if likelihood.is_nan() || likelihood < degenerate_epsilon {
        return BktOutcome {
            posterior: prior,
            degenerate: true,
        };
    }

    BktOutcome {
        posterior: clamp_probability(numerator / likelihood),
        degenerate: false,
    }
}

/// Learning transition applied after an observation
pub fn apply_learning(p_known: f64, p_learn: f64) -> f64 {
    let p = clamp_probability(p_known);
    clamp_probability(p + (1.0 - p) * clamp_probability(p_learn))
}

// ==================== Unit Tests ====================
