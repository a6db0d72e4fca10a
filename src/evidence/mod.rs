//! Evidence Quality Weighting
//!
//! Scales how far one observation may move a skill's estimate:
//! - Help level: self-produced answers count fully, hinted ones less
//! - Response time vs. expected:
//!   - fast correct is strong, slow correct suggests struggle
//!   - very fast wrong looks like a slip, slow wrong looks like confusion
//!
//! weight = helpLevelWeight × responseTimeWeight, which may exceed 1.
//! Callers blending with this weight must clamp the result.

use crate::config::EvidenceConfig;
use crate::types::{Attempt, MAX_HELP_LEVEL};

/// Weight for a help level; levels above the maximum count as full help
pub fn help_level_weight(level: u8, config: &EvidenceConfig) -> f64 {
    config.help_weights[level.min(MAX_HELP_LEVEL) as usize]
}

pub fn response_time_weight(
    response_time_ms: u64,
    is_correct: bool,
    config: &EvidenceConfig,
) -> f64 {
    let ratio = response_time_ms as f64 / config.expected_response_ms;

    if is_correct {
        if ratio < config.correct_fast_ratio {
            config.correct_fast_weight
        } else if ratio > config.correct_slow_ratio {
            config.correct_slow_weight
        } else {
            1.0
        }
    } else if ratio < config.incorrect_fast_ratio {
        config.incorrect_fast_weight
    } else if ratio > config.incorrect_slow_ratio {
        config.incorrect_slow_weight
    } else {
        1.0
    }
}

/// Combined evidence weight for one attempt, shared by all its skills
pub fn evidence_weight(attempt: &Attempt, config: &EvidenceConfig) -> f64 {
    help_level_weight(attempt.help_level, config)
        * response_time_weight(attempt.response_time_ms, attempt.is_correct, config)
}
