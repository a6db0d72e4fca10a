//! Confidence & Uncertainty
//!
//! - dataConfidence = 1 - exp(-opportunities / scale)
//! - extremity = |successRate - 0.5| × 2
//! - confidence = min(1, dataConfidence + extremity × bonus)
//! - spread = (1 - confidence) × maxSpread, band = [pKnown ± spread] ∩ [0, 1]

use crate::config::ConfidenceConfig;
use crate::sanitize::clamp_probability;
use crate::types::UncertaintyRange;

/// Observed success rate; 0.5 (no extremity) when there is no data
pub fn success_rate(success_count: u32, opportunities: u32) -> f64 {
    if opportunities == 0 {
        0.5
    } else {
        success_count.min(opportunities) as f64 / opportunities as f64
    }
}

pub fn compute_confidence(opportunities: u32, success_rate: f64, config: &ConfidenceConfig) -> f64 {
    let data_confidence = 1.0 - (-(opportunities as f64) / config.opportunity_scale).exp();
    let extremity = (clamp_probability(success_rate) - 0.5).abs() * 2.0;
    clamp_probability(data_confidence + extremity * config.extremity_bonus)
}

pub fn uncertainty_range(
    p_known: f64,
    confidence: f64,
    config: &ConfidenceConfig,
) -> UncertaintyRange {
    let p = clamp_probability(p_known);
    let spread = (1.0 - clamp_probability(confidence)) * config.max_spread;
    UncertaintyRange {
        low: (p - spread).max(0.0),
        high: (p + spread).min(1.0),
    }
}
