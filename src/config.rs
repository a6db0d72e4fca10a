//! Engine tunables.
//!
//! Every struct lists each field explicitly in its `Default`, and JSON
//! deserialization requires every field: a partial document is rejected
//! instead of being merged over defaults.

use serde::{Deserialize, Serialize};

use crate::error::MasteryError;
use crate::sanitize::{has_invalid_values, is_probability};

// ==================== Defaults ====================

pub const DEFAULT_DEGENERATE_EPSILON: f64 = 1e-9;
pub const DEFAULT_UNIFORM_BLAME_THRESHOLD: f64 = 0.001;

pub const DEFAULT_EXPECTED_RESPONSE_MS: f64 = 5000.0;
pub const DEFAULT_HELP_WEIGHTS: [f64; 4] = [1.0, 0.8, 0.5, 0.5];
pub const DEFAULT_CORRECT_FAST_RATIO: f64 = 0.5;
pub const DEFAULT_CORRECT_FAST_WEIGHT: f64 = 1.2;
pub const DEFAULT_CORRECT_SLOW_RATIO: f64 = 2.0;
pub const DEFAULT_CORRECT_SLOW_WEIGHT: f64 = 0.8;
pub const DEFAULT_INCORRECT_FAST_RATIO: f64 = 0.3;
pub const DEFAULT_INCORRECT_FAST_WEIGHT: f64 = 0.5;
pub const DEFAULT_INCORRECT_SLOW_RATIO: f64 = 2.0;
pub const DEFAULT_INCORRECT_SLOW_WEIGHT: f64 = 1.2;

pub const DEFAULT_OPPORTUNITY_SCALE: f64 = 20.0;
pub const DEFAULT_EXTREMITY_BONUS: f64 = 0.2;
pub const DEFAULT_MAX_SPREAD: f64 = 0.3;

pub const DEFAULT_MASTERED_P_KNOWN: f64 = 0.8;
pub const DEFAULT_STRUGGLING_P_KNOWN: f64 = 0.5;

pub const DEFAULT_ADAPTIVE_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_ADAPTIVE_MIN_OPPORTUNITIES: u32 = 20;
pub const DEFAULT_MAX_MULTIPLIER: f64 = 4.0;
pub const DEFAULT_MULTIPLIER_SPAN: f64 = 3.0;

// ==================== Sections ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BktConfig {
    /// Observation likelihood below which the update is a no-op
    pub degenerate_epsilon: f64,
}

impl Default for BktConfig {
    fn default() -> Self {
        Self {
            degenerate_epsilon: DEFAULT_DEGENERATE_EPSILON,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameConfig {
    /// Total unknown mass below which blame is split uniformly
    pub uniform_blame_threshold: f64,
}

impl Default for BlameConfig {
    fn default() -> Self {
        Self {
            uniform_blame_threshold: DEFAULT_UNIFORM_BLAME_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceConfig {
    pub expected_response_ms: f64,
    /// Indexed by help level 0..=3
    pub help_weights: [f64; 4],
    pub correct_fast_ratio: f64,
    pub correct_fast_weight: f64,
    pub correct_slow_ratio: f64,
    pub correct_slow_weight: f64,
    pub incorrect_fast_ratio: f64,
    pub incorrect_fast_weight: f64,
    pub incorrect_slow_ratio: f64,
    pub incorrect_slow_weight: f64,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            expected_response_ms: DEFAULT_EXPECTED_RESPONSE_MS,
            help_weights: DEFAULT_HELP_WEIGHTS,
            correct_fast_ratio: DEFAULT_CORRECT_FAST_RATIO,
            correct_fast_weight: DEFAULT_CORRECT_FAST_WEIGHT,
            correct_slow_ratio: DEFAULT_CORRECT_SLOW_RATIO,
            correct_slow_weight: DEFAULT_CORRECT_SLOW_WEIGHT,
            incorrect_fast_ratio: DEFAULT_INCORRECT_FAST_RATIO,
            incorrect_fast_weight: DEFAULT_INCORRECT_FAST_WEIGHT,
            incorrect_slow_ratio: DEFAULT_INCORRECT_SLOW_RATIO,
            incorrect_slow_weight: DEFAULT_INCORRECT_SLOW_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceConfig {
    /// Opportunities per e-fold of data confidence
    pub opportunity_scale: f64,
    /// Confidence added at 0% or 100% success
    pub extremity_bonus: f64,
    /// Half-width of the uncertainty band at zero confidence
    pub max_spread: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            opportunity_scale: DEFAULT_OPPORTUNITY_SCALE,
            extremity_bonus: DEFAULT_EXTREMITY_BONUS,
            max_spread: DEFAULT_MAX_SPREAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationConfig {
    /// pKnown at or above which a confident skill is mastered
    pub mastered_p_known: f64,
    /// pKnown below which a confident skill is struggling
    pub struggling_p_known: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            mastered_p_known: DEFAULT_MASTERED_P_KNOWN,
            struggling_p_known: DEFAULT_STRUGGLING_P_KNOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityConfig {
    pub min_confidence: f64,
    pub min_opportunities: u32,
    /// Multiplier for a fully unknown skill
    pub max_multiplier: f64,
    /// max_multiplier - span is the multiplier for a fully known skill
    pub multiplier_span: f64,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_ADAPTIVE_MIN_CONFIDENCE,
            min_opportunities: DEFAULT_ADAPTIVE_MIN_OPPORTUNITIES,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
            multiplier_span: DEFAULT_MULTIPLIER_SPAN,
        }
    }
}

// ==================== Engine Config ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub bkt: BktConfig,
    pub blame: BlameConfig,
    pub evidence: EvidenceConfig,
    pub confidence: ConfidenceConfig,
    pub classification: ClassificationConfig,
    pub complexity: ComplexityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bkt: BktConfig::default(),
            blame: BlameConfig::default(),
            evidence: EvidenceConfig::default(),
            confidence: ConfidenceConfig::default(),
            classification: ClassificationConfig::default(),
            complexity: ComplexityConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a complete config document and validate it
    pub fn from_json(json: &str) -> Result<Self, MasteryError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MasteryError> {
        let ev = &self.evidence;
        let numbers = [
            self.bkt.degenerate_epsilon,
            self.blame.uniform_blame_threshold,
            ev.expected_response_ms,
            ev.correct_fast_ratio,
            ev.correct_fast_weight,
            ev.correct_slow_ratio,
            ev.correct_slow_weight,
            ev.incorrect_fast_ratio,
            ev.incorrect_fast_weight,
            ev.incorrect_slow_ratio,
            ev.incorrect_slow_weight,
            self.confidence.opportunity_scale,
            self.confidence.extremity_bonus,
            self.confidence.max_spread,
            self.classification.mastered_p_known,
            self.classification.struggling_p_known,
            self.complexity.min_confidence,
            self.complexity.max_multiplier,
            self.complexity.multiplier_span,
        ];
        if has_invalid_values(&numbers) || has_invalid_values(&ev.help_weights) {
            return Err(invalid("all values must be finite"));
        }
        if numbers.iter().chain(ev.help_weights.iter()).any(|v| *v < 0.0) {
            return Err(invalid("values must be non-negative"));
        }

        if ev.expected_response_ms <= 0.0 {
            return Err(invalid("evidence.expectedResponseMs must be positive"));
        }
        if ev.correct_fast_ratio > ev.correct_slow_ratio
            || ev.incorrect_fast_ratio > ev.incorrect_slow_ratio
        {
            return Err(invalid("fast ratio thresholds must not exceed slow ones"));
        }
        if self.confidence.opportunity_scale <= 0.0 {
            return Err(invalid("confidence.opportunityScale must be positive"));
        }

        let cls = &self.classification;
        if !is_probability(cls.mastered_p_known) || !is_probability(cls.struggling_p_known) {
            return Err(invalid("classification thresholds must lie in [0, 1]"));
        }
        if cls.struggling_p_known > cls.mastered_p_known {
            return Err(invalid(
                "classification.strugglingPKnown must not exceed masteredPKnown",
            ));
        }

        let cx = &self.complexity;
        if !is_probability(cx.min_confidence) {
            return Err(invalid("complexity.minConfidence must lie in [0, 1]"));
        }
        if cx.multiplier_span > cx.max_multiplier {
            return Err(invalid("complexity.multiplierSpan must not exceed maxMultiplier"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> MasteryError {
    MasteryError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.bkt.degenerate_epsilon, 1e-9);
        assert_eq!(config.blame.uniform_blame_threshold, 0.001);
        assert_eq!(config.evidence.expected_response_ms, 5000.0);
        assert_eq!(config.evidence.help_weights, [1.0, 0.8, 0.5, 0.5]);
        assert_eq!(config.confidence.opportunity_scale, 20.0);
        assert_eq!(config.classification.mastered_p_known, 0.8);
        assert_eq!(config.complexity.min_opportunities, 20);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_is_rejected() {
        let json = r#"{"bkt": {"degenerateEpsilon": 1e-9}}"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(err, MasteryError::Json(_)));
    }

    #[test]
    fn test_inverted_classification_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.classification.struggling_p_known = 0.9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strugglingPKnown"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut config = EngineConfig::default();
        config.evidence.help_weights[2] = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(MasteryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_expected_response_rejected() {
        let mut config = EngineConfig::default();
        config.evidence.expected_response_ms = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiplier_span_bounded_by_max() {
        let mut config = EngineConfig::default();
        config.complexity.multiplier_span = 5.0;
        assert!(config.validate().is_err());
    }
}
