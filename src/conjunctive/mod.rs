//! Conjunctive Multi-Skill Update
//!
//! A problem touching several skills is answered correctly only when every
//! skill is applied correctly:
//! - Correct answer: unambiguous positive evidence, each skill gets a full
//!   observation update followed by the learning transition
//! - Incorrect answer: at least one skill failed; blame is split in
//!   proportion to each skill's unknown mass (1 - pKnown) and the full
//!   negative update is blended in by that weight
//!
//! Blame:
//! - totalUnknown = Σ(1 - pKnown_i)
//! - totalUnknown < threshold: every skill looks mastered, blame is uniform 1/N
//! - otherwise: blame_i = (1 - pKnown_i) / totalUnknown
//! - posterior_i = pKnown_i(1 - blame_i) + negative_i · blame_i
//!
//! No learning transition follows an incorrect answer.

use crate::bkt::{apply_learning, bkt_update_checked};
use crate::config::{BktConfig, BlameConfig};
use crate::sanitize::clamp_probability;
use crate::types::SkillParams;

/// Current state of one skill touched by an attempt
#[derive(Clone, Debug)]
pub struct SkillEvidence<'a> {
    pub skill_id: &'a str,
    pub p_known: f64,
    pub params: &'a SkillParams,
}

/// Raw (pre evidence-weighting) update for one skill
#[derive(Clone, Debug, PartialEq)]
pub struct SkillUpdate {
    pub skill_id: String,
    pub posterior: f64,
    /// Share of the failure attributed to this skill; None for correct attempts
    pub blame_weight: Option<f64>,
    /// The underlying observation update was degenerate
    pub degenerate: bool,
}

/// Blame weights for an incorrect attempt, one per input, summing to 1
pub fn blame_weights(p_knowns: &[f64], uniform_blame_threshold: f64) -> Vec<f64> {
    if p_knowns.is_empty() {
        return Vec::new();
    }

    let unknown: Vec<f64> = p_knowns
        .iter()
        .map(|&p| 1.0 - clamp_probability(p))
        .collect();
    let total_unknown: f64 = unknown.iter().sum();

    if total_unknown < uniform_blame_threshold {
        let uniform = 1.0 / p_knowns.len() as f64;
        return vec![uniform; p_knowns.len()];
    }

    unknown.iter().map(|u| u / total_unknown).collect()
}

/// Update every skill touched by one attempt
pub fn distribute(
    skills: &[SkillEvidence<'_>],
    is_correct: bool,
    bkt: &BktConfig,
    blame: &BlameConfig,
) -> Vec<SkillUpdate> {
    if is_correct {
        return skills
            .iter()
            .map(|skill| {
                let outcome =
                    bkt_update_checked(skill.p_known, true, skill.params, bkt.degenerate_epsilon);
                SkillUpdate {
                    skill_id: skill.skill_id.to_string(),
                    posterior: apply_learning(outcome.posterior, skill.params.p_learn),
                    blame_weight: None,
                    degenerate: outcome.degenerate,
                }
            })
            .collect();
    }

    let p_knowns: Vec<f64> = skills.iter().map(|s| s.p_known).collect();
    let weights = blame_weights(&p_knowns, blame.uniform_blame_threshold);

    skills
        .iter()
        .zip(weights)
        .map(|(skill, weight)| {
            let prior = clamp_probability(skill.p_known);
            let outcome = bkt_update_checked(prior, false, skill.params, bkt.degenerate_epsilon);
            let blended = prior * (1.0 - weight) + outcome.posterior * weight;
            SkillUpdate {
                skill_id: skill.skill_id.to_string(),
                posterior: clamp_probability(blended),
                blame_weight: Some(weight),
                degenerate: outcome.degenerate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bkt::bkt_update;

    const EPSILON: f64 = 1e-10;

    fn params() -> SkillParams {
        SkillParams::new(0.1, 0.3, 0.1, 0.05)
    }

    fn evidence<'a>(skill_id: &'a str, p_known: f64, params: &'a SkillParams) -> SkillEvidence<'a> {
        SkillEvidence {
            skill_id,
            p_known,
            params,
        }
    }

    // ==================== Blame Weight Tests ====================

    #[test]
    fn test_all_mastered_gets_uniform_blame() {
        let weights = blame_weights(&[0.999, 0.999, 0.999], 0.001);
        assert_eq!(weights.len(), 3);
        for w in &weights {
            assert!((w - 1.0 / 3.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_uniform_branch_overrides_proportional_split() {
        // proportional split would put all blame on the third skill
        let weights = blame_weights(&[1.0, 1.0, 0.9999], 0.001);
        for w in &weights {
            assert!((w - 1.0 / 3.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_weaker_skill_takes_more_blame() {
        let weights = blame_weights(&[0.9, 0.1], 0.001);
        assert!(weights[1] > weights[0]);
        assert!((weights[0] - 0.1).abs() < EPSILON);
        assert!((weights[1] - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_blame_weights_sum_to_one() {
        let weights = blame_weights(&[0.2, 0.5, 0.7, 0.95], 0.001);
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_single_skill_takes_all_blame() {
        assert_eq!(blame_weights(&[0.4], 0.001), vec![1.0]);
    }

    #[test]
    fn test_blame_weights_empty() {
        assert!(blame_weights(&[], 0.001).is_empty());
    }

    #[test]
    fn test_fully_known_skill_takes_no_blame() {
        let weights = blame_weights(&[1.0, 0.3], 0.001);
        assert_eq!(weights[0], 0.0);
        assert!((weights[1] - 1.0).abs() < EPSILON);
    }

    // ==================== Distribution Tests ====================

    #[test]
    fn test_correct_updates_each_skill_independently() {
        let p = params();
        let skills = [evidence("a", 0.2, &p), evidence("b", 0.7, &p)];
        let updates = distribute(&skills, true, &BktConfig::default(), &BlameConfig::default());

        for (update, skill) in updates.iter().zip(skills.iter()) {
            let expected = apply_learning(bkt_update(skill.p_known, true, &p), p.p_learn);
            assert!((update.posterior - expected).abs() < EPSILON);
            assert_eq!(update.blame_weight, None);
            assert!(!update.degenerate);
        }
    }

    #[test]
    fn test_incorrect_blends_negative_update_by_blame() {
        let p = params();
        let skills = [evidence("a", 0.9, &p), evidence("b", 0.1, &p)];
        let updates = distribute(&skills, false, &BktConfig::default(), &BlameConfig::default());

        let full_a = bkt_update(0.9, false, &p);
        let expected_a = 0.9 * 0.9 + full_a * 0.1;
        assert!((updates[0].posterior - expected_a).abs() < EPSILON);
        assert_eq!(updates[0].skill_id, "a");

        let full_b = bkt_update(0.1, false, &p);
        let expected_b = 0.1 * 0.1 + full_b * 0.9;
        assert!((updates[1].posterior - expected_b).abs() < EPSILON);

        assert!(updates[1].blame_weight.unwrap() > updates[0].blame_weight.unwrap());
    }

    #[test]
    fn test_incorrect_never_raises_p_known() {
        let p = params();
        let skills = [evidence("a", 0.5, &p), evidence("b", 0.6, &p), evidence("c", 0.99, &p)];
        let updates = distribute(&skills, false, &BktConfig::default(), &BlameConfig::default());
        for (update, skill) in updates.iter().zip(skills.iter()) {
            assert!(update.posterior <= skill.p_known + EPSILON);
        }
    }

    #[test]
    fn test_incorrect_skips_learning_transition() {
        let p = params();
        let skills = [evidence("a", 0.4, &p)];
        let updates = distribute(&skills, false, &BktConfig::default(), &BlameConfig::default());
        // single skill: full blame, plain negative update
        assert!((updates[0].posterior - bkt_update(0.4, false, &p)).abs() < EPSILON);
    }

    #[test]
    fn test_incorrect_all_mastered_reports_uniform_blame() {
        let p = params();
        let skills = [
            evidence("a", 0.999, &p),
            evidence("b", 0.999, &p),
            evidence("c", 0.999, &p),
        ];
        let updates = distribute(&skills, false, &BktConfig::default(), &BlameConfig::default());
        for update in &updates {
            assert!((update.blame_weight.unwrap() - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_flag_propagates() {
        let certain = SkillParams::new(0.5, 0.1, 0.0, 1.0);
        let skills = [evidence("a", 0.5, &certain)];
        let updates = distribute(&skills, false, &BktConfig::default(), &BlameConfig::default());
        assert!(updates[0].degenerate);
        assert_eq!(updates[0].posterior, 0.5);
    }
}
