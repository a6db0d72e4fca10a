//! History Replay
//!
//! Folds a learner's full attempt history into per-skill state:
//! 1. Stable-sort attempts by timestamp (equal timestamps keep input order)
//! 2. Skip attempts that name no skill
//! 3. Initialize unseen skills from the prior table
//! 4. Run the conjunctive update for the attempt's skills
//! 5. Blend each raw posterior with the attempt's evidence weight:
//!    p' = clamp(p(1 - w) + posterior·w)
//! 6. Advance opportunity / success counters and last-practiced time
//!
//! Replay is recomputed from scratch on every call; nothing is cached.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::conjunctive::{distribute, SkillEvidence};
use crate::error::MasteryError;
use crate::evidence::evidence_weight;
use crate::priors::SkillPriorTable;
use crate::sanitize::clamp_probability;
use crate::types::{Attempt, ReplayDiagnostics, SkillState};

/// Terminal per-skill state of one replay, keyed by skill id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayOutcome {
    pub states: BTreeMap<String, SkillState>,
    pub diagnostics: ReplayDiagnostics,
}

/// Replays attempt histories against borrowed priors and config
pub struct HistoryReplayer<'a> {
    priors: &'a SkillPriorTable,
    config: &'a EngineConfig,
}

impl<'a> HistoryReplayer<'a> {
    pub fn new(priors: &'a SkillPriorTable, config: &'a EngineConfig) -> Self {
        Self { priors, config }
    }

    /// Replay the history.
    ///
    /// Fails only when a referenced skill has no prior (not even a default).
    pub fn replay(&self, attempts: &[Attempt]) -> Result<ReplayOutcome, MasteryError> {
        let mut ordered: Vec<(usize, &Attempt)> = attempts.iter().enumerate().collect();
        ordered.sort_by_key(|(_, attempt)| attempt.timestamp);

        let mut states: BTreeMap<String, SkillState> = BTreeMap::new();
        let mut diagnostics = ReplayDiagnostics::default();

        for (index, attempt) in ordered {
            let skill_ids = distinct_skills(attempt);
            if skill_ids.is_empty() {
                warn!(
                    index,
                    timestamp = attempt.timestamp,
                    "Skipping attempt without skills"
                );
                diagnostics.attempts_skipped += 1;
                continue;
            }

            for skill_id in &skill_ids {
                if !states.contains_key(*skill_id) {
                    let params = *self.priors.lookup(skill_id)?;
                    states.insert(skill_id.to_string(), SkillState::new(*skill_id, params));
                }
            }

            let updates = {
                let evidence: Vec<SkillEvidence<'_>> = skill_ids
                    .iter()
                    .map(|skill_id| {
                        let state = &states[*skill_id];
                        SkillEvidence {
                            skill_id,
                            p_known: state.p_known,
                            params: &state.params,
                        }
                    })
                    .collect();
                distribute(
                    &evidence,
                    attempt.is_correct,
                    &self.config.bkt,
                    &self.config.blame,
                )
            };

            let weight = evidence_weight(attempt, &self.config.evidence);

            for update in updates {
                let Some(state) = states.get_mut(&update.skill_id) else {
                    continue;
                };
                if update.degenerate {
                    debug!(
                        skill_id = %update.skill_id,
                        is_correct = attempt.is_correct,
                        prior = state.p_known,
                        "Degenerate evidence, keeping prior"
                    );
                    diagnostics.degenerate_updates += 1;
                }

                state.p_known =
                    clamp_probability(state.p_known * (1.0 - weight) + update.posterior * weight);
                state.opportunities += 1;
                if attempt.is_correct {
                    state.success_count += 1;
                }
                state.last_practiced_at = Some(attempt.timestamp);
            }

            diagnostics.attempts_processed += 1;
        }

        debug!(
            processed = diagnostics.attempts_processed,
            skipped = diagnostics.attempts_skipped,
            degenerate = diagnostics.degenerate_updates,
            skills = states.len(),
            "Replay complete"
        );

        Ok(ReplayOutcome {
            states,
            diagnostics,
        })
    }
}

/// Non-empty skill ids of an attempt, duplicates removed, first occurrence kept
fn distinct_skills(attempt: &Attempt) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(attempt.skill_ids.len());
    for skill_id in &attempt.skill_ids {
        let skill_id = skill_id.as_str();
        if !skill_id.trim().is_empty() && !seen.contains(&skill_id) {
            seen.push(skill_id);
        }
    }
    seen
}

// ==================== Unit Tests ====================
