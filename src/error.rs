//! Error Types
//!
//! Configuration problems are the only hard failures. Malformed attempts and
//! degenerate evidence are recovered inside the replay.

/// Errors surfaced by the mastery engine
#[derive(Debug, thiserror::Error)]
pub enum MasteryError {
    #[error("no prior configured for skill '{0}' and no default entry")]
    UnknownSkillPrior(String),
    #[error("invalid prior for '{skill}': {reason}")]
    InvalidSkillParams { skill: String, reason: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
