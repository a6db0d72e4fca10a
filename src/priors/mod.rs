//! Skill Prior Table
//!
//! Maps skill identifiers to starting BKT parameters by prefix
//! (e.g. `"basic."`, `"fiveComplements."`). The longest matching prefix wins;
//! unmatched skills fall back to the default entry. A table without a
//! default fails lookups for unmatched skills rather than guessing.
//!
//! The table is an immutable value handed to the engine, never a global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MasteryError;
use crate::types::SkillParams;

/// Deserialization goes through [`TryFrom<RawPriorTable>`], so every entry is
/// validated no matter how the table is loaded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPriorTable")]
pub struct SkillPriorTable {
    default: Option<SkillParams>,
    prefixes: BTreeMap<String, SkillParams>,
}

/// Unvalidated wire shape of a prior table
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPriorTable {
    default: Option<SkillParams>,
    prefixes: BTreeMap<String, SkillParams>,
}

impl TryFrom<RawPriorTable> for SkillPriorTable {
    type Error = MasteryError;

    fn try_from(raw: RawPriorTable) -> Result<Self, Self::Error> {
        if let Some(params) = &raw.default {
            validate_params("<default>", params)?;
        }
        for (prefix, params) in &raw.prefixes {
            validate_params(prefix, params)?;
        }
        Ok(Self {
            default: raw.default,
            prefixes: raw.prefixes,
        })
    }
}

impl SkillPriorTable {
    pub fn new(default: Option<SkillParams>) -> Result<Self, MasteryError> {
        if let Some(params) = &default {
            validate_params("<default>", params)?;
        }
        Ok(Self {
            default,
            prefixes: BTreeMap::new(),
        })
    }

    /// Add (or replace) the entry for a skill-id prefix
    pub fn with_prefix(
        mut self,
        prefix: impl Into<String>,
        params: SkillParams,
    ) -> Result<Self, MasteryError> {
        let prefix = prefix.into();
        validate_params(&prefix, &params)?;
        self.prefixes.insert(prefix, params);
        Ok(self)
    }

    /// Parse `{"default": {...} | null, "prefixes": {"basic.": {...}}}` and validate every entry
    pub fn from_json(json: &str) -> Result<Self, MasteryError> {
        let raw: RawPriorTable = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn lookup(&self, skill_id: &str) -> Result<&SkillParams, MasteryError> {
        self.prefixes
            .iter()
            .filter(|(prefix, _)| skill_id.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, params)| params)
            .or(self.default.as_ref())
            .ok_or_else(|| MasteryError::UnknownSkillPrior(skill_id.to_string()))
    }

    pub fn default_params(&self) -> Option<&SkillParams> {
        self.default.as_ref()
    }

    /// Number of prefix entries; the default entry is not counted
    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }

    /// True when the table has neither prefix entries nor a default
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default.is_none()
    }
}

fn validate_params(name: &str, params: &SkillParams) -> Result<(), MasteryError> {
    match params.invalid_field() {
        Some(field) => Err(MasteryError::InvalidSkillParams {
            skill: name.to_string(),
            reason: format!("{field} must be a finite probability in [0, 1]"),
        }),
        None => Ok(()),
    }
}
