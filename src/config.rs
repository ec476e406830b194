//! Scoring and expansion configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::expansion::{DEFAULT_EXPANDER_NAME, Language, PhoneticMode};
use crate::extension::ExtensionRegistry;
use crate::scoring::TFIDF_SCORER_NAME;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub scoring: ScoringConfig,
    pub expansion: ExpansionConfig,
}

/// How documents are scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Registered scorer name.
    pub scorer: String,
    /// Documents scoring below this are dropped.
    pub min_score: f64,
    /// Build explain trees.
    pub explain: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scorer: TFIDF_SCORER_NAME.to_string(),
            min_score: 0.0,
            explain: false,
        }
    }
}

/// How query tokens are expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Registered expander name.
    pub expander: String,
    pub language: Language,
    pub phonetic: PhoneticMode,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            expander: DEFAULT_EXPANDER_NAME.to_string(),
            language: Language::default(),
            phonetic: PhoneticMode::default(),
        }
    }
}

impl RankConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RankError::invalid_config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: RankConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Check the configuration against the names known to `registry`.
    pub fn validate(&self, registry: &ExtensionRegistry) -> Result<()> {
        if registry.scorer(&self.scoring.scorer).is_none() {
            return Err(RankError::invalid_config(format!(
                "Unknown scorer '{}'",
                self.scoring.scorer
            )));
        }
        if !self.scoring.min_score.is_finite() || self.scoring.min_score < 0.0 {
            return Err(RankError::invalid_config(format!(
                "min_score must be finite and non-negative, got {}",
                self.scoring.min_score
            )));
        }
        if registry.expander(&self.expansion.expander).is_none() {
            return Err(RankError::invalid_config(format!(
                "Unknown expander '{}'",
                self.expansion.expander
            )));
        }
        Ok(())
    }
}
