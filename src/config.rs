//! Engine configuration
//!
//! Every section is optional in the JSON document and falls back to its
//! defaults:
//!
//! ```json
//! {
//!   "classifier": { "min_confidence": 0.05 },
//!   "fusion": { "text_weight": 0.6, "image_weight": 0.4 },
//!   "generator": { "text_default": "Premium" },
//!   "rules": { "banned_phrases": ["best", "cheap"] },
//!   "fallback_category": "general"
//! }
//! ```

use listforge_classifier::ClassifierConfig;
use listforge_compliance::RuleSet;
use listforge_core::{load_json, Error, Result};
use listforge_generator::{FusionConfig, GeneratorConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub fusion: FusionConfig,
    pub generator: GeneratorConfig,
    pub rules: RuleSet,
    /// Category used when classification yields `"unknown"` or an unlisted id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_category: Option<String>,
}

impl EngineConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;

        let fusion = &self.fusion;
        let weights = [fusion.text_weight, fusion.image_weight, fusion.brand_min_score];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidConfig(
                "fusion weights must be finite and non-negative".to_string(),
            ));
        }

        let limits = &self.rules.limits;
        if limits.min_bullets > limits.max_bullets {
            return Err(Error::InvalidConfig(format!(
                "min_bullets ({}) exceeds max_bullets ({})",
                limits.min_bullets, limits.max_bullets
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_fallback(mut self, category: impl Into<String>) -> Self {
        self.fallback_category = Some(category.into());
        self
    }
}
