//! Listing pipeline
//!
//! Classification, fusion, generation, validation and the optional
//! auto-fix, run in that order for one post.

use crate::config::EngineConfig;
use listforge_classifier::{CategoryClassifier, Classification};
use listforge_compliance::{ComplianceValidator, ValidationResult};
use listforge_core::{Error, Listing, PostFeatures, Result};
use listforge_generator::{ConfidenceScores, FeatureFusion, ListingGenerator};
use listforge_schema::CategorySchemaStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;

/// Per-request options
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Skip classification and use this category
    pub category: Option<String>,
    /// Seed for bullet ordering; unseeded runs use the thread RNG
    pub seed: Option<u64>,
    /// Auto-fix the listing and validate the fixed copy
    pub auto_fix: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            category: None,
            seed: None,
            auto_fix: true,
        }
    }
}

impl GenerateOptions {
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn without_auto_fix(mut self) -> Self {
        self.auto_fix = false;
        self
    }
}

/// Result of processing one post
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedListing {
    /// Id of the schema the listing was written for
    pub category_id: String,
    pub listing: Listing,
    pub validation: ValidationResult,
    pub confidence: ConfidenceScores,
    /// Present when the category was decided by the classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[derive(Debug, Clone)]
pub struct ListingEngine {
    store: Arc<CategorySchemaStore>,
    classifier: CategoryClassifier,
    generator: ListingGenerator,
}

impl ListingEngine {
    pub fn new(store: CategorySchemaStore, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let store = match &config.fallback_category {
            Some(id) => store
                .with_fallback(id)
                .map_err(|e| Error::InvalidConfig(e.to_string()))?,
            None => store,
        };
        let store = Arc::new(store);

        let validator = ComplianceValidator::new(config.rules)?;
        let classifier = CategoryClassifier::with_config(Arc::clone(&store), config.classifier);
        let generator = ListingGenerator::with_config(
            Arc::clone(&store),
            validator,
            FeatureFusion::new(config.fusion),
            config.generator,
        );

        tracing::info!(
            categories = store.len(),
            fallback = store.fallback().map(|s| s.id.as_str()),
            "Listing engine ready"
        );

        Ok(Self {
            store,
            classifier,
            generator,
        })
    }

    #[inline]
    pub fn store(&self) -> &CategorySchemaStore {
        &self.store
    }

    #[inline]
    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    #[inline]
    pub fn generator(&self) -> &ListingGenerator {
        &self.generator
    }

    #[inline]
    pub fn validator(&self) -> &ComplianceValidator {
        self.generator.validator()
    }

    pub fn classify(&self, post: &PostFeatures) -> Classification {
        self.classifier.classify(&post.text, &post.images)
    }

    pub fn validate(&self, listing: &Listing) -> ValidationResult {
        self.validator().validate(listing)
    }

    pub fn auto_fix(&self, listing: &Listing) -> Listing {
        self.validator().auto_fix(listing)
    }

    /// Run the full pipeline for one post
    ///
    /// Fails only when the category cannot be resolved and no fallback is
    /// registered.
    pub fn process(&self, post: &PostFeatures, options: &GenerateOptions) -> Result<GeneratedListing> {
        let (requested, classification) = match &options.category {
            Some(category) => (category.clone(), None),
            None => {
                let classification = self.classify(post);
                (classification.category.clone(), Some(classification))
            }
        };

        let category_id = self
            .store
            .resolve(&requested)
            .map(|schema| schema.id.clone())
            .ok_or_else(|| Error::UnknownCategory(requested.clone()))?;

        let fused = self.generator.fusion().fuse(&post.text, &post.images);
        let listing = match options.seed {
            Some(seed) => {
                self.generator
                    .generate_fused(&category_id, post, &fused, &mut StdRng::seed_from_u64(seed))?
            }
            None => self
                .generator
                .generate_fused(&category_id, post, &fused, &mut rand::rng())?,
        };

        let mut validation = self.validate(&listing);
        let listing = if options.auto_fix {
            let fixed = self.auto_fix(&listing);
            let revalidated = self.validate(&fixed);
            tracing::info!(
                score_before = validation.compliance_score,
                score_after = revalidated.compliance_score,
                "Auto-fixed generated listing"
            );
            validation = revalidated;
            fixed
        } else {
            listing
        };

        if !validation.is_valid {
            tracing::warn!(errors = ?validation.errors, "Generated listing has compliance errors");
        }

        Ok(GeneratedListing {
            category_id,
            listing,
            validation,
            confidence: fused.confidence,
            classification,
        })
    }
}
