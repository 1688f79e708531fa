//! Listing generator
//!
//! Resolves the category schema, extracts attributes, and writes every
//! listing field with the inline compliance pass applied.

use crate::bullets::{BulletContext, BulletSynthesizer};
use crate::description::build_description;
use crate::extract::extract_attributes;
use crate::fusion::{FeatureFusion, FusedFeatures};
use crate::search_terms::build_search_terms;
use crate::title::build_title;
use listforge_compliance::ComplianceValidator;
use listforge_core::{Error, Listing, PostFeatures, Result};
use listforge_schema::CategorySchemaStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Value given to missing required text fields
    pub text_default: String,
    /// Values that never reach titles, bullets or descriptions
    pub placeholder_values: Vec<String>,
    /// Fused keywords considered for search terms
    pub search_keyword_limit: usize,
    /// Minimum ORG entity score for a brand
    pub brand_min_score: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            text_default: "Premium".to_string(),
            placeholder_values: vec![
                "Premium".to_string(),
                "Generic".to_string(),
                "Not specified".to_string(),
            ],
            search_keyword_limit: 20,
            brand_min_score: 0.8,
        }
    }
}

impl GeneratorConfig {
    pub fn is_placeholder(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || self.placeholder_values.iter().any(|p| p.eq_ignore_ascii_case(value))
    }
}

/// Writes listings for resolved category schemas
#[derive(Debug, Clone)]
pub struct ListingGenerator {
    store: Arc<CategorySchemaStore>,
    validator: ComplianceValidator,
    fusion: FeatureFusion,
    config: GeneratorConfig,
}

impl ListingGenerator {
    pub fn new(store: Arc<CategorySchemaStore>, validator: ComplianceValidator) -> Self {
        Self::with_config(store, validator, FeatureFusion::default(), GeneratorConfig::default())
    }

    pub fn with_config(
        store: Arc<CategorySchemaStore>,
        validator: ComplianceValidator,
        fusion: FeatureFusion,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            store,
            validator,
            fusion,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline]
    pub fn validator(&self) -> &ComplianceValidator {
        &self.validator
    }

    #[inline]
    pub fn fusion(&self) -> &FeatureFusion {
        &self.fusion
    }

    /// Generate a listing, fusing the post's features first
    pub fn generate<R: Rng + ?Sized>(
        &self,
        category: &str,
        features: &PostFeatures,
        rng: &mut R,
    ) -> Result<Listing> {
        let fused = self.fusion.fuse(&features.text, &features.images);
        self.generate_fused(category, features, &fused, rng)
    }

    /// Deterministic generation: the same seed yields the same listing
    pub fn generate_seeded(&self, category: &str, features: &PostFeatures, seed: u64) -> Result<Listing> {
        self.generate(category, features, &mut StdRng::seed_from_u64(seed))
    }

    /// Generate from features that were already fused
    pub fn generate_fused<R: Rng + ?Sized>(
        &self,
        category: &str,
        features: &PostFeatures,
        fused: &FusedFeatures,
        rng: &mut R,
    ) -> Result<Listing> {
        let schema = self
            .store
            .resolve(category)
            .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;

        if schema.id != category {
            tracing::info!(requested = %category, resolved = %schema.id, "Using fallback category");
        }

        let extracted = extract_attributes(schema, features, fused, &self.config);
        let ctx = BulletContext::from_extracted(&extracted, &fused.all_keywords, &self.config);

        let title = build_title(schema, &extracted, &self.config, &self.validator);
        let bullets = BulletSynthesizer::new(&self.validator)
            .with_priorities(&schema.listing_rules.bullet_priorities)
            .synthesize(&ctx, rng);
        let description = build_description(schema, ctx.brand.as_deref(), &self.validator);
        let search_terms = build_search_terms(
            schema,
            &extracted,
            &fused.all_keywords,
            self.config.search_keyword_limit,
            &self.validator,
        );

        tracing::info!(
            category = %schema.id,
            bullets = bullets.len(),
            search_terms = search_terms.len(),
            defaulted = extracted.defaulted.len(),
            "Generated listing"
        );

        Ok(Listing {
            category: schema.display_name().to_string(),
            title,
            bullets,
            description,
            search_terms,
            attributes: extracted.attributes,
        })
    }
}
