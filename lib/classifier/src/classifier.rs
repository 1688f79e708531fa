//! Category classifier
//!
//! Scores every catalog category against a post's text and image features
//! and picks the best one, or `"unknown"` when nothing scores high enough.

use crate::explain::{CategoryScore, Classification};
use crate::signals::{image_object_score, keyword_score, semantic_score, SignalWeights};
use listforge_core::{Error, ImageFeatures, Result, TextFeatures};
use listforge_schema::{CategorySchema, CategorySchemaStore, UNKNOWN_CATEGORY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    pub weights: SignalWeights,
    /// Multiplier applied to incidentally mentioned categories
    pub penalty_factor: f32,
    /// Scores at or below this are never penalized
    pub penalty_threshold: f32,
    /// Best scores at or below this yield `"unknown"`
    pub min_confidence: f32,
    /// How many leading category keywords count as primary
    pub primary_keyword_count: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            penalty_factor: 0.5,
            penalty_threshold: 0.1,
            min_confidence: 0.05,
            primary_keyword_count: 2,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.weights.is_valid() {
            return Err(Error::InvalidConfig(
                "classifier weights must be finite and non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.penalty_factor) {
            return Err(Error::InvalidConfig(format!(
                "penalty_factor must be within [0, 1], got {}",
                self.penalty_factor
            )));
        }
        if self.primary_keyword_count == 0 {
            return Err(Error::InvalidConfig(
                "primary_keyword_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Multi-signal category classifier
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    store: Arc<CategorySchemaStore>,
    config: ClassifierConfig,
}

impl CategoryClassifier {
    /// Create a classifier with default configuration
    pub fn new(store: Arc<CategorySchemaStore>) -> Self {
        Self {
            store,
            config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(store: Arc<CategorySchemaStore>, config: ClassifierConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn store(&self) -> &CategorySchemaStore {
        &self.store
    }

    /// Decide the category id for a post
    pub fn detect_category(&self, text: &TextFeatures, images: &[ImageFeatures]) -> String {
        self.classify(text, images).category
    }

    /// Score every category and pick the best
    ///
    /// Ties go to the category listed first in the catalog. Never fails:
    /// an empty catalog or a best score at or below `min_confidence` gives
    /// `"unknown"`.
    pub fn classify(&self, text: &TextFeatures, images: &[ImageFeatures]) -> Classification {
        let first_half = leading_half(&text.raw_text);

        let mut scores = Vec::with_capacity(self.store.len());
        let mut best: Option<(usize, f32)> = None;

        for (position, (schema, embedding)) in self.store.iter().enumerate() {
            let primary = schema.primary_keywords(self.config.primary_keyword_count);

            let keyword = keyword_score(&text.keywords, &schema.keywords, primary);
            let semantic = semantic_score(&text.embedding, embedding);
            let image = image_object_score(images, &schema.keywords);
            let combined = self.config.weights.combine(keyword, semantic, image);

            let penalized = combined > self.config.penalty_threshold
                && !mentions_primary(&first_half, primary);
            let final_score = if penalized {
                combined * self.config.penalty_factor
            } else {
                combined
            };

            tracing::debug!(
                category = %schema.id,
                keyword,
                semantic,
                image,
                combined,
                penalized,
                final_score,
                "Scored category"
            );

            if best.map_or(true, |(_, top)| final_score > top) {
                best = Some((position, final_score));
            }

            scores.push(CategoryScore {
                category_id: schema.id.clone(),
                keyword,
                semantic,
                image,
                combined,
                penalized,
                final_score,
            });
        }

        let (category, confidence) = match best {
            Some((position, score)) if score > self.config.min_confidence => {
                (scores[position].category_id.clone(), score)
            }
            Some((_, score)) => (UNKNOWN_CATEGORY.to_string(), score),
            None => (UNKNOWN_CATEGORY.to_string(), 0.0),
        };

        tracing::info!(
            category = %category,
            confidence,
            candidates = scores.len(),
            "Classified post"
        );

        Classification {
            category,
            confidence,
            scores,
        }
    }

    /// Schema of a decided category, if it is in the catalog
    pub fn schema_for(&self, category: &str) -> Option<&CategorySchema> {
        self.store.get(category)
    }
}

/// First `⌊chars / 2⌋` characters of the text, lowercased
fn leading_half(raw_text: &str) -> String {
    let half = raw_text.chars().count() / 2;
    raw_text.chars().take(half).collect::<String>().to_lowercase()
}

fn mentions_primary(first_half: &str, primary: &[String]) -> bool {
    primary
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && first_half.contains(&k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use listforge_core::Vector;
    use listforge_schema::{CategoryCatalog, HashingEmbedder};

    fn create_test_store() -> Arc<CategorySchemaStore> {
        let catalog = CategoryCatalog::new(vec![
            CategorySchema::new("water_bottle", "Water Bottle")
                .with_keywords(["bottle", "water", "steel", "insulated"]),
            CategorySchema::new("yoga_mat", "Yoga Mat").with_keywords(["yoga", "mat", "exercise", "fitness"]),
        ]);
        // Empty embeddings keep the semantic signal at zero
        Arc::new(CategorySchemaStore::with_precomputed(catalog, Default::default()).unwrap())
    }

    fn text(raw: &str, keywords: &[&str]) -> TextFeatures {
        TextFeatures::new(raw).with_keywords(keywords.iter().copied())
    }

    #[test]
    fn test_worked_example_no_penalty() {
        let classifier = CategoryClassifier::new(create_test_store());
        let post = text("My new bottle is great for long hikes and gym days", &["bottle", "steel"]);

        let result = classifier.classify(&post, &[]);
        let score = result.score_for("water_bottle").unwrap();

        assert!((score.keyword - 0.65).abs() < 1e-6, "Expected 0.65, got {}", score.keyword);
        assert!((score.final_score - 0.1625).abs() < 1e-6, "Expected 0.1625, got {}", score.final_score);
        assert!(!score.penalized);
        assert_eq!(result.category, "water_bottle");
    }

    #[test]
    fn test_incidental_mention_is_penalized() {
        let classifier = CategoryClassifier::new(create_test_store());
        let post = text(
            "Loving this new sunrise routine on the beach, also grabbed a bottle",
            &["bottle", "steel"],
        );

        let result = classifier.classify(&post, &[]);
        let score = result.score_for("water_bottle").unwrap();

        assert!(score.penalized);
        assert!((score.final_score - 0.08125).abs() < 1e-6, "Expected 0.08125, got {}", score.final_score);
        assert_eq!(result.category, "water_bottle");
    }

    #[test]
    fn test_low_scores_are_not_penalized() {
        let classifier = CategoryClassifier::new(create_test_store());
        // keyword 0.25 -> combined 0.0625, below the penalty threshold
        let post = text("Something about nothing and then insulated", &["insulated"]);

        let result = classifier.classify(&post, &[]);
        let score = result.score_for("water_bottle").unwrap();
        assert!(!score.penalized);
        assert!((score.final_score - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_when_best_score_is_low() {
        let classifier = CategoryClassifier::new(create_test_store());
        let post = text("A lovely sunset over the hills", &["sunset", "hills"]);

        assert_eq!(classifier.detect_category(&post, &[]), UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_unknown_for_empty_catalog() {
        let classifier = CategoryClassifier::new(Arc::new(CategorySchemaStore::default()));
        let result = classifier.classify(&text("bottle", &["bottle"]), &[]);

        assert!(result.is_unknown());
        assert!(result.scores.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_ties_go_to_first_listed_category() {
        let catalog = CategoryCatalog::new(vec![
            CategorySchema::new("first", "First").with_keywords(["gear", "kit"]),
            CategorySchema::new("second", "Second").with_keywords(["gear", "kit"]),
        ]);
        let store = Arc::new(CategorySchemaStore::with_precomputed(catalog, Default::default()).unwrap());
        let classifier = CategoryClassifier::new(store);

        let result = classifier.classify(&text("gear kit for camping trips", &["gear", "kit"]), &[]);
        assert_eq!(result.category, "first");
    }

    #[test]
    fn test_image_signal_decides_without_text() {
        let classifier = CategoryClassifier::new(create_test_store());
        let images = vec![ImageFeatures::default()
            .with_object("yoga mat", Some(0.9))
            .with_object("mat", Some(0.9))];
        // Raw text mentions yoga early, so no penalty
        let post = text("yoga morning", &[]);

        let result = classifier.classify(&post, &images);
        assert_eq!(result.category, "yoga_mat");
        // (0.9 + 0.9) / 4 * 0.40
        assert!((result.confidence - 0.18).abs() < 1e-6, "Expected 0.18, got {}", result.confidence);
    }

    #[test]
    fn test_semantic_signal_with_embeddings() {
        let embedder = HashingEmbedder::default();
        let catalog = CategoryCatalog::new(vec![
            CategorySchema::new("water_bottle", "Water Bottle").with_keywords(["bottle", "water"]),
            CategorySchema::new("yoga_mat", "Yoga Mat").with_keywords(["yoga", "mat"]),
        ]);
        let store = Arc::new(CategorySchemaStore::build(catalog, &embedder).unwrap());
        let classifier = CategoryClassifier::new(store);

        use listforge_schema::TextEmbedder;
        let post = TextFeatures::new("water bottle for the trail")
            .with_embedding(embedder.embed("water bottle for the trail"));

        let result = classifier.classify(&post, &[]);
        let bottle = result.score_for("water_bottle").unwrap();
        let mat = result.score_for("yoga_mat").unwrap();
        assert!(bottle.semantic > mat.semantic);
        assert_eq!(result.category, "water_bottle");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = CategoryClassifier::new(create_test_store());
        let post = text("bottle of water", &["bottle", "water", "yoga"])
            .with_embedding(Vector::new(vec![0.1, 0.2]));

        assert_eq!(classifier.classify(&post, &[]), classifier.classify(&post, &[]));
    }

    #[test]
    fn test_config_validation() {
        assert!(ClassifierConfig::default().validate().is_ok());

        let bad = ClassifierConfig {
            penalty_factor: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));
    }
}
