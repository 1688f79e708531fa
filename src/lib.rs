//! # ListForge
//!
//! Turns a social-media post into a marketplace-compliant product listing.
//!
//! Feature extraction (captions, object tags, entities, embeddings) happens
//! upstream; ListForge takes those features and decides the rest:
//!
//! - **Classification**: keyword, semantic and image-object signals with an
//!   incidental-mention penalty, explainable per category
//! - **Fusion**: text and image attributes merged under fixed precedence
//! - **Generation**: title, 3-5 distinct bullets, description and search terms
//! - **Compliance**: rule-set validation with a 0-100 score, plus an
//!   idempotent auto-fixer
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! listforge --catalog data/categories.json generate data/sample_post.json --seed 7
//! listforge --catalog data/categories.json classify data/sample_post.json
//! listforge validate listing.json --auto-fix
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use listforge::prelude::*;
//!
//! let store = CategorySchemaStore::from_path("data/categories.json", &HashingEmbedder::default())?;
//! let engine = ListingEngine::new(store, EngineConfig::default())?;
//!
//! let post: PostFeatures = load_json("data/sample_post.json")?;
//! let generated = engine.process(&post, &GenerateOptions::default().with_seed(7))?;
//! println!("{}", generated.listing.title);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`listforge-core`](listforge_core) - Features, attributes, listing, text utilities
//! - [`listforge-schema`](listforge_schema) - Category catalog, embedder, schema store
//! - [`listforge-classifier`](listforge_classifier) - Multi-signal category classifier
//! - [`listforge-compliance`](listforge_compliance) - Rule set, validator, auto-fixer
//! - [`listforge-generator`](listforge_generator) - Fusion and listing synthesis

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::{GenerateOptions, GeneratedListing, ListingEngine};

// Re-export component types
pub use listforge_classifier::{CategoryClassifier, CategoryScore, Classification, ClassifierConfig};
pub use listforge_compliance::{ComplianceValidator, RuleSet, ValidationResult};
pub use listforge_core::{
    load_json, AttributeValue, Attributes, Entity, Error, ImageFeatures, Listing, PostFeatures, Result,
    TextFeatures, Vector,
};
pub use listforge_generator::{ConfidenceScores, FeatureFusion, FusionConfig, GeneratorConfig, ListingGenerator};
pub use listforge_schema::{
    CategoryCatalog, CategorySchema, CategorySchemaStore, HashingEmbedder, TextEmbedder, UNKNOWN_CATEGORY,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_json, CategorySchemaStore, EngineConfig, GenerateOptions, GeneratedListing, HashingEmbedder,
        Listing, ListingEngine, PostFeatures, TextEmbedder, ValidationResult,
    };
}
