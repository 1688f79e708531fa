//! # ListForge Generator
//!
//! Turns extracted post features into a marketplace listing.
//!
//! ```text
//!   TextFeatures ─┐
//!                 ├─► FeatureFusion ─► extract_attributes ─┬─► title
//!  ImageFeatures ─┘                                        ├─► bullets (shuffled aspects)
//!                                                          ├─► description
//!                                                          └─► search terms
//! ```
//!
//! Every written field goes through the same banned-phrase cleanup the
//! compliance validator checks against. Bullet order is drawn from a
//! caller-supplied [`rand::Rng`], so a seeded generator is reproducible.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use listforge_compliance::{ComplianceValidator, RuleSet};
//! use listforge_core::{PostFeatures, TextFeatures};
//! use listforge_generator::ListingGenerator;
//! use listforge_schema::{CategoryCatalog, CategorySchema, CategorySchemaStore, HashingEmbedder};
//!
//! let catalog = CategoryCatalog::new(vec![
//!     CategorySchema::new("yoga_mat", "Yoga Mat").with_keywords(["yoga", "mat"]),
//! ]);
//! let store = CategorySchemaStore::build(catalog, &HashingEmbedder::default()).unwrap();
//! let validator = ComplianceValidator::new(RuleSet::default()).unwrap();
//! let generator = ListingGenerator::new(Arc::new(store), validator);
//!
//! let post = PostFeatures::new(TextFeatures::new("Cork yoga mat for the studio"), vec![]);
//! let listing = generator.generate_seeded("yoga_mat", &post, 7).unwrap();
//! assert!(listing.bullets.len() >= 3);
//! ```

pub mod bullets;
pub mod description;
pub mod extract;
pub mod fusion;
pub mod generator;
pub mod search_terms;
pub mod title;

pub use bullets::{Aspect, BulletContext, BulletSynthesizer};
pub use extract::{extract_attributes, ExtractedAttributes};
pub use fusion::{ConfidenceScores, FeatureFusion, FusedFeatures, FusionConfig};
pub use generator::{GeneratorConfig, ListingGenerator};
