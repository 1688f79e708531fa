//! # ListForge Core
//!
//! Core data model for the ListForge listing engine.
//!
//! This crate provides the types every other stage exchanges:
//!
//! - [`TextFeatures`] / [`ImageFeatures`] - extraction output for one post
//! - [`Vector`] - Dense embedding with cosine similarity
//! - [`Attributes`] - Ordered map of [`AttributeValue`]s
//! - [`Listing`] - The generated marketplace listing
//! - [`text`] - Unicode-aware tokenization, truncation and phrase matching
//!
//! ## Example
//!
//! ```rust
//! use listforge_core::{Attributes, Listing, TextFeatures};
//!
//! let features = TextFeatures::new("Insulated steel bottle for the gym")
//!     .with_keywords(["bottle", "steel"]);
//! assert_eq!(features.keywords.len(), 2);
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("color", "black");
//!
//! let listing = Listing {
//!     title: "Steel Water Bottle".to_string(),
//!     attributes,
//!     ..Default::default()
//! };
//! assert_eq!(listing.attributes.primary("color"), Some("black"));
//! ```

pub mod attributes;
pub mod error;
pub mod features;
pub mod listing;
pub mod text;
pub mod vector;

pub use attributes::{AttributeValue, Attributes};
pub use error::{Error, Result};
pub use features::{
    Entity, ImageFeatures, PostFeatures, QualityMetrics, QualityTier, TextFeatures, TextureAnalysis,
    DEFAULT_OBJECT_CONFIDENCE,
};
pub use listing::{load_json, Listing};
pub use vector::Vector;
