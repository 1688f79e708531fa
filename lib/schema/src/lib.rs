//! # ListForge Schema
//!
//! Category catalog for the listing engine.
//!
//! ## Overview
//!
//! Each marketplace category is described by a [`CategorySchema`]: an id,
//! a display name, ordered identifying keywords, required attributes and
//! listing hints. The catalog is loaded once at startup into a
//! [`CategorySchemaStore`], which also precomputes one embedding per
//! category for semantic scoring.
//!
//! **How it works:**
//! 1. The catalog JSON is parsed and validated (non-empty, ids present and
//!    unique, keywords present)
//! 2. Each category's `"{name} {keywords}"` text is embedded through a
//!    [`TextEmbedder`], or embeddings computed upstream are attached
//! 3. The store is wrapped in an `Arc` and shared read-only by the
//!    classifier and generator
//!
//! ## Catalog Definition
//!
//! ```rust
//! use listforge_schema::{CategoryCatalog, CategorySchema, CategorySchemaStore, FieldSpec, HashingEmbedder};
//!
//! let catalog = CategoryCatalog::new(vec![
//!     CategorySchema::new("water_bottle", "Water Bottle")
//!         .with_keywords(["bottle", "water", "steel", "insulated"])
//!         .with_required("capacity_ml", FieldSpec::numeric(Some(100.0), Some(5000.0))),
//! ]);
//!
//! let store = CategorySchemaStore::build(catalog, &HashingEmbedder::default()).unwrap();
//! assert_eq!(store.get("water_bottle").unwrap().name, "Water Bottle");
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Catalog    │────>│  Embedder   │────>│   Store     │
//! │  (JSON)     │     │ (per name)  │     │ (Arc, r/o)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                  ┌─────────────┴─────────────┐
//!                                  │                           │
//!                           ┌──────┴──────┐             ┌──────┴──────┐
//!                           │ Classifier  │             │  Generator  │
//!                           └─────────────┘             └─────────────┘
//! ```

pub mod embedder;
pub mod schema;
pub mod store;

// Re-export main types
pub use embedder::{EmbedderBuilder, HashingEmbedder, TextEmbedder, DEFAULT_EMBEDDING_DIM};
pub use schema::{
    CategoryCatalog,
    CategorySchema,
    FieldSpec,
    FieldType,
    ListingRules,
    SchemaError,
};
pub use store::{CategorySchemaStore, UNKNOWN_CATEGORY};
