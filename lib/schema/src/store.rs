//! Category schema store
//!
//! Holds the validated catalog together with one precomputed embedding per
//! category. Built once at startup and read-only afterwards; share it with
//! `Arc<CategorySchemaStore>`.

use crate::embedder::TextEmbedder;
use crate::schema::{CategoryCatalog, CategorySchema, SchemaError};
use ahash::AHashMap;
use listforge_core::Vector;
use std::collections::HashMap;
use std::path::Path;

/// Identifier returned when no category can be decided
pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, Default)]
pub struct CategorySchemaStore {
    schemas: Vec<CategorySchema>,
    embeddings: Vec<Vector>,
    index: AHashMap<String, usize>,
    fallback: Option<usize>,
}

impl CategorySchemaStore {
    /// Build a store, embedding every category through `embedder`
    pub fn build(catalog: CategoryCatalog, embedder: &dyn TextEmbedder) -> Result<Self, SchemaError> {
        catalog.validate()?;

        let embeddings = catalog
            .categories
            .iter()
            .map(|schema| embedder.embed(&schema.embedding_text()))
            .collect();

        let store = Self::assemble(catalog.categories, embeddings);
        tracing::info!(
            categories = store.len(),
            dim = embedder.dim(),
            "Built category schema store"
        );
        Ok(store)
    }

    /// Build a store from embeddings computed upstream, keyed by category id
    ///
    /// Categories without an entry get an empty embedding, which scores 0 on
    /// semantic similarity.
    pub fn with_precomputed(
        catalog: CategoryCatalog,
        mut embeddings: HashMap<String, Vector>,
    ) -> Result<Self, SchemaError> {
        catalog.validate()?;

        let embeddings = catalog
            .categories
            .iter()
            .map(|schema| {
                embeddings.remove(&schema.id).unwrap_or_else(|| {
                    tracing::debug!(category = %schema.id, "No precomputed embedding");
                    Vector::empty()
                })
            })
            .collect();

        Ok(Self::assemble(catalog.categories, embeddings))
    }

    /// Load, validate and embed a catalog file
    pub fn from_path(path: impl AsRef<Path>, embedder: &dyn TextEmbedder) -> Result<Self, SchemaError> {
        Self::build(CategoryCatalog::from_path(path)?, embedder)
    }

    fn assemble(schemas: Vec<CategorySchema>, embeddings: Vec<Vector>) -> Self {
        let index = schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| (schema.id.clone(), i))
            .collect();

        Self {
            schemas,
            embeddings,
            index,
            fallback: None,
        }
    }

    /// Register the category used by [`resolve`](Self::resolve) for unknown ids
    pub fn with_fallback(mut self, id: &str) -> Result<Self, SchemaError> {
        let position = self
            .index
            .get(id)
            .copied()
            .ok_or_else(|| SchemaError::UnknownFallback(id.to_string()))?;
        self.fallback = Some(position);
        Ok(self)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&CategorySchema> {
        self.index.get(id).map(|&i| &self.schemas[i])
    }

    /// Look up a category, falling back for `"unknown"` or unlisted ids
    pub fn resolve(&self, id: &str) -> Option<&CategorySchema> {
        let direct = if id == UNKNOWN_CATEGORY {
            None
        } else {
            self.get(id)
        };
        direct.or_else(|| self.fallback.map(|i| &self.schemas[i]))
    }

    pub fn fallback(&self) -> Option<&CategorySchema> {
        self.fallback.map(|i| &self.schemas[i])
    }

    /// Precomputed embedding of a category
    pub fn embedding(&self, id: &str) -> Option<&Vector> {
        self.index.get(id).map(|&i| &self.embeddings[i])
    }

    /// Schemas paired with their embeddings, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&CategorySchema, &Vector)> {
        self.schemas.iter().zip(self.embeddings.iter())
    }

    pub fn schemas(&self) -> &[CategorySchema] {
        &self.schemas
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;

    fn create_test_catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![
            CategorySchema::new("water_bottle", "Water Bottle")
                .with_keywords(["bottle", "water", "steel", "insulated"]),
            CategorySchema::new("yoga_mat", "Yoga Mat").with_keywords(["yoga", "mat", "exercise"]),
            CategorySchema::new("headphones", "Headphones")
                .with_keywords(["headphones", "audio", "wireless"]),
        ])
    }

    #[test]
    fn test_build_preserves_catalog_order() {
        let store = CategorySchemaStore::build(create_test_catalog(), &HashingEmbedder::default()).unwrap();

        let ids: Vec<_> = store.iter().map(|(schema, _)| schema.id.as_str()).collect();
        assert_eq!(ids, vec!["water_bottle", "yoga_mat", "headphones"]);
        assert_eq!(store.len(), 3);
        assert!(store.iter().all(|(_, v)| v.dim() > 0));
    }

    #[test]
    fn test_build_rejects_invalid_catalog() {
        let result = CategorySchemaStore::build(CategoryCatalog::default(), &HashingEmbedder::default());
        assert!(matches!(result, Err(SchemaError::EmptyCatalog)));
    }

    #[test]
    fn test_precomputed_missing_entries_are_empty() {
        let mut embeddings = HashMap::new();
        embeddings.insert("yoga_mat".to_string(), Vector::new(vec![1.0, 0.0]));

        let store = CategorySchemaStore::with_precomputed(create_test_catalog(), embeddings).unwrap();
        assert_eq!(store.embedding("yoga_mat").map(Vector::dim), Some(2));
        assert!(store.embedding("water_bottle").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_with_fallback() {
        let store = CategorySchemaStore::build(create_test_catalog(), &HashingEmbedder::default())
            .unwrap()
            .with_fallback("yoga_mat")
            .unwrap();

        assert_eq!(store.resolve("headphones").unwrap().id, "headphones");
        assert_eq!(store.resolve(UNKNOWN_CATEGORY).unwrap().id, "yoga_mat");
        assert_eq!(store.resolve("toaster").unwrap().id, "yoga_mat");
        assert!(store.get("toaster").is_none());
    }

    #[test]
    fn test_resolve_without_fallback() {
        let store = CategorySchemaStore::build(create_test_catalog(), &HashingEmbedder::default()).unwrap();
        assert!(store.resolve(UNKNOWN_CATEGORY).is_none());
        assert!(store.resolve("toaster").is_none());
    }

    #[test]
    fn test_unknown_fallback_is_rejected() {
        let result = CategorySchemaStore::build(create_test_catalog(), &HashingEmbedder::default())
            .unwrap()
            .with_fallback("toaster");
        assert!(matches!(result, Err(SchemaError::UnknownFallback(id)) if id == "toaster"));
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CategorySchemaStore>();
        assert_send_sync::<std::sync::Arc<CategorySchemaStore>>();
    }
}
