//! Category schema definitions
//!
//! A category schema names a marketplace category, the keywords that
//! identify it, the attributes a listing in it must carry, and the
//! listing layout hints. The catalog document is a list of schemas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One marketplace category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySchema {
    /// Stable identifier, e.g. `water_bottle`
    #[serde(rename = "category_id", alias = "id", default)]
    pub id: String,

    /// Display name used in titles and descriptions
    #[serde(rename = "category_name", alias = "name", default)]
    pub name: String,

    /// Identifying keywords in priority order
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Attributes a listing in this category must carry
    #[serde(default)]
    pub required_fields: BTreeMap<String, FieldSpec>,

    /// Attributes a listing may carry
    #[serde(default)]
    pub optional_fields: BTreeMap<String, FieldSpec>,

    #[serde(default)]
    pub listing_rules: ListingRules,
}

impl CategorySchema {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            keywords: Vec::new(),
            required_fields: BTreeMap::new(),
            optional_fields: BTreeMap::new(),
            listing_rules: ListingRules::default(),
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.required_fields.insert(name.into(), spec);
        self
    }

    /// The first `n` keywords, or all of them when there are fewer
    #[inline]
    pub fn primary_keywords(&self, n: usize) -> &[String] {
        &self.keywords[..n.min(self.keywords.len())]
    }

    /// Display name, falling back to the id when unnamed
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Text embedded to represent this category: name followed by keywords
    pub fn embedding_text(&self) -> String {
        let mut text = self.display_name().to_string();
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(keyword);
        }
        text
    }
}

/// Declared type and bounds of a schema field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldSpec {
    pub fn text() -> Self {
        Self {
            field_type: FieldType::Text,
            min: None,
            max: None,
        }
    }

    pub fn numeric(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            field_type: FieldType::Numeric,
            min,
            max,
        }
    }

    pub fn boolean() -> Self {
        Self {
            field_type: FieldType::Boolean,
            min: None,
            max: None,
        }
    }
}

/// Field type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    #[serde(alias = "number")]
    Numeric,
    #[serde(alias = "bool")]
    Boolean,
}

/// Listing layout hints for a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingRules {
    /// Informational only: titles are always assembled as brand, name,
    /// capacity, color, material. Kept so catalogs round-trip unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_format: Option<String>,

    /// Bullet aspects written first, in order ("material", "comfort", ...)
    #[serde(default)]
    pub bullet_priorities: Vec<String>,
}

/// The catalog document: `{"categories": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryCatalog {
    #[serde(default)]
    pub categories: Vec<CategorySchema>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<CategorySchema>) -> Self {
        Self { categories }
    }

    /// Parse and validate a catalog document
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let catalog: CategoryCatalog =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Check that the catalog is non-empty, every category has an id and at
    /// least one keyword, and ids are unique
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.categories.is_empty() {
            return Err(SchemaError::EmptyCatalog);
        }

        let mut seen = ahash::AHashSet::with_capacity(self.categories.len());
        for (position, schema) in self.categories.iter().enumerate() {
            if schema.id.trim().is_empty() {
                return Err(SchemaError::MissingId(position));
            }
            if schema.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(SchemaError::NoKeywords(schema.id.clone()));
            }
            if !seen.insert(schema.id.as_str()) {
                return Err(SchemaError::DuplicateCategory(schema.id.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur while loading or validating the catalog
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Category catalog cannot be empty")]
    EmptyCatalog,

    #[error("Category at position {0} has no id")]
    MissingId(usize),

    #[error("Category '{0}' has no keywords")]
    NoKeywords(String),

    #[error("Category '{0}' is defined more than once")]
    DuplicateCategory(String),

    #[error("Fallback category '{0}' not found in catalog")]
    UnknownFallback(String),

    #[error("Failed to read catalog: {0}")]
    Io(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}
