use crate::attributes::Attributes;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A marketplace listing ready for submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Listing {
    /// Search terms joined the way the marketplace stores them
    pub fn joined_search_terms(&self) -> String {
        self.search_terms.join(" ")
    }
}

/// Read and deserialize a JSON document from disk
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
