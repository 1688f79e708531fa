//! Feature sets produced by the upstream extraction collaborators.
//!
//! Text and image extraction output is consumed as-is; nothing in this crate
//! runs a model. Field names follow the extractor JSON contract, with serde
//! aliases for the alternative key spellings the extractors emit.

use crate::vector::Vector;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Confidence assumed for a detected object without an explicit score
pub const DEFAULT_OBJECT_CONFIDENCE: f32 = 0.5;

/// A named entity recognised in the post text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Entity type, e.g. `ORG`, `LOC`, `PER`
    #[serde(rename = "entity")]
    pub label: String,
    /// Surface text of the entity
    #[serde(rename = "word")]
    pub text: String,
    #[serde(default)]
    pub score: f32,
}

impl Entity {
    pub fn new(label: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            score,
        }
    }
}

/// Features extracted from the post text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextFeatures {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned_text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, rename = "embeddings", alias = "embedding")]
    pub embedding: Vector,
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Regex pattern hits keyed by attribute kind (`color`, `size`, ...)
    #[serde(default, rename = "pattern_features", alias = "pattern_matches")]
    pub pattern_matches: BTreeMap<String, Vec<String>>,
}

impl TextFeatures {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
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
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    #[must_use]
    pub fn with_pattern<I, S>(mut self, kind: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pattern_matches
            .insert(kind.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Cleaned text when the extractor supplied it, otherwise the raw text
    pub fn text(&self) -> &str {
        self.cleaned_text.as_deref().unwrap_or(&self.raw_text)
    }
}

/// Image quality tier reported by the quality analyser
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityMetrics {
    #[serde(default, alias = "overall_quality", skip_serializing_if = "Option::is_none")]
    pub quality_tier: Option<QualityTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextureAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_appearance: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Features extracted from one product image
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageFeatures {
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mood: Option<String>,
    #[serde(default, rename = "texture_analysis")]
    pub texture: TextureAnalysis,
    #[serde(default, alias = "object_tags", alias = "primary_objects")]
    pub detected_objects: Vec<String>,
    #[serde(default)]
    pub object_confidences: HashMap<String, f32>,
    #[serde(default)]
    pub quality_metrics: QualityMetrics,
    #[serde(default)]
    pub inferred_materials: Vec<String>,
    #[serde(default, alias = "caption", deserialize_with = "one_or_many")]
    pub captions: Vec<String>,
}

impl ImageFeatures {
    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dominant_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: impl Into<String>, confidence: Option<f32>) -> Self {
        let object = object.into();
        if let Some(confidence) = confidence {
            self.object_confidences.insert(object.clone(), confidence);
        }
        self.detected_objects.push(object);
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.captions.push(caption.into());
        self
    }

    #[must_use]
    pub fn with_quality(mut self, tier: QualityTier) -> Self {
        self.quality_metrics.quality_tier = Some(tier);
        self
    }

    pub fn has_caption(&self) -> bool {
        self.captions.iter().any(|c| !c.trim().is_empty())
    }

    pub fn has_colors(&self) -> bool {
        !self.dominant_colors.is_empty()
    }

    pub fn has_objects(&self) -> bool {
        !self.detected_objects.is_empty()
    }

    /// Detected objects paired with their confidence
    pub fn object_pairs(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.detected_objects.iter().map(|object| {
            let confidence = self
                .object_confidences
                .get(object)
                .copied()
                .unwrap_or(DEFAULT_OBJECT_CONFIDENCE);
            (object.as_str(), confidence)
        })
    }
}

/// Everything extracted from one social post: its text and any images
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostFeatures {
    #[serde(default)]
    pub text: TextFeatures,
    #[serde(default)]
    pub images: Vec<ImageFeatures>,
}

impl PostFeatures {
    pub fn new(text: TextFeatures, images: Vec<ImageFeatures>) -> Self {
        Self { text, images }
    }
}

/// Accepts either a single string or a list of strings
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_features_from_extractor_json() {
        let features: TextFeatures = serde_json::from_value(json!({
            "raw_text": "New HydroPeak bottle!",
            "keywords": ["bottle", "hydropeak"],
            "embeddings": [0.1, 0.2],
            "entities": [{"entity": "ORG", "word": "HydroPeak", "score": 0.93}],
            "pattern_features": {"color": ["black"]}
        }))
        .unwrap();

        assert_eq!(features.keywords.len(), 2);
        assert_eq!(features.embedding.dim(), 2);
        assert_eq!(features.entities[0].label, "ORG");
        assert_eq!(features.entities[0].text, "HydroPeak");
        assert_eq!(features.pattern_matches["color"], vec!["black"]);
        assert_eq!(features.text(), "New HydroPeak bottle!");
    }

    #[test]
    fn test_image_features_accepts_single_caption_and_object_tags() {
        let image: ImageFeatures = serde_json::from_value(json!({
            "dominant_colors": ["black"],
            "object_tags": ["bottle"],
            "caption": "a black bottle on a desk",
            "quality_metrics": {"quality_tier": "high"}
        }))
        .unwrap();

        assert_eq!(image.detected_objects, vec!["bottle"]);
        assert_eq!(image.captions, vec!["a black bottle on a desk"]);
        assert_eq!(image.quality_metrics.quality_tier, Some(QualityTier::High));
        assert!(image.has_caption() && image.has_colors() && image.has_objects());
    }

    #[test]
    fn test_image_features_accepts_caption_list_and_primary_objects() {
        let image: ImageFeatures = serde_json::from_value(json!({
            "primary_objects": ["mat"],
            "captions": ["a purple yoga mat", "rolled mat"]
        }))
        .unwrap();

        assert_eq!(image.detected_objects, vec!["mat"]);
        assert_eq!(image.captions.len(), 2);
        assert!(!image.has_colors());
    }

    #[test]
    fn test_post_features_without_images() {
        let post: PostFeatures = serde_json::from_value(json!({
            "text": {"raw_text": "hello", "keywords": ["hello"]}
        }))
        .unwrap();

        assert_eq!(post.text.raw_text, "hello");
        assert!(post.images.is_empty());
    }

    #[test]
    fn test_object_pairs_default_confidence() {
        let image = ImageFeatures::default()
            .with_object("bottle", Some(0.9))
            .with_object("cup", None);

        let pairs: Vec<_> = image.object_pairs().collect();
        assert_eq!(pairs, vec![("bottle", 0.9), ("cup", DEFAULT_OBJECT_CONFIDENCE)]);
    }
}
