//! Feature fusion
//!
//! Merges text- and image-derived attributes into one attribute map.
//! Text evidence is more specific and wins on key collisions; images fill
//! in what the text does not say.

use listforge_core::text::{dedupe_case_insensitive, words};
use listforge_core::{AttributeValue, Attributes, ImageFeatures, TextFeatures};
use serde::{Deserialize, Serialize};

/// Caption words too common to be useful keywords
const CAPTION_STOPWORDS: &[&str] = &["with", "this", "that", "from"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FusionConfig {
    pub text_weight: f32,
    pub image_weight: f32,
    /// Minimum entity score for an ORG entity to become the brand
    pub brand_min_score: f32,
    pub context_keyword_limit: usize,
    pub keyword_limit: usize,
    /// Keywords taken from each image caption
    pub caption_keyword_limit: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.6,
            image_weight: 0.4,
            brand_min_score: 0.8,
            context_keyword_limit: 15,
            keyword_limit: 20,
            caption_keyword_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceScores {
    pub text_extraction: f32,
    pub image_extraction: f32,
    pub overall: f32,
}

/// Output of fusion for one post
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FusedFeatures {
    pub attributes: Attributes,
    pub confidence: ConfidenceScores,
    /// Keywords from text, detected objects and captions
    pub all_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureFusion {
    config: FusionConfig,
}

impl FeatureFusion {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn fuse(&self, text: &TextFeatures, images: &[ImageFeatures]) -> FusedFeatures {
        let text_attributes = self.text_attributes(text);
        let image_attributes = self.image_attributes(images);
        let attributes = self.merge(text_attributes, image_attributes, text);

        let fused = FusedFeatures {
            attributes,
            confidence: self.confidence(text, images),
            all_keywords: self.combine_keywords(text, images),
        };

        tracing::debug!(
            attributes = fused.attributes.len(),
            keywords = fused.all_keywords.len(),
            confidence = fused.confidence.overall,
            "Fused features"
        );
        fused
    }

    fn text_attributes(&self, text: &TextFeatures) -> Attributes {
        let mut attributes = Attributes::new();

        for (kind, values) in &text.pattern_matches {
            if let Some(first) = values.iter().find(|v| !v.trim().is_empty()) {
                attributes.insert(kind.as_str(), first.trim());
            }
        }

        if let Some(org) = text
            .entities
            .iter()
            .find(|e| e.label == "ORG" && e.score > self.config.brand_min_score)
        {
            attributes.insert_if_absent("brand", org.text.trim());
        }
        if let Some(loc) = text.entities.iter().find(|e| e.label == "LOC") {
            attributes.insert_if_absent("origin", loc.text.trim());
        }

        if !text.keywords.is_empty() {
            attributes.insert("text_keywords", text.keywords.clone());
        }

        attributes
    }

    fn image_attributes(&self, images: &[ImageFeatures]) -> Attributes {
        let mut attributes = Attributes::new();

        if let Some(color) = majority_color(images) {
            attributes.insert("color", color);
        }

        let objects = dedupe_case_insensitive(images.iter().flat_map(|i| i.detected_objects.iter()));
        if !objects.is_empty() {
            attributes.insert("detected_objects", objects);
        }

        let captions: Vec<String> = images
            .iter()
            .flat_map(|i| i.captions.iter())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if !captions.is_empty() {
            attributes.insert("image_descriptions", captions);
        }

        attributes
    }

    fn merge(&self, text_attributes: Attributes, image_attributes: Attributes, text: &TextFeatures) -> Attributes {
        let mut merged = text_attributes;

        for (key, value) in &image_attributes {
            merged.insert_if_absent(key.as_str(), value.clone());
        }

        let objects = image_attributes.list("detected_objects");
        if !objects.is_empty() && !text.keywords.is_empty() {
            let mut context = dedupe_case_insensitive(
                text.keywords.iter().map(String::as_str).chain(objects.iter().copied()),
            );
            context.truncate(self.config.context_keyword_limit);
            merged.insert("context_keywords", AttributeValue::List(context));
        }

        merged
    }

    fn confidence(&self, text: &TextFeatures, images: &[ImageFeatures]) -> ConfidenceScores {
        let text_extraction = if text.entities.is_empty() {
            0.5
        } else {
            text.entities.iter().map(|e| e.score).sum::<f32>() / text.entities.len() as f32
        };

        let image_extraction = if images.is_empty() {
            0.0
        } else {
            let total: f32 = images
                .iter()
                .map(|image| {
                    let mut score = 0.0;
                    if image.has_caption() {
                        score += 0.3;
                    }
                    if image.has_colors() {
                        score += 0.3;
                    }
                    if image.has_objects() {
                        score += 0.4;
                    }
                    score
                })
                .sum();
            (total / images.len() as f32).min(1.0)
        };

        ConfidenceScores {
            text_extraction,
            image_extraction,
            overall: self.config.text_weight * text_extraction
                + self.config.image_weight * image_extraction,
        }
    }

    fn combine_keywords(&self, text: &TextFeatures, images: &[ImageFeatures]) -> Vec<String> {
        let mut candidates: Vec<String> = text.keywords.clone();

        for image in images {
            candidates.extend(image.detected_objects.iter().cloned());
            for caption in &image.captions {
                candidates.extend(
                    words(caption)
                        .into_iter()
                        .filter(|w| w.chars().count() > 3 && !CAPTION_STOPWORDS.contains(&w.as_str()))
                        .take(self.config.caption_keyword_limit),
                );
            }
        }

        let mut keywords = dedupe_case_insensitive(candidates);
        keywords.truncate(self.config.keyword_limit);
        keywords
    }
}

/// Most frequent dominant color across images, ties going to the first seen
fn majority_color(images: &[ImageFeatures]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for color in images.iter().flat_map(|i| i.dominant_colors.iter()) {
        let color = color.trim();
        if color.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(c, _)| c.eq_ignore_ascii_case(color)) {
            Some((_, n)) => *n += 1,
            None => counts.push((color.to_string(), 1)),
        }
    }

    let mut best: Option<&(String, usize)> = None;
    for entry in &counts {
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(color, _)| color.clone())
}
