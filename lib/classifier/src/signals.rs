//! Signal scorers for category classification
//!
//! Each function scores one kind of evidence that a post belongs to a
//! category. Keyword and image scores are unbounded above; the semantic
//! score lies in [0, 1].

use ahash::AHashSet;
use listforge_core::text::dedupe_case_insensitive;
use listforge_core::{ImageFeatures, Vector};
use serde::{Deserialize, Serialize};

/// Boost per primary keyword present in the text
pub const PRIMARY_KEYWORD_BOOST: f32 = 0.3;

/// Weights of the three signals in the combined score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalWeights {
    pub keyword: f32,
    pub semantic: f32,
    pub image: f32,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            keyword: 0.25,
            semantic: 0.35,
            image: 0.40,
        }
    }
}

impl SignalWeights {
    /// Weighted sum of the three signals
    #[inline]
    pub fn combine(&self, keyword: f32, semantic: f32, image: f32) -> f32 {
        self.keyword * keyword + self.semantic * semantic + self.image * image
    }

    pub fn is_valid(&self) -> bool {
        [self.keyword, self.semantic, self.image]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

fn folded_set<'a, I>(items: I) -> AHashSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keyword overlap score
///
/// `base = |text ∩ category| / |category|`, boosted by
/// [`PRIMARY_KEYWORD_BOOST`] for each of the category's primary keywords
/// found in the text. Matching is case-insensitive.
pub fn keyword_score(text_keywords: &[String], category_keywords: &[String], primary: &[String]) -> f32 {
    let text = folded_set(text_keywords);
    let category = folded_set(category_keywords);
    if text.is_empty() || category.is_empty() {
        return 0.0;
    }

    let overlap = text.intersection(&category).count();
    if overlap == 0 {
        return 0.0;
    }

    let base = overlap as f32 / category.len() as f32;
    let primary_matches = folded_set(primary)
        .iter()
        .filter(|p| text.contains(*p))
        .count();

    base * (1.0 + PRIMARY_KEYWORD_BOOST * primary_matches as f32)
}

/// Cosine similarity between the post and category embeddings, floored at 0
#[inline]
pub fn semantic_score(text_embedding: &Vector, category_embedding: &Vector) -> f32 {
    text_embedding.cosine_similarity(category_embedding).max(0.0)
}

/// Image object score
///
/// Every detected object across all images is matched against the
/// category keywords in order; the first keyword equal to, containing, or
/// contained in the object adds the object's confidence once. The total is
/// divided by the number of distinct non-blank category keywords, the same
/// denominator [`keyword_score`] uses.
pub fn image_object_score(images: &[ImageFeatures], category_keywords: &[String]) -> f32 {
    let keywords = dedupe_case_insensitive(category_keywords.iter().map(|k| k.to_lowercase()));
    if keywords.is_empty() {
        return 0.0;
    }

    let mut total = 0.0f32;
    for image in images {
        for (object, confidence) in image.object_pairs() {
            let object = object.trim().to_lowercase();
            if object.is_empty() {
                continue;
            }
            let matched = keywords
                .iter()
                .any(|k| *k == object || object.contains(k.as_str()) || k.contains(object.as_str()));
            if matched {
                total += confidence;
            }
        }
    }

    total / keywords.len() as f32
}
