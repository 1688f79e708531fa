//! Explainability for classification decisions
//!
//! Every category evaluated for a post gets a [`CategoryScore`] showing the
//! raw signal values, the weighted combination, and whether the
//! incidental-mention penalty applied.

use crate::signals::SignalWeights;
use serde::Serialize;

/// Per-category score breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryScore {
    pub category_id: String,
    pub keyword: f32,
    pub semantic: f32,
    pub image: f32,
    /// Weighted sum before the penalty
    pub combined: f32,
    /// Whether the incidental-mention penalty was applied
    pub penalized: bool,
    /// Score used for selection
    pub final_score: f32,
}

impl CategoryScore {
    /// Signal with the largest weighted contribution, if any contributed
    pub fn top_signal(&self, weights: &SignalWeights) -> Option<&'static str> {
        [
            ("keyword", weights.keyword * self.keyword),
            ("semantic", weights.semantic * self.semantic),
            ("image", weights.image * self.image),
        ]
        .into_iter()
        .filter(|(_, contribution)| *contribution > 0.0)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name)
    }
}

/// Outcome of classifying one post
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Classification {
    /// Winning category id, or `"unknown"`
    pub category: String,
    /// Final score of the best category
    pub confidence: f32,
    /// Scores for every category, in catalog order
    pub scores: Vec<CategoryScore>,
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.category == listforge_schema::UNKNOWN_CATEGORY
    }

    /// Score breakdown of a specific category
    pub fn score_for(&self, category_id: &str) -> Option<&CategoryScore> {
        self.scores.iter().find(|s| s.category_id == category_id)
    }

    /// Scores sorted by final score, best first
    pub fn ranked(&self) -> Vec<&CategoryScore> {
        let mut ranked: Vec<&CategoryScore> = self.scores.iter().collect();
        // Stable sort keeps catalog order among ties
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
