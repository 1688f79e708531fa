//! Text embedders
//!
//! Category embeddings are computed once when the store is built. Model
//! embeddings produced upstream can be injected through [`TextEmbedder`];
//! [`HashingEmbedder`] is the deterministic feature-hashing fallback that
//! needs no model at all.

use ahash::RandomState;
use listforge_core::Vector;
use std::hash::BuildHasher;

/// Default dimension for hashed embeddings
pub const DEFAULT_EMBEDDING_DIM: usize = 256;

/// Default weight of a whole word relative to one trigram
pub const DEFAULT_WORD_WEIGHT: f32 = 2.0;

// Fixed seeds keep hashed positions stable across processes.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Maps text to a fixed-dimension embedding
pub trait TextEmbedder: Send + Sync {
    /// Output dimension
    fn dim(&self) -> usize;

    /// Embed a piece of text
    fn embed(&self, text: &str) -> Vector;
}

/// Feature-hashing embedder over character trigrams and words
///
/// Lowercased text is split into padded character trigrams and whitespace
/// words; each is hashed with a fixed-seed hasher to a position in the
/// output vector. Words contribute more than trigrams. The result is
/// L2-normalized, so cosine similarity between two embeddings reflects
/// shared spelling and shared words.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    word_weight: f32,
    state: RandomState,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            word_weight: DEFAULT_WORD_WEIGHT,
            state: RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]),
        }
    }

    pub fn builder() -> EmbedderBuilder {
        EmbedderBuilder::default()
    }

    #[inline]
    fn position<T: std::hash::Hash>(&self, item: T) -> usize {
        (self.state.hash_one(item) % self.dim as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl TextEmbedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vector {
        let mut components = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in trigrams(&normalized) {
            components[self.position(trigram)] += 1.0;
        }

        for word in normalized.split_whitespace() {
            components[self.position(word)] += self.word_weight;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        vector
    }
}

/// Padded character trigrams of a string
fn trigrams(s: &str) -> Vec<String> {
    let padded = format!("  {}  ", s.trim());
    let chars: Vec<char> = padded.chars().collect();

    if s.trim().is_empty() {
        return Vec::new();
    }

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Builder for creating a HashingEmbedder with custom options
#[derive(Debug, Clone)]
pub struct EmbedderBuilder {
    dim: usize,
    word_weight: f32,
}

impl Default for EmbedderBuilder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
            word_weight: DEFAULT_WORD_WEIGHT,
        }
    }
}

impl EmbedderBuilder {
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn word_weight(mut self, weight: f32) -> Self {
        self.word_weight = weight;
        self
    }

    pub fn build(self) -> HashingEmbedder {
        let mut embedder = HashingEmbedder::new(self.dim);
        embedder.word_weight = self.word_weight;
        embedder
    }
}
