use serde::{Deserialize, Serialize};

/// A dense embedding vector
///
/// Serialized as a bare JSON array so extraction output (`"embeddings": [...]`)
/// deserializes directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Compute cosine similarity with another vector
    ///
    /// Returns 0.0 when either vector is empty, has zero norm, or the
    /// dimensions differ.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.is_empty() || self.dim() != other.dim() {
            return 0.0;
        }

        let dot_product: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = Vector::new(vec![1.0, 0.0]);
        let v4 = Vector::new(vec![0.0, 1.0]);
        assert!((v3.cosine_similarity(&v4) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        let empty = Vector::empty();
        let v = Vector::new(vec![1.0, 2.0]);
        assert_eq!(empty.cosine_similarity(&v), 0.0);
        assert_eq!(v.cosine_similarity(&empty), 0.0);

        let zero = Vector::new(vec![0.0, 0.0]);
        assert_eq!(v.cosine_similarity(&zero), 0.0);

        let other_dim = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.cosine_similarity(&other_dim), 0.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = Vector::new(vec![3.0, 4.0]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-6);

        let mut zero = Vector::new(vec![0.0, 0.0]);
        zero.normalize();
        assert_eq!(zero.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let v: Vector = serde_json::from_str("[0.5, 0.25]").unwrap();
        assert_eq!(v.as_slice(), &[0.5, 0.25]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[0.5,0.25]");
    }
}
