//! Embedding capability and similarity math.
//!
//! The embedding model is consumed as a capability: anything implementing
//! [`Embedder`] can back the ranker, so tests run against deterministic
//! stubs and a real model can be injected without touching ranking code.
//! [`HashingEmbedder`] is the offline default.

use crate::error::{Error, Result};

/// Capability mapping text to a fixed-length numeric vector. Implementations
/// must be deterministic for identical input text.
pub trait Embedder: Send + Sync {
    /// Output dimensionality, fixed per embedder.
    fn dimension(&self) -> usize;

    /// Embed one text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch. The result is index-aligned with the input; a failed
    /// item fails alone and never poisons its neighbors.
    fn embed_many(&self, texts: &[&str]) -> Vec<Result<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Cosine similarity between two vectors. Defined as 0 when either vector
/// has zero magnitude; never divides by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..len {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Offline deterministic embedder: feature-hashed bag of tokens with signed
/// buckets, L2-normalized. Not a learned model, but stable, dimension-fixed,
/// and similarity-preserving enough to drive the pipeline without downloads.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Default output dimensionality.
    pub const DEFAULT_DIMENSION: usize = 256;

    /// Create an embedder with the default dimension.
    pub fn new() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }

    /// Create an embedder with a custom dimension (minimum 8).
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(8),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let index = (hash % self.dimension as u64) as usize;
            // One hash bit picks the sign so colliding tokens can cancel
            // instead of always reinforcing.
            let sign = if hash & (1u64 << 63) == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}

/// Lowercased alphanumeric tokens, Unicode-aware.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// FNV-1a, 64-bit. Inlined so token bucketing stays stable across Rust
/// releases (std's default hasher makes no such promise).
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Wrap a raw embedding result, checking the advertised dimension.
pub fn check_dimension(embedder: &dyn Embedder, vector: Vec<f32>) -> Result<Vec<f32>> {
    let expected = embedder.dimension();
    if vector.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(vector)
}
