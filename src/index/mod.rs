//! Vector index abstraction with per-video namespaces.
//!
//! Each video's chunks live in their own namespace, so similarity search
//! never leaks context across videos and a rebuild or deletion is a single
//! operation scoped to one video.

mod manager;
mod memory;
mod pinecone;

pub use manager::IndexManager;
pub use memory::MemoryVectorIndex;
pub use pinecone::PineconeIndex;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A vector queued for upsert into a namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Globally unique id within the namespace.
    pub id: String,
    /// Embedding values.
    pub values: Vec<f32>,
    /// Chunk text, stored as metadata so retrieval needs no second fetch.
    pub text: String,
}

/// A similarity match returned by a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    /// Similarity score, higher is better.
    pub score: f32,
    pub text: String,
}

/// Read-only index statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vectors: usize,
    /// Vector count per namespace.
    pub namespaces: HashMap<String, usize>,
    pub dimension: usize,
    pub metric: String,
}

/// Trait for vector index backends.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the backing index if absent. Idempotent.
    async fn ensure_ready(&self, dimension: usize, metric: &str) -> Result<()>;

    /// Write records into a namespace. Records with equal ids overwrite.
    /// Returns the number of vectors written.
    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize>;

    /// Similarity search within one namespace. Returns at most `k` matches
    /// in descending score order; an absent or empty namespace yields an
    /// empty result, not an error.
    async fn query(&self, namespace: &str, vector: &[f32], k: usize) -> Result<Vec<VectorMatch>>;

    /// Number of vectors in a namespace (0 when absent).
    async fn namespace_count(&self, namespace: &str) -> Result<usize>;

    /// Remove a namespace and all of its vectors. Returns vectors removed.
    async fn delete_namespace(&self, namespace: &str) -> Result<usize>;

    /// Remove every namespace.
    async fn delete_all(&self) -> Result<()>;

    /// Read-only introspection.
    async fn stats(&self) -> Result<IndexStats>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
