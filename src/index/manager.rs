//! Per-video namespace lifecycle on top of a vector index backend.
//!
//! The manager owns the policy the backends stay free of: deterministic
//! vector ids, dimension checking, fail-open existence checks, and
//! partial-upsert accounting.

use super::{IndexStats, VectorIndex, VectorMatch, VectorRecord};
use crate::chunking::Chunk;
use crate::error::{Result, SvarError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Manages per-video namespaces inside a vector index backend.
pub struct IndexManager {
    backend: Arc<dyn VectorIndex>,
    dimension: usize,
    metric: String,
}

impl IndexManager {
    pub fn new(backend: Arc<dyn VectorIndex>, dimension: usize, metric: &str) -> Self {
        Self {
            backend,
            dimension,
            metric: metric.to_string(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Create the backing index if absent. Idempotent; failure means the
    /// service is unreachable or the configuration is wrong.
    pub async fn ensure_index(&self) -> Result<()> {
        self.backend.ensure_ready(self.dimension, &self.metric).await
    }

    /// Whether the video's namespace holds at least one vector.
    ///
    /// Transient backend errors are treated as "does not exist": rebuilding
    /// an index that was actually present is wasted work, while silently
    /// answering with no context is a wrong answer.
    pub async fn namespace_exists(&self, video_id: &str) -> bool {
        match self.backend.namespace_count(video_id).await {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(
                    "Namespace check for {} failed, assuming absent: {}",
                    video_id, e
                );
                false
            }
        }
    }

    /// Write all chunk vectors into the video's namespace.
    ///
    /// Ids are derived from the video id and sequence index, so repeated
    /// upserts overwrite rather than duplicate. A dimension mismatch is a
    /// fatal configuration error; partial failure from the backend surfaces
    /// as `PartialUpsert` with counts.
    pub async fn upsert_chunks(
        &self,
        video_id: &str,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<usize> {
        if chunks.len() != embeddings.len() {
            return Err(SvarError::Embedding(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for embedding in embeddings {
            if embedding.len() != self.dimension {
                return Err(SvarError::IndexProvisioning(format!(
                    "Embedding dimension {} does not match index dimension {}",
                    embedding.len(),
                    self.dimension
                )));
            }
        }

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorRecord {
                id: chunk.vector_id(),
                values: embedding.clone(),
                text: chunk.text.clone(),
            })
            .collect();

        let written = self.backend.upsert(video_id, &records).await?;
        debug!("Upserted {} vectors into namespace {}", written, video_id);
        Ok(written)
    }

    /// Similarity search restricted to the video's namespace.
    ///
    /// An empty namespace yields an empty result. Backend transport errors
    /// surface as `Retrieval` so the orchestrator can retry them.
    pub async fn query(
        &self,
        video_id: &str,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<VectorMatch>> {
        if query_embedding.len() != self.dimension {
            return Err(SvarError::IndexProvisioning(format!(
                "Query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.dimension
            )));
        }

        self.backend
            .query(video_id, query_embedding, k)
            .await
            .map_err(|e| match e {
                fatal @ (SvarError::IndexProvisioning(_) | SvarError::Config(_)) => fatal,
                other => SvarError::Retrieval(other.to_string()),
            })
    }

    /// Remove all vectors for a video. Administrative path.
    pub async fn delete_namespace(&self, video_id: &str) -> Result<usize> {
        self.backend.delete_namespace(video_id).await
    }

    /// Remove every namespace. Administrative path.
    pub async fn delete_all(&self) -> Result<()> {
        self.backend.delete_all().await
    }

    /// Read-only index statistics.
    pub async fn stats(&self) -> Result<IndexStats> {
        self.backend.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryVectorIndex;
    use async_trait::async_trait;

    /// Backend whose every call fails, for fail-open checks.
    struct UnreachableBackend;

    #[async_trait]
    impl VectorIndex for UnreachableBackend {
        async fn ensure_ready(&self, _dimension: usize, _metric: &str) -> Result<()> {
            Err(SvarError::IndexProvisioning("unreachable".into()))
        }
        async fn upsert(&self, _namespace: &str, _records: &[VectorRecord]) -> Result<usize> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
        async fn query(
            &self,
            _namespace: &str,
            _vector: &[f32],
            _k: usize,
        ) -> Result<Vec<VectorMatch>> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
        async fn namespace_count(&self, _namespace: &str) -> Result<usize> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
        async fn delete_namespace(&self, _namespace: &str) -> Result<usize> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
        async fn delete_all(&self) -> Result<()> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
        async fn stats(&self) -> Result<IndexStats> {
            Err(SvarError::Retrieval("unreachable".into()))
        }
    }

    fn chunks_for(video_id: &str, texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(t.to_string(), i, video_id.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_namespace_exists_after_upsert() {
        let manager = IndexManager::new(Arc::new(MemoryVectorIndex::new()), 2, "cosine");

        assert!(!manager.namespace_exists("abc123XYZ0").await);

        let chunks = chunks_for("abc123XYZ0", &["hello", "world"]);
        let written = manager
            .upsert_chunks("abc123XYZ0", &chunks, &[vec![1.0, 0.0], vec![0.0, 1.0]])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert!(manager.namespace_exists("abc123XYZ0").await);
    }

    #[tokio::test]
    async fn test_namespace_exists_fails_open() {
        let manager = IndexManager::new(Arc::new(UnreachableBackend), 2, "cosine");
        assert!(!manager.namespace_exists("abc123XYZ0").await);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_fatal() {
        let manager = IndexManager::new(Arc::new(MemoryVectorIndex::new()), 3, "cosine");
        let chunks = chunks_for("abc123XYZ0", &["hello"]);

        let err = manager
            .upsert_chunks("abc123XYZ0", &chunks, &[vec![1.0, 0.0]])
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::IndexProvisioning(_)));
        assert!(!err.is_retryable());

        let err = manager.query("abc123XYZ0", &[1.0], 3).await.unwrap_err();
        assert!(matches!(err, SvarError::IndexProvisioning(_)));
    }

    #[tokio::test]
    async fn test_mismatched_chunk_and_embedding_counts() {
        let manager = IndexManager::new(Arc::new(MemoryVectorIndex::new()), 2, "cosine");
        let chunks = chunks_for("abc123XYZ0", &["one", "two"]);
        let err = manager
            .upsert_chunks("abc123XYZ0", &chunks, &[vec![1.0, 0.0]])
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_query_errors_surface_as_retrieval() {
        let manager = IndexManager::new(Arc::new(UnreachableBackend), 2, "cosine");
        let err = manager.query("abc123XYZ0", &[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, SvarError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_reprocessing_is_idempotent() {
        let manager = IndexManager::new(Arc::new(MemoryVectorIndex::new()), 2, "cosine");
        let chunks = chunks_for("abc123XYZ0", &["hello", "world", "again"]);
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];

        manager
            .upsert_chunks("abc123XYZ0", &chunks, &embeddings)
            .await
            .unwrap();
        manager
            .upsert_chunks("abc123XYZ0", &chunks, &embeddings)
            .await
            .unwrap();

        let stats = manager.stats().await.unwrap();
        assert_eq!(stats.namespaces["abc123XYZ0"], chunks.len());
    }
}
