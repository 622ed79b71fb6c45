//! In-memory vector index implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, IndexStats, VectorIndex, VectorMatch, VectorRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    /// namespace -> id -> record
    namespaces: HashMap<String, HashMap<String, VectorRecord>>,
    dimension: usize,
    metric: String,
}

/// In-memory vector index with per-namespace isolation.
pub struct MemoryVectorIndex {
    inner: RwLock<Inner>,
}

impl MemoryVectorIndex {
    /// Create a new in-memory vector index.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn ensure_ready(&self, dimension: usize, metric: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.dimension = dimension;
        inner.metric = metric.to_string();
        Ok(())
    }

    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize> {
        let mut inner = self.inner.write().unwrap();
        let ns = inner.namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            ns.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn query(&self, namespace: &str, vector: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        let inner = self.inner.read().unwrap();

        let Some(ns) = inner.namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<VectorMatch> = ns
            .values()
            .map(|record| VectorMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.values),
                text: record.text.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(k);

        Ok(matches)
    }

    async fn namespace_count(&self, namespace: &str) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner.namespaces.get(namespace).map_or(0, |ns| ns.len()))
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<usize> {
        let mut inner = self.inner.write().unwrap();
        Ok(inner.namespaces.remove(namespace).map_or(0, |ns| ns.len()))
    }

    async fn delete_all(&self) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.namespaces.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let inner = self.inner.read().unwrap();
        let namespaces: HashMap<String, usize> = inner
            .namespaces
            .iter()
            .map(|(name, ns)| (name.clone(), ns.len()))
            .collect();

        Ok(IndexStats {
            total_vectors: namespaces.values().sum(),
            namespaces,
            dimension: inner.dimension,
            metric: inner.metric.clone(),
        })
    }
}
