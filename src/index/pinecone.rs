//! Pinecone-style remote vector index over HTTP.
//!
//! Talks to the data plane of a serverless index (`/vectors/upsert`,
//! `/query`, `/describe_index_stats`, `/vectors/delete`) and to the control
//! plane for index creation. Provisioning failures are fatal configuration
//! errors, not per-request errors.

use super::{IndexStats, VectorIndex, VectorMatch, VectorRecord};
use crate::config::VectorIndexSettings;
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Vectors per upsert request; the service caps request body sizes.
const UPSERT_BATCH_SIZE: usize = 100;

/// Remote vector index client.
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    control_plane_url: String,
    index_name: String,
    api_key: String,
}

impl PineconeIndex {
    /// Build a client from settings, reading the API key from the
    /// configured environment variable.
    pub fn from_settings(settings: &VectorIndexSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                SvarError::Config(format!(
                    "{} is not set; it is required for the pinecone vector index provider",
                    settings.api_key_env
                ))
            })?;

        if settings.host.is_empty() {
            return Err(SvarError::Config(
                "vector_index.host must be set for the pinecone provider".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            host: settings.host.trim_end_matches('/').to_string(),
            control_plane_url: settings.control_plane_url.trim_end_matches('/').to_string(),
            index_name: settings.index_name.clone(),
            api_key,
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(url)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SvarError::Retrieval(format!(
                "Vector service returned {}: {}",
                status, text
            )));
        }

        Ok(response.json().await?)
    }
}

// === Wire types ===

#[derive(Serialize)]
struct WireVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: WireMetadata<'a>,
}

#[derive(Serialize)]
struct WireMetadata<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<WireVector<'a>>,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    namespace: &'a str,
    #[serde(rename = "topK")]
    top_k: usize,
    vector: &'a [f32],
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<QueryMetadata>,
}

#[derive(Deserialize)]
struct QueryMetadata {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    #[serde(rename = "deleteAll")]
    delete_all: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    namespaces: HashMap<String, NamespaceStats>,
    #[serde(default)]
    dimension: usize,
    #[serde(rename = "totalVectorCount", default)]
    total_vector_count: usize,
}

#[derive(Deserialize)]
struct NamespaceStats {
    #[serde(rename = "vectorCount", default)]
    vector_count: usize,
}

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Deserialize)]
struct IndexDescription {
    name: String,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_ready(&self, dimension: usize, metric: &str) -> Result<()> {
        let list_url = format!("{}/indexes", self.control_plane_url);
        let response = self
            .client
            .get(&list_url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                SvarError::IndexProvisioning(format!("Cannot reach vector service: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(SvarError::IndexProvisioning(format!(
                "Listing indexes failed with {}",
                response.status()
            )));
        }

        let list: IndexList = response
            .json()
            .await
            .map_err(|e| SvarError::IndexProvisioning(format!("Bad index list response: {}", e)))?;

        if list.indexes.iter().any(|i| i.name == self.index_name) {
            debug!("Index {} already exists", self.index_name);
        } else {
            info!("Creating index {}", self.index_name);
            let create_url = format!("{}/indexes", self.control_plane_url);
            let body = serde_json::json!({
                "name": self.index_name,
                "dimension": dimension,
                "metric": metric,
                "spec": { "serverless": { "cloud": "aws", "region": "us-east-1" } },
            });
            let response = self
                .client
                .post(&create_url)
                .header("Api-Key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    SvarError::IndexProvisioning(format!("Index creation request failed: {}", e))
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(SvarError::IndexProvisioning(format!(
                    "Index creation failed with {}: {}",
                    status, text
                )));
            }
        }

        // A dimension mismatch between configuration and the live index is
        // fatal; nothing useful can be upserted or queried against it.
        let stats = self.stats().await.map_err(|e| {
            SvarError::IndexProvisioning(format!("Cannot read index stats: {}", e))
        })?;
        if stats.dimension != 0 && stats.dimension != dimension {
            return Err(SvarError::IndexProvisioning(format!(
                "Index {} has dimension {} but configuration expects {}",
                self.index_name, stats.dimension, dimension
            )));
        }

        Ok(())
    }

    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize> {
        let url = format!("{}/vectors/upsert", self.host);
        let mut written = 0;

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            let request = UpsertRequest {
                vectors: batch
                    .iter()
                    .map(|r| WireVector {
                        id: &r.id,
                        values: &r.values,
                        metadata: WireMetadata { text: &r.text },
                    })
                    .collect(),
                namespace,
            };

            match self.post_json::<_, UpsertResponse>(&url, &request).await {
                // Older service versions omit upsertedCount; fall back to
                // the batch length.
                Ok(response) => {
                    written += if response.upserted_count > 0 {
                        response.upserted_count
                    } else {
                        batch.len()
                    }
                }
                Err(e) if written > 0 => {
                    debug!("Upsert batch failed after {} vectors: {}", written, e);
                    return Err(SvarError::PartialUpsert {
                        written,
                        attempted: records.len(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(written)
    }

    async fn query(&self, namespace: &str, vector: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        let url = format!("{}/query", self.host);
        let request = QueryRequest {
            namespace,
            top_k: k,
            vector,
            include_metadata: true,
        };

        let response: QueryResponse = self.post_json(&url, &request).await?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| VectorMatch {
                id: m.id,
                score: m.score,
                text: m.metadata.map(|md| md.text).unwrap_or_default(),
            })
            .collect())
    }

    async fn namespace_count(&self, namespace: &str) -> Result<usize> {
        let stats = self.stats().await?;
        Ok(stats.namespaces.get(namespace).copied().unwrap_or(0))
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<usize> {
        let count = self.namespace_count(namespace).await.unwrap_or(0);
        let url = format!("{}/vectors/delete", self.host);
        let request = DeleteRequest {
            delete_all: true,
            namespace,
        };
        let _: serde_json::Value = self.post_json(&url, &request).await?;
        Ok(count)
    }

    async fn delete_all(&self) -> Result<()> {
        let stats = self.stats().await?;
        for namespace in stats.namespaces.keys() {
            self.delete_namespace(namespace).await?;
        }
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let url = format!("{}/describe_index_stats", self.host);
        let response: StatsResponse = self.post_json(&url, &serde_json::json!({})).await?;

        Ok(IndexStats {
            total_vectors: response.total_vector_count,
            namespaces: response
                .namespaces
                .into_iter()
                .map(|(name, ns)| (name, ns.vector_count))
                .collect(),
            dimension: response.dimension,
            metric: "cosine".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorIndexSettings;

    #[test]
    fn test_from_settings_requires_host() {
        std::env::set_var("SVAR_TEST_PINECONE_KEY", "test-key");
        let settings = VectorIndexSettings {
            api_key_env: "SVAR_TEST_PINECONE_KEY".to_string(),
            host: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            PineconeIndex::from_settings(&settings),
            Err(SvarError::Config(_))
        ));
    }

    #[test]
    fn test_from_settings_requires_api_key() {
        let settings = VectorIndexSettings {
            api_key_env: "SVAR_TEST_MISSING_KEY".to_string(),
            host: "https://example.svc.pinecone.io".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            PineconeIndex::from_settings(&settings),
            Err(SvarError::Config(_))
        ));
    }

    #[test]
    fn test_wire_formats() {
        let request = QueryRequest {
            namespace: "abc123XYZ0",
            top_k: 3,
            vector: &[0.1, 0.2],
            include_metadata: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["namespace"], "abc123XYZ0");
        assert_eq!(json["includeMetadata"], true);

        let stats: StatsResponse = serde_json::from_str(
            r#"{"namespaces":{"abc123XYZ0":{"vectorCount":3}},"dimension":1536,"totalVectorCount":3}"#,
        )
        .unwrap();
        assert_eq!(stats.namespaces["abc123XYZ0"].vector_count, 3);
        assert_eq!(stats.dimension, 1536);
    }
}
