//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript: TranscriptSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub vector_index: VectorIndexSettings,
    pub rag: RagSettings,
    pub retry: RetrySettings,
    pub prompts: crate::config::Prompts,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.svar".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption language code.
    pub language: String,
    /// Timeout for transcript HTTP requests (seconds).
    pub timeout_seconds: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions. Must match the vector index dimension.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks. Must be smaller than
    /// `chunk_size`.
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            overlap: 50,
        }
    }
}

/// Vector index backend provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorIndexProvider {
    /// In-process store, useful for testing and small runs.
    #[default]
    Memory,
    /// Remote Pinecone-style service over HTTP.
    Pinecone,
}

impl std::str::FromStr for VectorIndexProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(VectorIndexProvider::Memory),
            "pinecone" => Ok(VectorIndexProvider::Pinecone),
            _ => Err(format!("Unknown vector index provider: {}", s)),
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexSettings {
    /// Backend provider (memory, pinecone).
    pub provider: VectorIndexProvider,
    /// Index name in the remote service.
    pub index_name: String,
    /// Data-plane base URL of the index (pinecone provider).
    pub host: String,
    /// Control-plane URL for index creation (pinecone provider).
    pub control_plane_url: String,
    /// Environment variable holding the service API key.
    pub api_key_env: String,
    /// Similarity metric.
    pub metric: String,
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            provider: VectorIndexProvider::Memory,
            index_name: "youtube-transcriptions".to_string(),
            host: String::new(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_key_env: "PINECONE_API_KEY".to_string(),
            metric: "cosine".to_string(),
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Number of highest-similarity chunks to retrieve per question.
    pub top_k: usize,
    /// Maximum assembled context length in characters.
    pub max_context_chars: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            top_k: 3,
            max_context_chars: 24_000,
        }
    }
}

/// Retry/backoff settings for external calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts for embedding and generation calls.
    pub max_attempts: u32,
    /// Delay before the first retry (milliseconds).
    pub base_delay_ms: u64,
    /// Upper bound on any single delay (milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl RetrySettings {
    /// Policy for embedding and generation calls.
    pub fn policy(&self) -> crate::retry::RetryPolicy {
        crate::retry::RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    /// Policy for similarity queries: one retry only.
    pub fn query_policy(&self) -> crate::retry::RetryPolicy {
        crate::retry::RetryPolicy::once(Duration::from_millis(self.base_delay_ms))
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let settings = Settings::default();
        assert!(settings.chunking.overlap < settings.chunking.chunk_size);
        assert_eq!(settings.vector_index.metric, "cosine");
        assert_eq!(settings.rag.top_k, 3);
    }

    #[test]
    fn test_round_trip_toml() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.embedding.dimensions, settings.embedding.dimensions);
        assert_eq!(parsed.vector_index.index_name, settings.vector_index.index_name);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            [chunking]
            chunk_size = 400
            "#,
        )
        .unwrap();
        assert_eq!(parsed.chunking.chunk_size, 400);
        assert_eq!(parsed.chunking.overlap, ChunkingSettings::default().overlap);
        assert_eq!(parsed.rag.model, RagSettings::default().model);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "pinecone".parse::<VectorIndexProvider>().unwrap(),
            VectorIndexProvider::Pinecone
        );
        assert!("chroma".parse::<VectorIndexProvider>().is_err());
    }
}
