//! Embedding of transcript chunks and questions.
//!
//! A namespace build embeds every chunk of a video in one batched call;
//! answering embeds the question alone. Batch results must line up with
//! their inputs because the caller zips them with the chunks for upsert.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding backends.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single question for similarity search.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed chunk texts for a namespace build.
    ///
    /// Returns exactly one vector per input, in input order, so the result
    /// can be paired with the chunks positionally.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Vector width; must match the index dimension.
    fn dimensions(&self) -> usize;
}
