//! Question-answering pipeline for Svar.
//!
//! Coordinates the whole request: ensure the video's namespace exists
//! (building it on first contact), retrieve relevant chunks, assemble
//! context, and generate the answer.
//!
//! A request moves through ensure-namespace, build-if-missing, retrieve,
//! assemble, generate; any step can fail the request with its own error
//! kind. Two concurrent first questions about the same unseen video may
//! both build its namespace; vector ids are deterministic, so the second
//! build overwrites the first instead of duplicating vectors. That race is
//! accepted rather than locked away.

use crate::cache::BuildCache;
use crate::chunking::RecursiveSplitter;
use crate::config::{Settings, VectorIndexProvider};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SvarError};
use crate::index::{IndexManager, IndexStats, MemoryVectorIndex, PineconeIndex, VectorIndex};
use crate::rag::{Answer, ContextAssembler, Generator, OpenAIGenerator};
use crate::retry::{with_backoff, RetryPolicy};
use crate::transcript::{extract_video_id, TranscriptProvider, YoutubeTranscriptProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// The main orchestrator for the Svar pipeline.
pub struct Orchestrator {
    settings: Settings,
    transcripts: Arc<dyn TranscriptProvider>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    index: IndexManager,
    cache: BuildCache,
    splitter: RecursiveSplitter,
    call_policy: RetryPolicy,
    query_policy: RetryPolicy,
}

impl Orchestrator {
    /// Create a new orchestrator with components built from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let transcripts: Arc<dyn TranscriptProvider> = Arc::new(YoutubeTranscriptProvider::new(
            &settings.transcript.language,
            Duration::from_secs(settings.transcript.timeout_seconds),
        ));

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let generator: Arc<dyn Generator> = Arc::new(
            OpenAIGenerator::new(&settings.rag.model, settings.rag.temperature)
                .with_prompts(settings.prompts.clone()),
        );

        let backend: Arc<dyn VectorIndex> = match settings.vector_index.provider {
            VectorIndexProvider::Memory => Arc::new(MemoryVectorIndex::new()),
            VectorIndexProvider::Pinecone => {
                Arc::new(PineconeIndex::from_settings(&settings.vector_index)?)
            }
        };

        Self::with_components(settings, transcripts, embedder, generator, backend)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        transcripts: Arc<dyn TranscriptProvider>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        backend: Arc<dyn VectorIndex>,
    ) -> Result<Self> {
        let splitter =
            RecursiveSplitter::new(settings.chunking.chunk_size, settings.chunking.overlap)?;

        let index = IndexManager::new(
            backend,
            settings.embedding.dimensions as usize,
            &settings.vector_index.metric,
        );

        let call_policy = settings.retry.policy();
        let query_policy = settings.retry.query_policy();

        Ok(Self {
            settings,
            transcripts,
            embedder,
            generator,
            index,
            cache: BuildCache::new(),
            splitter,
            call_policy,
            query_policy,
        })
    }

    /// Get the index manager.
    pub fn index(&self) -> &IndexManager {
        &self.index
    }

    /// Create the backing index if absent. Idempotent.
    pub async fn ensure_index(&self) -> Result<()> {
        self.index.ensure_index().await
    }

    /// Answer a question about a video.
    #[instrument(skip(self, question), fields(video_url = %video_url))]
    pub async fn ask(&self, video_url: &str, question: &str) -> Result<Answer> {
        let started = Instant::now();

        let video_id = extract_video_id(video_url).ok_or_else(|| {
            SvarError::InvalidInput(format!("Not a YouTube URL or video id: {}", video_url))
        })?;

        // ENSURE_NAMESPACE / BUILD_IF_MISSING. The transcript fetched for a
        // build is kept in hand for context assembly below.
        let mut transcript: Option<String> = None;
        let known = self.cache.exists(&video_id) || self.index.namespace_exists(&video_id).await;
        if known {
            info!("Namespace {} already built, skipping rebuild", video_id);
        } else {
            let text = self.transcripts.fetch(&video_id).await?;
            self.build_namespace(&video_id, &text).await?;
            transcript = Some(text);
        }
        self.cache.mark_built(&video_id);

        // RETRIEVE
        let question_embedding = with_backoff(&self.call_policy, "question embedding", || {
            self.embedder.embed(question)
        })
        .await?;

        let top_k = self.settings.rag.top_k;
        let mut matches = with_backoff(&self.query_policy, "vector query", || {
            self.index.query(&video_id, &question_embedding, top_k)
        })
        .await?;

        // A namespace that existed but yields nothing was left degraded by
        // an earlier partial upsert. Rebuild it whole, once, and query
        // again. Detection happens here at query time, not at write time.
        if matches.is_empty() && transcript.is_none() {
            match self.transcripts.fetch(&video_id).await {
                Ok(text) => {
                    warn!("Namespace {} returned no matches, rebuilding", video_id);
                    if let Err(e) = self.index.delete_namespace(&video_id).await {
                        warn!("Could not clear degraded namespace {}: {}", video_id, e);
                    }
                    self.build_namespace(&video_id, &text).await?;
                    matches = with_backoff(&self.query_policy, "vector query", || {
                        self.index.query(&video_id, &question_embedding, top_k)
                    })
                    .await?;
                    transcript = Some(text);
                }
                Err(e) => {
                    // No captions to rebuild from; the assembler falls back.
                    warn!("Cannot rebuild namespace {}: {}", video_id, e);
                }
            }
        }

        // The full transcript is part of every context; fetch it when this
        // request did not already do so for a build. Failure here is not
        // fatal, retrieval excerpts (or the fallback) still apply.
        let transcript = match transcript {
            Some(text) => Some(text),
            None => self.transcripts.fetch(&video_id).await.ok(),
        };

        // ASSEMBLE
        let assembler = ContextAssembler::new(self.settings.rag.max_context_chars);
        let context = assembler.assemble(&matches, transcript.as_deref());

        // GENERATE
        let answer = with_backoff(&self.call_policy, "answer generation", || {
            self.generator.generate(&context, question)
        })
        .await
        .map_err(|e| match e {
            generation @ SvarError::Generation(_) => generation,
            other => SvarError::Generation(format!("Could not generate an answer: {}", other)),
        })?;

        let processing_time = started.elapsed().as_secs_f64();
        info!(
            "Answered question about {} in {:.2}s",
            video_id, processing_time
        );

        Ok(Answer {
            answer,
            video_id,
            processing_time,
        })
    }

    /// Chunk, embed, and upsert a transcript into the video's namespace.
    ///
    /// A partial upsert is logged and accepted; the degraded namespace is
    /// caught at the next query that returns nothing.
    async fn build_namespace(&self, video_id: &str, transcript: &str) -> Result<usize> {
        let chunks = self.splitter.split_video(transcript, video_id);
        if chunks.is_empty() {
            info!("Transcript for {} produced no chunks", video_id);
            return Ok(0);
        }

        info!("Building namespace {} with {} chunks", video_id, chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = with_backoff(&self.call_policy, "chunk embedding", || {
            self.embedder.embed_batch(&texts)
        })
        .await?;

        match self.index.upsert_chunks(video_id, &chunks, &embeddings).await {
            Ok(written) => Ok(written),
            Err(SvarError::PartialUpsert { written, attempted }) => {
                warn!(
                    "Partial upsert for {}: {} of {} vectors written",
                    video_id, written, attempted
                );
                Ok(written)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a single video's vectors. Administrative path.
    pub async fn delete_video(&self, video_id: &str) -> Result<usize> {
        self.cache.invalidate(video_id);
        self.index.delete_namespace(video_id).await
    }

    /// Remove every video's vectors. Administrative path.
    pub async fn delete_index(&self) -> Result<()> {
        self.cache.clear();
        self.index.delete_all().await
    }

    /// Index statistics for introspection endpoints.
    pub async fn stats(&self) -> Result<IndexStats> {
        self.index.stats().await
    }
}
