//! Svar - YouTube Video Question Answering
//!
//! Ask natural-language questions about a YouTube video and get answers
//! grounded in its transcript.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Ask questions about any public YouTube video with captions
//! - Build a per-video vector index of transcript chunks, reused across questions
//! - Serve the same pipeline over HTTP for integration with other systems
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript` - Transcript fetching and video ID extraction
//! - `chunking` - Transcript splitting into overlapping chunks
//! - `embedding` - Embedding generation
//! - `index` - Vector index backends and per-video namespace lifecycle
//! - `rag` - Context assembly and answer generation
//! - `orchestrator` - Question-answering pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use svar::config::Settings;
//! use svar::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let answer = orchestrator
//!         .ask("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "What is this video about?")
//!         .await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod orchestrator;
pub mod rag;
pub mod retry;
pub mod transcript;

pub use error::{Result, SvarError};
