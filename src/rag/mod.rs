//! RAG (Retrieval-Augmented Generation) for answering questions about a
//! video from its transcript.

mod answer;
pub mod context;

pub use answer::{Answer, Generator, OpenAIGenerator};
pub use context::ContextAssembler;
