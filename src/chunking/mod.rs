//! Transcript chunking: splitting raw text into overlapping segments
//! suitable for embedding and retrieval.

mod recursive;

pub use recursive::RecursiveSplitter;

use serde::{Deserialize, Serialize};

/// A bounded, overlapping substring of a transcript; the unit of embedding
/// and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Position in the original transcript, used for ordering and for
    /// deterministic vector ids.
    pub sequence_index: usize,
    /// Video this chunk was cut from.
    pub source_video_id: String,
}

impl Chunk {
    pub fn new(text: String, sequence_index: usize, source_video_id: String) -> Self {
        Self {
            text,
            sequence_index,
            source_video_id,
        }
    }

    /// Deterministic vector id, unique within the video's namespace.
    ///
    /// Re-processing the same video produces the same ids, so repeated
    /// upserts overwrite instead of duplicating.
    pub fn vector_id(&self) -> String {
        format!("{}:{}", self.source_video_id, self.sequence_index)
    }
}
