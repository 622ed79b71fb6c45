//! Transcript fetching for YouTube videos.
//!
//! Provides a trait-based interface so the orchestrator can be tested with
//! stub transcripts. All failure modes surface as
//! [`crate::SvarError::TranscriptUnavailable`]; there are no sentinel strings.

mod youtube;

pub use youtube::{extract_video_id, validate_video_id, YoutubeTranscriptProvider};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the full transcript text for a video.
    ///
    /// Returns `TranscriptUnavailable` when the video has no captions, is
    /// private, or cannot be reached.
    async fn fetch(&self, video_id: &str) -> Result<String>;
}
