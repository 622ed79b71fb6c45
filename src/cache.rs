//! Process-lifetime cache of videos whose namespaces have been built.
//!
//! Replaces ad-hoc global registries with an explicit object injected at
//! orchestrator construction. A cache hit skips the remote namespace check
//! entirely; a miss falls back to asking the vector backend.

use std::collections::HashSet;
use std::sync::RwLock;

/// Tracks which video ids have completed a build in this process.
#[derive(Debug, Default)]
pub struct BuildCache {
    built: RwLock<HashSet<String>>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a build has completed for this video in this process.
    pub fn exists(&self, video_id: &str) -> bool {
        self.built.read().unwrap().contains(video_id)
    }

    /// Record a completed build.
    pub fn mark_built(&self, video_id: &str) {
        self.built.write().unwrap().insert(video_id.to_string());
    }

    /// Forget a video, forcing the next question to re-check the backend.
    /// Used when a namespace turns out to be degraded or is deleted.
    pub fn invalidate(&self, video_id: &str) {
        self.built.write().unwrap().remove(video_id);
    }

    /// Drop all entries (administrative whole-index deletion).
    pub fn clear(&self) {
        self.built.write().unwrap().clear();
    }
}
