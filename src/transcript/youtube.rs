//! YouTube transcript provider using the timedtext caption endpoint.

use super::TranscriptProvider;
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use url::Url;

/// Validate an 11-character YouTube video id.
pub fn validate_video_id(video_id: &str) -> bool {
    video_id.len() == 11
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract a video id from a YouTube URL or bare id.
///
/// Accepts `youtube.com/watch?v=`, `youtu.be/`, `youtube.com/embed/` URLs
/// and bare 11-character ids.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if validate_video_id(input) {
        return Some(input.to_string());
    }

    // watch URLs carry the id in the query string
    if let Ok(url) = Url::parse(input) {
        if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
            if validate_video_id(&v) {
                return Some(v.to_string());
            }
        }
    }

    // short and embed URL paths
    let path_re = Regex::new(r"(?:youtu\.be/|youtube\.com/embed/|youtube\.com/v/)([a-zA-Z0-9_-]{11})")
        .expect("Invalid regex");
    path_re
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcript provider backed by YouTube's timedtext caption API.
pub struct YoutubeTranscriptProvider {
    client: reqwest::Client,
    language: String,
}

impl YoutubeTranscriptProvider {
    pub fn new(language: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            language: language.to_string(),
        }
    }

    /// Strip caption markup down to plain text: one space-joined string
    /// with XML entities decoded.
    fn parse_timedtext(body: &str) -> String {
        let text_re = Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("Invalid regex");
        let parts: Vec<String> = text_re
            .captures_iter(body)
            .map(|caps| decode_entities(caps[1].trim()))
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }
}

impl Default for YoutubeTranscriptProvider {
    fn default() -> Self {
        Self::new("en", Duration::from_secs(30))
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    async fn fetch(&self, video_id: &str) -> Result<String> {
        if !validate_video_id(video_id) {
            return Err(SvarError::InvalidInput(format!(
                "Invalid YouTube video id: {}",
                video_id
            )));
        }

        let url = format!(
            "https://www.youtube.com/api/timedtext?lang={}&v={}",
            self.language, video_id
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            SvarError::TranscriptUnavailable(format!(
                "Failed to reach caption service for video {}: {}",
                video_id, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(SvarError::TranscriptUnavailable(format!(
                "Caption service returned {} for video {}",
                response.status(),
                video_id
            )));
        }

        let body = response.text().await.map_err(|e| {
            SvarError::TranscriptUnavailable(format!(
                "Failed to read caption response for video {}: {}",
                video_id, e
            ))
        })?;

        let transcript = Self::parse_timedtext(&body);
        if transcript.trim().is_empty() {
            return Err(SvarError::TranscriptUnavailable(format!(
                "No captions found for video {}. The video may be private or have captions disabled.",
                video_id
            )));
        }

        Ok(transcript)
    }
}

/// Decode the entities YouTube emits in caption text.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_from_short_and_embed_urls() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_bare_id() {
        assert_eq!(
            extract_video_id("abc123XYZ0_"),
            Some("abc123XYZ0_".to_string())
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=short"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_validate_video_id() {
        assert!(validate_video_id("dQw4w9WgXcQ"));
        assert!(validate_video_id("abc123XYZ-_"));
        assert!(!validate_video_id("tooshort"));
        assert!(!validate_video_id("exactly12chr"));
        assert!(!validate_video_id("bad chars!!"));
    }

    #[test]
    fn test_parse_timedtext() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
  <text start="0.0" dur="2.5">Hello world.</text>
  <text start="2.5" dur="3.0">This is a test &amp; it&#39;s fine.</text>
</transcript>"#;
        let parsed = YoutubeTranscriptProvider::parse_timedtext(body);
        assert_eq!(parsed, "Hello world. This is a test & it's fine.");
    }

    #[test]
    fn test_parse_timedtext_empty_body() {
        assert_eq!(YoutubeTranscriptProvider::parse_timedtext(""), "");
    }
}
