//! Transcript fetching and caching.
//!
//! A `TranscriptSource` produces per-video subtitle segments; the
//! `TranscriptService` wraps a source with an injected TTL cache so repeated
//! requests for the same video within the TTL never hit the network.

mod cache;
mod youtube;

pub use cache::{TranscriptCache, TtlCache};
pub use youtube::YoutubeTranscriptSource;

use crate::error::{LekseError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{debug, instrument};

/// A single subtitle segment, ordered by `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Subtitle text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Join all segment texts into one whitespace-separated string.
pub fn full_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trait for external transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch all subtitle segments for a video.
    ///
    /// Fails with `TranscriptUnavailable` when the provider cannot produce
    /// subtitles (age-restricted, captions disabled, invalid id).
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}

/// Cache-through transcript access.
///
/// Concurrent requests for the same uncached video may both miss and both
/// fetch; writes are idempotent overwrites, so this costs duplicate work
/// but not correctness.
pub struct TranscriptService {
    source: Arc<dyn TranscriptSource>,
    cache: Arc<dyn TranscriptCache>,
}

impl TranscriptService {
    pub fn new(source: Arc<dyn TranscriptSource>, cache: Arc<dyn TranscriptCache>) -> Self {
        Self { source, cache }
    }

    /// Get the transcript for a video, consulting the cache first.
    ///
    /// On a hit within the TTL, returns the shared cached segments without
    /// touching the source. On a miss or expiry, fetches fresh, overwrites
    /// the cache entry, and propagates fetch errors (no retry).
    #[instrument(skip(self))]
    pub async fn get_transcript(&self, video_id: &str) -> Result<Arc<Vec<TranscriptSegment>>> {
        if let Some(cached) = self.cache.get(video_id) {
            debug!("Transcript cache hit for {}", video_id);
            return Ok(cached);
        }

        debug!("Transcript cache miss for {}, fetching", video_id);
        let segments = self.source.fetch(video_id).await?;
        let shared = Arc::new(segments);
        self.cache.set(video_id, shared.clone());
        Ok(shared)
    }
}

// Matches various YouTube URL formats and bare video IDs
fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract a YouTube video ID from a URL or bare 11-character ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Validate a bare video ID, mapping failure to an input error.
pub fn require_video_id(input: &str) -> Result<String> {
    extract_video_id(input)
        .ok_or_else(|| LekseError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::assert_ok;

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranscriptSource for CountingSource {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptSegment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TranscriptSegment::new("useState lets you add state", 135.0, 5.0)])
        }
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_uses_cache() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let service = TranscriptService::new(
            source.clone(),
            Arc::new(TtlCache::new(Duration::from_secs(600))),
        );

        let first = service.get_transcript("dpw9EHDh2bM").await.unwrap();
        let second = service.get_transcript("dpw9EHDh2bM").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        // Same shared allocation, not a copy.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let service = TranscriptService::new(
            source.clone(),
            Arc::new(TtlCache::new(Duration::ZERO)),
        );

        tokio_test::assert_ok!(service.get_transcript("dpw9EHDh2bM").await);
        tokio_test::assert_ok!(service.get_transcript("dpw9EHDh2bM").await);

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        struct FailingSource;

        #[async_trait]
        impl TranscriptSource for FailingSource {
            async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
                Err(LekseError::TranscriptUnavailable(format!(
                    "no captions for {}",
                    video_id
                )))
            }
        }

        let service = TranscriptService::new(
            Arc::new(FailingSource),
            Arc::new(TtlCache::new(Duration::from_secs(600))),
        );

        let err = service.get_transcript("dpw9EHDh2bM").await.unwrap_err();
        assert!(matches!(err, LekseError::TranscriptUnavailable(_)));
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_full_text() {
        let segments = vec![
            TranscriptSegment::new("hello", 0.0, 1.0),
            TranscriptSegment::new("world", 1.0, 1.0),
        ];
        assert_eq!(full_text(&segments), "hello world");
    }
}
