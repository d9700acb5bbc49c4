//! In-process transcript cache with a time-to-live.

use super::TranscriptSegment;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Trait for transcript caches keyed by video ID.
pub trait TranscriptCache: Send + Sync {
    /// Get the cached segments for a video, or None if absent or expired.
    fn get(&self, video_id: &str) -> Option<Arc<Vec<TranscriptSegment>>>;

    /// Store segments for a video, replacing any existing entry.
    fn set(&self, video_id: &str, segments: Arc<Vec<TranscriptSegment>>);
}

struct CacheEntry {
    data: Arc<Vec<TranscriptSegment>>,
    expiry: Instant,
}

/// In-memory TTL cache.
///
/// Expiry is checked lazily on read; there is no background eviction and no
/// size bound, so the map grows with the number of distinct video IDs seen
/// over the process lifetime.
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TranscriptCache for TtlCache {
    fn get(&self, video_id: &str) -> Option<Arc<Vec<TranscriptSegment>>> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(video_id)?;
        if entry.expiry > Instant::now() {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    fn set(&self, video_id: &str, segments: Arc<Vec<TranscriptSegment>>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            video_id.to_string(),
            CacheEntry {
                data: segments,
                expiry: Instant::now() + self.ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Arc<Vec<TranscriptSegment>> {
        Arc::new(vec![TranscriptSegment::new("hello", 0.0, 2.0)])
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(600));
        cache.set("abc123def45", segments());
        assert!(cache.get("abc123def45").is_some());
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.set("abc123def45", segments());
        assert!(cache.get("abc123def45").is_none());
        // The stale entry is replaced on the next set, not evicted on read.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = TtlCache::new(Duration::from_secs(600));
        cache.set("abc123def45", segments());
        let fresh = Arc::new(vec![TranscriptSegment::new("replaced", 1.0, 2.0)]);
        cache.set("abc123def45", fresh.clone());
        let got = cache.get("abc123def45").unwrap();
        assert_eq!(got[0].text, "replaced");
        assert_eq!(cache.len(), 1);
    }
}
