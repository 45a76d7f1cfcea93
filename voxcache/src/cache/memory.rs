//! Bounded in-memory LRU tier
//!
//! Two limits apply jointly: a maximum item count and a maximum total byte
//! size. Recency is tracked by the LRU list itself, so a hit moves the entry to
//! the most-recently-used end in O(1).

use crate::cache::key::AudioKey;
use crate::cache::tier::AudioTier;
use crate::cache::types::{AudioBytes, CacheTier, MemoryStats, TierLookup};
use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// General-purpose memory tier keyed by [`AudioKey::content_key`]
pub struct MemoryCache {
    max_items: usize,
    max_bytes: u64,
    state: Mutex<MemoryState>,
}

struct MemoryState {
    /// content key -> clip, least recently used first
    entries: LruCache<String, AudioBytes>,

    /// Sum of stored clip sizes
    current_bytes: u64,

    hits: u64,
    misses: u64,
    evictions: u64,
}

impl MemoryCache {
    pub fn new(max_items: usize, max_bytes: u64) -> Self {
        info!(
            "Initializing memory cache (max_items: {}, max_bytes: {})",
            max_items, max_bytes
        );

        Self {
            max_items,
            max_bytes,
            state: Mutex::new(MemoryState {
                entries: LruCache::unbounded(),
                current_bytes: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    /// Get a clip, marking it most recently used on a hit
    pub async fn get(&self, key: &str) -> Option<AudioBytes> {
        let mut state = self.state.lock().await;

        let found = state.entries.get(key).cloned();
        match found {
            Some(audio) => {
                state.hits += 1;
                Some(audio)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store a clip, evicting least recently used entries until it fits.
    ///
    /// A clip larger than the byte budget empties the tier and is not kept.
    pub async fn put(&self, key: &str, audio: &[u8]) -> bool {
        let size = audio.len() as u64;
        let mut state = self.state.lock().await;

        // Replacing a key must not double-count its old size
        if let Some(old) = state.entries.pop(key) {
            state.current_bytes = state.current_bytes.saturating_sub(old.len() as u64);
        }

        while !state.entries.is_empty()
            && (state.entries.len() >= self.max_items
                || state.current_bytes + size > self.max_bytes)
        {
            if let Some((evicted, old)) = state.entries.pop_lru() {
                debug!("Evicting memory entry {}", evicted);
                state.current_bytes = state.current_bytes.saturating_sub(old.len() as u64);
                state.evictions += 1;
            }
        }

        if size > self.max_bytes || self.max_items == 0 {
            warn!(
                "Audio of {} bytes exceeds memory cache limits, not cached",
                size
            );
            return false;
        }

        state.entries.put(key.to_string(), audio.to_vec());
        state.current_bytes += size;
        true
    }

    /// Whether a key is held, without touching recency or counters
    pub async fn contains(&self, key: &str) -> bool {
        let state = self.state.lock().await;
        state.entries.contains(key)
    }

    /// Reset storage, byte counter and hit/miss counters
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let count = state.entries.len();

        state.entries.clear();
        state.current_bytes = 0;
        state.hits = 0;
        state.misses = 0;
        state.evictions = 0;

        info!("Cleared {} entries from memory cache", count);
    }

    pub async fn stats(&self) -> MemoryStats {
        let state = self.state.lock().await;
        MemoryStats {
            items: state.entries.len(),
            size_bytes: state.current_bytes,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl AudioTier for MemoryCache {
    type Stats = MemoryStats;

    fn tier(&self) -> CacheTier {
        CacheTier::Memory
    }

    async fn lookup(&self, key: &AudioKey) -> TierLookup {
        match self.get(&key.content_key()).await {
            Some(audio) => TierLookup::Hit(audio),
            None => TierLookup::Miss,
        }
    }

    async fn store(&self, key: &AudioKey, audio: &[u8]) -> bool {
        self.put(&key.content_key(), audio).await
    }

    async fn clear(&self) {
        MemoryCache::clear(self).await
    }

    async fn stats(&self) -> MemoryStats {
        MemoryCache::stats(self).await
    }
}
