//! Curated in-memory tier for operator-chosen messages
//!
//! Only texts in the curated set may be stored. There is no size or count
//! policy; entries live until their text is un-curated, the tier is cleared,
//! or the process exits.

use crate::cache::key::AudioKey;
use crate::cache::tier::AudioTier;
use crate::cache::types::{AudioBytes, CacheTier, HotStats, TierLookup};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Hot tier keyed by [`AudioKey::hot_key`]
pub struct HotCache {
    state: RwLock<HotState>,
}

struct HotState {
    /// Lowercased texts allowed into the tier
    curated: HashSet<String>,

    /// hot key -> stored clip
    entries: HashMap<String, HotEntry>,
}

struct HotEntry {
    /// Lowercased text the clip was stored for
    text: String,
    audio: AudioBytes,
}

impl HotCache {
    /// Create a hot tier with an initial curated set (lowercased on insert)
    pub fn new<I, S>(curated: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let curated: HashSet<String> = curated
            .into_iter()
            .map(|text| text.as_ref().to_lowercase())
            .collect();

        debug!("Initializing hot cache with {} curated keys", curated.len());

        Self {
            state: RwLock::new(HotState {
                curated,
                entries: HashMap::new(),
            }),
        }
    }

    /// Whether the text (case-insensitive) is curated
    pub async fn is_curated(&self, text: &str) -> bool {
        let state = self.state.read().await;
        state.curated.contains(&text.to_lowercase())
    }

    /// Fetch a clip by hot key
    pub async fn get(&self, hot_key: &str) -> Option<AudioBytes> {
        let state = self.state.read().await;
        state.entries.get(hot_key).map(|entry| entry.audio.clone())
    }

    /// Store a clip if the request's text is curated.
    ///
    /// Non-curated texts are ignored and `false` is returned.
    pub async fn put(&self, key: &AudioKey, audio: &[u8]) -> bool {
        let text = key.curated_text();
        let mut state = self.state.write().await;

        if !state.curated.contains(&text) {
            return false;
        }

        state.entries.insert(
            key.hot_key(),
            HotEntry {
                text,
                audio: audio.to_vec(),
            },
        );
        true
    }

    /// Drop all stored clips; the curated set is kept
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let count = state.entries.len();
        state.entries.clear();
        info!("Cleared {} entries from hot cache", count);
    }

    /// Mark a text as curated
    pub async fn add_hot_key(&self, text: &str) {
        let mut state = self.state.write().await;
        state.curated.insert(text.to_lowercase());
    }

    /// Un-curate a text and purge every variant stored for it.
    ///
    /// Returns the number of purged clips.
    pub async fn remove_hot_key(&self, text: &str) -> usize {
        let text = text.to_lowercase();
        let mut state = self.state.write().await;

        state.curated.remove(&text);
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.text != text);
        let purged = before - state.entries.len();

        if purged > 0 {
            debug!("Purged {} hot entries for {:?}", purged, text);
        }
        purged
    }

    /// Curated texts, sorted
    pub async fn hot_keys(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut keys: Vec<String> = state.curated.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn stats(&self) -> HotStats {
        let state = self.state.read().await;
        HotStats {
            entries: state.entries.len(),
            curated_keys: state.curated.len(),
            size_bytes: state
                .entries
                .values()
                .map(|entry| entry.audio.len() as u64)
                .sum(),
        }
    }
}

impl Default for HotCache {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

#[async_trait]
impl AudioTier for HotCache {
    type Stats = HotStats;

    fn tier(&self) -> CacheTier {
        CacheTier::Hot
    }

    async fn lookup(&self, key: &AudioKey) -> TierLookup {
        match self.get(&key.hot_key()).await {
            Some(audio) => TierLookup::Hit(audio),
            None => TierLookup::Miss,
        }
    }

    async fn store(&self, key: &AudioKey, audio: &[u8]) -> bool {
        self.put(key, audio).await
    }

    async fn clear(&self) {
        HotCache::clear(self).await
    }

    async fn stats(&self) -> HotStats {
        HotCache::stats(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str, voice: &str, format: &str) -> AudioKey {
        AudioKey::new(text, voice, 1.0, format)
    }

    #[tokio::test]
    async fn test_put_ignored_for_uncurated_text() {
        let cache = HotCache::new(["tests passed"]);
        let k = key("Build failed", "af_bella", "wav");

        assert!(!cache.put(&k, b"audio").await);
        assert_eq!(cache.get(&k.hot_key()).await, None);
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_put_and_get_curated_case_insensitive() {
        let cache = HotCache::new(["Tests Passed"]);
        let k = key("TESTS passed", "af_bella", "wav");

        assert!(cache.is_curated("tests passed").await);
        assert!(cache.put(&k, b"audio").await);
        assert_eq!(cache.get(&k.hot_key()).await, Some(b"audio".to_vec()));
    }

    #[tokio::test]
    async fn test_add_hot_key_enables_storage() {
        let cache = HotCache::default();
        let k = key("Deploy finished", "am_adam", "mp3");

        assert!(!cache.put(&k, b"first").await);

        cache.add_hot_key("Deploy Finished").await;
        assert!(cache.put(&k, b"second").await);
        assert_eq!(cache.lookup(&k).await, TierLookup::Hit(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_remove_hot_key_purges_all_variants() {
        let cache = HotCache::new(["tests passed", "build failed"]);
        cache.put(&key("Tests passed", "af_bella", "wav"), b"a").await;
        cache.put(&key("tests passed", "am_adam", "mp3"), b"b").await;
        cache.put(&key("Build failed", "af_bella", "wav"), b"c").await;

        let purged = cache.remove_hot_key("TESTS PASSED").await;
        assert_eq!(purged, 2);
        assert!(!cache.is_curated("tests passed").await);

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.curated_keys, 1);

        // No longer curated, so writes are ignored again
        assert!(!cache.put(&key("tests passed", "af_bella", "wav"), b"a").await);
    }

    #[tokio::test]
    async fn test_clear_keeps_curated_set() {
        let cache = HotCache::new(["tests passed"]);
        let k = key("tests passed", "af_bella", "wav");
        cache.put(&k, b"audio").await;

        cache.clear().await;

        assert_eq!(cache.get(&k.hot_key()).await, None);
        assert!(cache.is_curated("tests passed").await);
        assert!(cache.put(&k, b"audio").await);
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = HotCache::new(["one", "two", "three"]);
        cache.put(&key("one", "af_bella", "wav"), &[0u8; 1024]).await;
        cache.put(&key("two", "af_bella", "wav"), &[0u8; 2048]).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.curated_keys, 3);
        assert_eq!(stats.size_bytes, 3072);
        assert_eq!(
            cache.hot_keys().await,
            vec!["one".to_string(), "three".to_string(), "two".to_string()]
        );
    }
}
