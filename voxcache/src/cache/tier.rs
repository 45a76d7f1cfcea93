//! Common calling convention shared by the three cache tiers

use crate::cache::key::AudioKey;
use crate::cache::types::{CacheTier, TierLookup};
use async_trait::async_trait;

/// A single cache tier addressed by request inputs.
///
/// Each tier derives its own storage key from the [`AudioKey`]. None of these
/// operations fail: I/O problems surface as [`TierLookup::Unavailable`] or a
/// store that returns `false`.
#[async_trait]
pub trait AudioTier: Send + Sync {
    /// Statistics snapshot type for this tier
    type Stats: Send;

    /// Which tier this is
    fn tier(&self) -> CacheTier;

    /// Look up stored audio for a request
    async fn lookup(&self, key: &AudioKey) -> TierLookup;

    /// Store audio for a request, returning whether it was retained
    async fn store(&self, key: &AudioKey, audio: &[u8]) -> bool;

    /// Drop everything this tier stores
    async fn clear(&self);

    /// Snapshot of this tier's live state
    async fn stats(&self) -> Self::Stats;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{disk::DiskCache, hot::HotCache, memory::MemoryCache};
    use tempfile::TempDir;

    async fn store_lookup_clear<T: AudioTier>(tier: &T, key: &AudioKey) {
        assert_eq!(tier.lookup(key).await, TierLookup::Miss);
        assert!(tier.store(key, b"clip").await);
        assert_eq!(tier.lookup(key).await, TierLookup::Hit(b"clip".to_vec()));

        tier.clear().await;
        assert_eq!(tier.lookup(key).await, TierLookup::Miss);
    }

    #[tokio::test]
    async fn test_every_tier_follows_the_contract() {
        let tmp = TempDir::new().unwrap();
        let key = AudioKey::new("Tests passed", "af_bella", 1.0, "wav");

        let hot = HotCache::new(["tests passed"]);
        let memory = MemoryCache::new(10, 1024);
        let disk = DiskCache::open(tmp.path().join("cache").join("audio"), 1024)
            .await
            .unwrap();

        assert_eq!(hot.tier(), CacheTier::Hot);
        assert_eq!(memory.tier(), CacheTier::Memory);
        assert_eq!(disk.tier(), CacheTier::Disk);

        store_lookup_clear(&hot, &key).await;
        store_lookup_clear(&memory, &key).await;
        store_lookup_clear(&disk, &key).await;

        assert_eq!(AudioTier::stats(&memory).await.items, 0);
        assert_eq!(AudioTier::stats(&disk).await.entries, 0);
    }

    #[tokio::test]
    async fn test_hot_tier_store_requires_curation() {
        let hot = HotCache::default();
        let key = AudioKey::new("Build failed", "af_bella", 1.0, "wav");

        assert!(!hot.store(&key, b"clip").await);
        assert_eq!(hot.lookup(&key).await, TierLookup::Miss);
    }
}
