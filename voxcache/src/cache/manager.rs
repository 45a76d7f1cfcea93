//! Orchestration of the hot, disk and memory tiers behind one API
//!
//! Lookups go Hot -> Disk -> Memory. A disk hit is promoted into the hot tier
//! (when curated) and the memory tier. Stores always write disk and memory,
//! and the hot tier only for curated texts.
//!
//! There is no manager-level lock: each tier call takes that tier's own lock.
//! A `clear_cache` racing with a disk-hit promotion can therefore see the
//! promoted copy reappear right after the clear.

use crate::cache::{
    config::CacheConfig,
    disk::DiskCache,
    hot::HotCache,
    key::AudioKey,
    memory::MemoryCache,
    synth::SpeechSynthesizer,
    tier::AudioTier,
    types::{AudioBytes, CacheReport, CacheTier, TierLookup},
};
use crate::error::Result;
use std::time::Instant;
use tracing::{debug, info};

/// Voices probed when backfilling a newly curated text, after the caller's hint
pub const FALLBACK_VOICES: [&str; 3] = ["af_bella", "af_nicole", "am_adam"];

/// Formats probed when backfilling a newly curated text
pub const FALLBACK_FORMATS: [&str; 2] = ["wav", "mp3"];

/// Speed probed when backfilling a newly curated text
pub const FALLBACK_SPEED: f64 = 1.0;

/// Single entry point to the three cache tiers
pub struct CacheManager {
    hot: HotCache,
    disk: DiskCache,
    memory: MemoryCache,
}

impl CacheManager {
    /// Build all three tiers from a validated configuration
    pub async fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let disk = DiskCache::open(&config.cache_dir, config.max_disk_bytes).await?;
        let memory = MemoryCache::new(config.max_items, config.max_memory_bytes);
        let hot = HotCache::new(&config.hot_keys);

        info!("Cache manager ready ({:?})", config.cache_dir);
        Ok(Self::from_tiers(hot, disk, memory))
    }

    /// Assemble a manager from already constructed tiers
    pub fn from_tiers(hot: HotCache, disk: DiskCache, memory: MemoryCache) -> Self {
        Self { hot, disk, memory }
    }

    pub fn hot(&self) -> &HotCache {
        &self.hot
    }

    pub fn disk(&self) -> &DiskCache {
        &self.disk
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    /// Look up audio across the tiers
    pub async fn get_audio(&self, key: &AudioKey) -> Option<AudioBytes> {
        let start = Instant::now();
        let curated = self.hot.is_curated(&key.text).await;

        if curated {
            if let TierLookup::Hit(audio) = self.hot.lookup(key).await {
                debug!(
                    "Hot cache hit for {} in {:.1}ms",
                    key,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                return Some(audio);
            }
        }

        match self.disk.lookup(key).await {
            TierLookup::Hit(audio) => {
                debug!(
                    "Disk cache hit for {} in {:.1}ms",
                    key,
                    start.elapsed().as_secs_f64() * 1000.0
                );

                if curated {
                    self.hot.store(key, &audio).await;
                }
                self.memory.store(key, &audio).await;
                return Some(audio);
            }
            TierLookup::Unavailable => debug!("Disk cache unavailable for {}", key),
            TierLookup::Miss => {}
        }

        match self.memory.lookup(key).await {
            TierLookup::Hit(audio) => {
                debug!(
                    "Memory cache hit for {} in {:.1}ms",
                    key,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                Some(audio)
            }
            TierLookup::Miss | TierLookup::Unavailable => None,
        }
    }

    /// Store audio: disk and memory always, hot only for curated texts
    pub async fn put_audio(&self, key: &AudioKey, audio: &[u8]) {
        if !self.disk.store(key, audio).await {
            debug!("Disk cache skipped {}", key);
        }
        self.memory.store(key, audio).await;
        self.hot.store(key, audio).await;
    }

    /// Return cached audio, or synthesize, store and return it
    pub async fn get_or_generate<S>(&self, key: &AudioKey, synthesizer: &S) -> Result<AudioBytes>
    where
        S: SpeechSynthesizer + ?Sized,
    {
        if let Some(audio) = self.get_audio(key).await {
            return Ok(audio);
        }

        debug!("Cache miss for {}, synthesizing", key);
        let audio = synthesizer.synthesize(key).await?;
        self.put_audio(key, &audio).await;
        Ok(audio)
    }

    /// Clear one tier, or all of them when `tier` is `None`
    pub async fn clear_cache(&self, tier: Option<CacheTier>) {
        match tier {
            Some(CacheTier::Hot) => clear_tier(&self.hot).await,
            Some(CacheTier::Disk) => clear_tier(&self.disk).await,
            Some(CacheTier::Memory) => clear_tier(&self.memory).await,
            None => {
                clear_tier(&self.hot).await;
                clear_tier(&self.disk).await;
                clear_tier(&self.memory).await;
            }
        }
    }

    /// Clear by tier name (`hot`, `disk`, `memory` or `all`).
    ///
    /// Unknown names are rejected with [`CacheError::UnknownTier`](crate::error::CacheError::UnknownTier).
    pub async fn clear_cache_named(&self, tier: &str) -> Result<()> {
        let tier = if tier.trim().eq_ignore_ascii_case("all") {
            None
        } else {
            Some(tier.parse::<CacheTier>()?)
        };

        self.clear_cache(tier).await;
        Ok(())
    }

    /// Statistics for every tier plus totals, computed now
    pub async fn comprehensive_stats(&self) -> CacheReport {
        CacheReport::new(
            AudioTier::stats(&self.hot).await,
            AudioTier::stats(&self.disk).await,
            AudioTier::stats(&self.memory).await,
        )
    }

    /// Curate a text and try to backfill the hot tier from disk.
    ///
    /// Probes the hinted voice and the fallback voices in each fallback
    /// format; returns whether any clip was found. Curation always sticks.
    pub async fn promote_to_hot_cache(&self, text: &str, voice_hint: &str) -> bool {
        self.hot.add_hot_key(text).await;

        let mut voices = vec![voice_hint];
        voices.extend(FALLBACK_VOICES.iter().filter(|v| **v != voice_hint));

        for voice in voices {
            for format in FALLBACK_FORMATS {
                let key = AudioKey::new(text, voice, FALLBACK_SPEED, format);
                if let TierLookup::Hit(audio) = self.disk.lookup(&key).await {
                    self.hot.store(&key, &audio).await;
                    info!("Promoted {} to hot cache", key);
                    return true;
                }
            }
        }

        debug!("Curated {:?} without a disk copy to backfill", text);
        false
    }
}

async fn clear_tier<T: AudioTier>(tier: &T) {
    tier.clear().await;
    debug!("Cleared {} tier", tier.tier());
}
