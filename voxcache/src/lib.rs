//! # voxcache
//!
//! A three-tier audio cache for text-to-speech clients.
//!
//! Synthesized clips are keyed by `(text, voice, speed, format)` and kept in:
//!
//! - a curated **hot** tier for messages an operator marks as important
//! - a persistent **disk** tier that survives restarts
//! - a bounded in-**memory** LRU tier
//!
//! The cache is byte-opaque; it never inspects or transcodes audio. Storage
//! failures degrade to cache misses instead of errors.
//!
//! ```no_run
//! use voxcache::{AudioKey, CacheConfig, CacheManager};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache = CacheManager::new(CacheConfig::default()).await?;
//!     let key = AudioKey::new("Tests passed", "af_bella", 1.0, "wav");
//!
//!     if cache.get_audio(&key).await.is_none() {
//!         let audio = b"RIFF....WAVE".to_vec(); // from the TTS service
//!         cache.put_audio(&key, &audio).await;
//!     }
//!
//!     println!("{}", cache.comprehensive_stats().await);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;

// Re-export main types for convenience
pub use cache::{
    AudioKey, AudioTier, CacheConfig, CacheConfigBuilder, CacheManager, CacheReport, CacheTier,
    DiskCache, DiskEntry, DiskStats, HotCache, HotStats, MemoryCache, MemoryStats,
    SpeechSynthesizer, TierLookup,
};
pub use error::{CacheError, Result};
