//! # Three-Tier Audio Cache
//!
//! Caches synthesized speech so repeated requests skip the remote service.
//!
//! ## Tiers
//!
//! - **Hot**: curated in-memory table for operator-chosen messages, bounded
//!   only by curation
//! - **Disk**: persistent files plus a JSON metadata side-file, bounded by a
//!   byte budget with least-recently-accessed eviction
//! - **Memory**: bounded LRU with item-count and byte limits and hit/miss
//!   tracking
//!
//! [`CacheManager`] is the single entry point. Lookups check Hot, then Disk,
//! then Memory; a disk hit is promoted into the faster tiers.
//!
//! ## Example
//!
//! ```no_run
//! use voxcache::cache::{AudioKey, CacheConfig, CacheManager};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = CacheConfig::builder()
//!     .max_items(100)
//!     .max_memory_mb(100.0)
//!     .max_disk_gb(1.0)
//!     .hot_key("Build completed successfully")
//!     .build();
//!
//! let cache = CacheManager::new(config).await?;
//! let key = AudioKey::new("Build completed successfully", "af_bella", 1.0, "wav");
//!
//! cache.put_audio(&key, b"RIFF....WAVE").await;
//!
//! if let Some(audio) = cache.get_audio(&key).await {
//!     println!("Cache hit: {} bytes", audio.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod disk;
pub mod entry;
pub mod hot;
pub mod key;
pub mod manager;
pub mod memory;
pub mod synth;
pub mod tier;
pub mod types;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use disk::DiskCache;
pub use entry::DiskEntry;
pub use hot::HotCache;
pub use key::{build_content_key, build_hot_key, AudioKey};
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use synth::SpeechSynthesizer;
pub use tier::AudioTier;
pub use types::{
    AudioBytes, CacheReport, CacheTier, DiskStats, HotStats, MemoryStats, TierLookup, TotalStats,
};
