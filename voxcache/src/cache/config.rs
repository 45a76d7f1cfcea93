//! Configuration for the cache system

use crate::cache::types::{BYTES_PER_GB, BYTES_PER_MB};
use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default item limit of the memory tier
pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Default byte budget of the memory tier (100 MB)
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 100 * 1024 * 1024;

/// Default byte budget of the disk tier (1 GB)
pub const DEFAULT_MAX_DISK_BYTES: u64 = 1024 * 1024 * 1024;

/// Configuration for the three-tier cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding audio files; metadata is written to its parent
    pub cache_dir: PathBuf,

    /// Maximum number of items in the memory tier
    pub max_items: usize,

    /// Maximum total size of the memory tier in bytes
    pub max_memory_bytes: u64,

    /// Maximum total size of the disk tier in bytes
    pub max_disk_bytes: u64,

    /// Initial curated texts for the hot tier
    pub hot_keys: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_items: DEFAULT_MAX_ITEMS,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
            max_disk_bytes: DEFAULT_MAX_DISK_BYTES,
            hot_keys: Vec::new(),
        }
    }
}

/// `~/.voxcache/cache/audio`, or a relative path when there is no home directory
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".voxcache")
        .join("cache")
        .join("audio")
}

impl CacheConfig {
    /// Create a new builder for cache configuration
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_items == 0 {
            return Err(CacheError::ConfigError(
                "max_items must be greater than 0".to_string(),
            ));
        }

        if self.max_memory_bytes == 0 {
            return Err(CacheError::ConfigError(
                "max_memory_bytes must be greater than 0".to_string(),
            ));
        }

        if self.max_disk_bytes == 0 {
            return Err(CacheError::ConfigError(
                "max_disk_bytes must be greater than 0".to_string(),
            ));
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(CacheError::ConfigError(
                "cache_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Configuration for memory-constrained environments
    pub fn small() -> Self {
        Self {
            max_items: 25,
            max_memory_bytes: 10 * 1024 * 1024,
            max_disk_bytes: 100 * 1024 * 1024,
            ..Default::default()
        }
    }
}

/// Builder for cache configuration
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    cache_dir: Option<PathBuf>,
    max_items: Option<usize>,
    max_memory_bytes: Option<u64>,
    max_disk_bytes: Option<u64>,
    hot_keys: Vec<String>,
}

impl CacheConfigBuilder {
    /// Set the audio directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set maximum number of memory tier items
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Set memory tier budget in bytes
    pub fn max_memory_bytes(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Set memory tier budget in megabytes
    pub fn max_memory_mb(self, mb: f64) -> Self {
        self.max_memory_bytes((mb * BYTES_PER_MB) as u64)
    }

    /// Set disk tier budget in bytes
    pub fn max_disk_bytes(mut self, bytes: u64) -> Self {
        self.max_disk_bytes = Some(bytes);
        self
    }

    /// Set disk tier budget in gigabytes
    pub fn max_disk_gb(self, gb: f64) -> Self {
        self.max_disk_bytes((gb * BYTES_PER_GB) as u64)
    }

    /// Add a curated hot-tier text
    pub fn hot_key(mut self, text: impl Into<String>) -> Self {
        self.hot_keys.push(text.into());
        self
    }

    /// Add several curated hot-tier texts
    pub fn hot_keys<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hot_keys.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Build the cache configuration
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        CacheConfig {
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
            max_items: self.max_items.unwrap_or(defaults.max_items),
            max_memory_bytes: self.max_memory_bytes.unwrap_or(defaults.max_memory_bytes),
            max_disk_bytes: self.max_disk_bytes.unwrap_or(defaults.max_disk_bytes),
            hot_keys: self.hot_keys,
        }
    }
}
