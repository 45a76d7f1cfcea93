//! Core type definitions for the cache system

use crate::error::CacheError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub(crate) const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
pub(crate) const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Audio payload stored by every tier (each tier owns its own copy)
pub type AudioBytes = Vec<u8>;

/// Outcome of a single tier lookup
///
/// `Unavailable` means the tier could not answer (e.g. the backing file was
/// unreadable). Callers of the manager only ever see hit or miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierLookup {
    Hit(AudioBytes),
    Miss,
    Unavailable,
}

impl TierLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, TierLookup::Hit(_))
    }
}

/// The three cache tiers, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// Curated in-memory tier
    Hot,

    /// Persistent on-disk tier
    Disk,

    /// Bounded in-memory LRU tier
    Memory,
}

impl CacheTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTier::Hot => "hot",
            CacheTier::Disk => "disk",
            CacheTier::Memory => "memory",
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheTier {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(CacheTier::Hot),
            "disk" => Ok(CacheTier::Disk),
            "memory" | "lru" => Ok(CacheTier::Memory),
            _ => Err(CacheError::UnknownTier(s.to_string())),
        }
    }
}

/// Hot tier statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotStats {
    /// Stored clips
    pub entries: usize,

    /// Curated texts, including ones with nothing stored yet
    pub curated_keys: usize,

    /// Total size of stored clips in bytes
    pub size_bytes: u64,
}

impl HotStats {
    pub fn memory_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }
}

impl fmt::Display for HotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries: {}, curated: {}, memory: {:.2} MB",
            self.entries,
            self.curated_keys,
            self.memory_mb()
        )
    }
}

/// Memory LRU tier statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Number of items currently held
    pub items: usize,

    /// Total size of held items in bytes
    pub size_bytes: u64,

    /// Hits since the last clear
    pub hits: u64,

    /// Misses since the last clear
    pub misses: u64,

    /// Items dropped to honour the count or byte limit
    pub evictions: u64,
}

impl MemoryStats {
    pub fn memory_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// hits / (hits + misses), 0.0 before any request
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items: {}, memory: {:.2} MB, hits: {}, misses: {}, hit_rate: {:.2}%",
            self.items,
            self.memory_mb(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

/// Disk tier statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskStats {
    /// Live metadata records
    pub entries: usize,

    /// Sum of recorded file sizes in bytes
    pub size_bytes: u64,

    /// Configured budget in bytes
    pub max_size_bytes: u64,

    /// Lookups that reached this tier since it was opened
    pub reads: u64,
}

impl DiskStats {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    pub fn max_size_gb(&self) -> f64 {
        self.max_size_bytes as f64 / BYTES_PER_GB
    }

    /// Share of the budget in use, 0.0 when the budget is zero
    pub fn usage_percent(&self) -> f64 {
        if self.max_size_bytes == 0 {
            0.0
        } else {
            (self.size_bytes as f64 / self.max_size_bytes as f64) * 100.0
        }
    }
}

impl fmt::Display for DiskStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries: {}, size: {:.2} MB / {:.2} GB ({:.1}%)",
            self.entries,
            self.size_mb(),
            self.max_size_gb(),
            self.usage_percent()
        )
    }
}

/// Totals across all tiers, computed when the report is built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    pub entries: usize,
    pub memory_bytes: u64,
    pub disk_bytes: u64,
}

impl TotalStats {
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / BYTES_PER_MB
    }

    pub fn disk_mb(&self) -> f64 {
        self.disk_bytes as f64 / BYTES_PER_MB
    }
}

/// Aggregated statistics for all three tiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheReport {
    pub hot: HotStats,
    pub disk: DiskStats,
    pub memory: MemoryStats,
    pub total: TotalStats,
}

impl CacheReport {
    pub fn new(hot: HotStats, disk: DiskStats, memory: MemoryStats) -> Self {
        let total = TotalStats {
            entries: hot.entries + disk.entries + memory.items,
            memory_bytes: hot.size_bytes + memory.size_bytes,
            disk_bytes: disk.size_bytes,
        };

        Self {
            hot,
            disk,
            memory,
            total,
        }
    }
}

impl fmt::Display for CacheReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hot cache:    {}", self.hot)?;
        writeln!(f, "Disk cache:   {}", self.disk)?;
        writeln!(f, "Memory cache: {}", self.memory)?;
        write!(
            f,
            "Total:        entries: {}, memory: {:.2} MB, disk: {:.2} MB",
            self.total.entries,
            self.total.memory_mb(),
            self.total.disk_mb()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_stats_hit_rate() {
        let stats = MemoryStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.8);
    }

    #[test]
    fn test_memory_stats_zero_requests() {
        let stats = MemoryStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_disk_usage_percent() {
        let stats = DiskStats {
            entries: 2,
            size_bytes: 512,
            max_size_bytes: 1024,
            reads: 0,
        };
        assert_eq!(stats.usage_percent(), 50.0);

        let unbounded = DiskStats {
            size_bytes: 512,
            max_size_bytes: 0,
            ..Default::default()
        };
        assert_eq!(unbounded.usage_percent(), 0.0);
    }

    #[test]
    fn test_report_totals() {
        let hot = HotStats {
            entries: 1,
            curated_keys: 3,
            size_bytes: 100,
        };
        let disk = DiskStats {
            entries: 4,
            size_bytes: 4000,
            max_size_bytes: 10_000,
            reads: 7,
        };
        let memory = MemoryStats {
            items: 2,
            size_bytes: 300,
            ..Default::default()
        };

        let report = CacheReport::new(hot, disk, memory);
        assert_eq!(report.total.entries, 7);
        assert_eq!(report.total.memory_bytes, 400);
        assert_eq!(report.total.disk_bytes, 4000);

        let display = format!("{}", report);
        assert!(display.contains("Hot cache"));
        assert!(display.contains("entries: 7"));
    }

    #[test]
    fn test_cache_tier_parse() {
        assert_eq!("hot".parse::<CacheTier>().unwrap(), CacheTier::Hot);
        assert_eq!("Disk".parse::<CacheTier>().unwrap(), CacheTier::Disk);
        assert_eq!("memory".parse::<CacheTier>().unwrap(), CacheTier::Memory);
        assert_eq!("lru".parse::<CacheTier>().unwrap(), CacheTier::Memory);
        assert!(matches!(
            "ssd".parse::<CacheTier>(),
            Err(CacheError::UnknownTier(_))
        ));
    }

    #[test]
    fn test_cache_tier_display() {
        assert_eq!(format!("{}", CacheTier::Hot), "hot");
        assert_eq!(format!("{}", CacheTier::Disk), "disk");
        assert_eq!(format!("{}", CacheTier::Memory), "memory");
    }

    #[test]
    fn test_tier_lookup_is_hit() {
        assert!(TierLookup::Hit(vec![1, 2]).is_hit());
        assert!(!TierLookup::Miss.is_hit());
        assert!(!TierLookup::Unavailable.is_hit());
    }
}
