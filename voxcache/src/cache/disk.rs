//! Persistent on-disk tier with JSON metadata and LRU eviction
//!
//! Audio files live in the audio directory. A `metadata.json` file next to
//! that directory maps content keys to [`DiskEntry`] records. All state,
//! including the metadata mirror on disk, is guarded by one lock per instance.
//!
//! Nothing here fails loudly after construction: unreadable files become
//! misses, orphaned records are purged on access, and a missing or corrupt
//! metadata file starts the tier empty.

use crate::cache::entry::DiskEntry;
use crate::cache::key::AudioKey;
use crate::cache::tier::AudioTier;
use crate::cache::types::{AudioBytes, CacheTier, DiskStats, TierLookup};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Name of the metadata side-file, stored in the parent of the audio directory
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Characters of cleaned text kept in audio file names
const FILENAME_TEXT_LENGTH: usize = 30;

/// Characters of the content key kept in audio file names
const FILENAME_HASH_LENGTH: usize = 8;

/// Characters of cleaned voice kept in audio file names
const FILENAME_VOICE_LENGTH: usize = 40;

/// Characters of cleaned format kept as the file extension
const FILENAME_FORMAT_LENGTH: usize = 10;

/// Disk tier keyed by [`AudioKey::content_key`]
pub struct DiskCache {
    audio_dir: PathBuf,
    metadata_path: PathBuf,
    max_size_bytes: u64,
    state: Mutex<HashMap<String, DiskEntry>>,

    /// Lookups that reached this tier
    reads: AtomicU64,
}

impl DiskCache {
    /// Open (or create) a disk tier rooted at `audio_dir`.
    ///
    /// Only failure to create the directory is an error; unreadable metadata
    /// yields an empty cache.
    pub async fn open(audio_dir: impl Into<PathBuf>, max_size_bytes: u64) -> Result<Self> {
        let audio_dir = audio_dir.into();
        fs::create_dir_all(&audio_dir).await?;

        let metadata_path = audio_dir
            .parent()
            .unwrap_or(&audio_dir)
            .join(METADATA_FILE_NAME);
        let entries = load_metadata(&metadata_path).await;

        info!(
            "Opened disk cache at {:?} ({} entries, max {} bytes)",
            audio_dir,
            entries.len(),
            max_size_bytes
        );

        Ok(Self {
            audio_dir,
            metadata_path,
            max_size_bytes,
            state: Mutex::new(entries),
            reads: AtomicU64::new(0),
        })
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Read a clip, refreshing its access time and count.
    ///
    /// A record whose file is gone (or has the wrong length) is purged and
    /// reported as a miss.
    pub async fn get(&self, key: &AudioKey) -> TierLookup {
        let content_key = key.content_key();
        self.reads.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.state.lock().await;

        let (path, size) = match entries.get(&content_key) {
            Some(entry) => (entry.path.clone(), entry.size),
            None => return TierLookup::Miss,
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.len() == size => {}
            Ok(meta) => {
                warn!(
                    "Cache file {:?} is {} bytes, expected {}; dropping record",
                    path,
                    meta.len(),
                    size
                );
                entries.remove(&content_key);
                remove_file_if_exists(&path).await;
                self.persist(&entries).await;
                return TierLookup::Miss;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Cache file {:?} missing; dropping orphaned record", path);
                entries.remove(&content_key);
                self.persist(&entries).await;
                return TierLookup::Miss;
            }
            Err(e) => {
                warn!("Failed to stat cache file {:?}: {}", path, e);
                return TierLookup::Unavailable;
            }
        }

        if let Some(entry) = entries.get_mut(&content_key) {
            entry.mark_accessed();
        }
        self.persist(&entries).await;

        match fs::read(&path).await {
            Ok(audio) => {
                debug!("Disk cache hit: {}", key);
                TierLookup::Hit(audio)
            }
            Err(e) => {
                warn!("Failed to read cache file {:?}: {}", path, e);
                TierLookup::Unavailable
            }
        }
    }

    /// Write a clip to disk, evicting least recently accessed entries first.
    ///
    /// A clip larger than the whole budget is declined up front and nothing
    /// is evicted for it, rather than emptying the tier and writing anyway.
    /// Returns `false` if the clip could not be written or can never fit.
    pub async fn put(&self, key: &AudioKey, audio: &[u8]) -> bool {
        let content_key = key.content_key();
        let size = audio.len() as u64;
        let path = self.audio_dir.join(cache_file_name(key, &content_key));

        if size > self.max_size_bytes {
            warn!(
                "Audio of {} bytes exceeds disk cache budget of {} bytes, not cached",
                size, self.max_size_bytes
            );
            return false;
        }

        let mut entries = self.state.lock().await;

        // The old record's size must not count against the replacement
        if let Some(old) = entries.remove(&content_key) {
            if old.path != path {
                remove_file_if_exists(&old.path).await;
            }
        }

        self.evict_if_needed(&mut entries, size).await;

        if let Err(e) = fs::write(&path, audio).await {
            warn!("Failed to write cache file {:?}: {}", path, e);
            self.persist(&entries).await;
            return false;
        }

        entries.insert(content_key, DiskEntry::new(key, path, size));
        self.persist(&entries).await;

        debug!("Stored {} bytes on disk for {}", size, key);
        true
    }

    /// Delete every referenced file (best effort) and empty the metadata
    pub async fn clear(&self) {
        let mut entries = self.state.lock().await;
        let count = entries.len();

        for entry in entries.values() {
            remove_file_if_exists(&entry.path).await;
        }

        entries.clear();
        self.persist(&entries).await;

        info!("Cleared {} entries from disk cache", count);
    }

    /// Whether a record exists, without touching access time
    pub async fn contains(&self, key: &AudioKey) -> bool {
        let entries = self.state.lock().await;
        entries.contains_key(&key.content_key())
    }

    /// Copy of the metadata record for a request
    pub async fn entry(&self, key: &AudioKey) -> Option<DiskEntry> {
        let entries = self.state.lock().await;
        entries.get(&key.content_key()).cloned()
    }

    pub async fn stats(&self) -> DiskStats {
        let entries = self.state.lock().await;
        DiskStats {
            entries: entries.len(),
            size_bytes: total_size(&entries),
            max_size_bytes: self.max_size_bytes,
            reads: self.reads.load(Ordering::Relaxed),
        }
    }

    /// Internal: evict oldest-by-access entries until `incoming` bytes fit
    async fn evict_if_needed(&self, entries: &mut HashMap<String, DiskEntry>, incoming: u64) {
        let mut total = total_size(entries);
        if total + incoming <= self.max_size_bytes {
            return;
        }

        let mut candidates: Vec<(String, DiskEntry)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        candidates.sort_by(|a, b| a.1.last_access_at.cmp(&b.1.last_access_at));

        for (content_key, entry) in candidates {
            if total + incoming <= self.max_size_bytes {
                break;
            }

            match fs::remove_file(&entry.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to delete cache file {:?}: {}", entry.path, e);
                    continue;
                }
            }

            debug!("Evicting disk entry {:?}", entry.path);
            entries.remove(&content_key);
            total = total.saturating_sub(entry.size);
        }
    }

    /// Internal: write metadata to a temporary sibling, then rename over the
    /// real file so a crash never leaves it half-written
    async fn persist(&self, entries: &HashMap<String, DiskEntry>) {
        let json = match serde_json::to_vec_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize cache metadata: {}", e);
                return;
            }
        };

        let tmp_path = self.metadata_path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp_path, &json).await {
            warn!("Failed to write cache metadata {:?}: {}", tmp_path, e);
            return;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.metadata_path).await {
            warn!("Failed to replace cache metadata {:?}: {}", self.metadata_path, e);
        }
    }
}

#[async_trait]
impl AudioTier for DiskCache {
    type Stats = DiskStats;

    fn tier(&self) -> CacheTier {
        CacheTier::Disk
    }

    async fn lookup(&self, key: &AudioKey) -> TierLookup {
        self.get(key).await
    }

    async fn store(&self, key: &AudioKey, audio: &[u8]) -> bool {
        self.put(key, audio).await
    }

    async fn clear(&self) {
        DiskCache::clear(self).await
    }

    async fn stats(&self) -> DiskStats {
        DiskCache::stats(self).await
    }
}

/// Load the metadata map; missing or corrupt files give an empty map
async fn load_metadata(path: &Path) -> HashMap<String, DiskEntry> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!("Failed to read cache metadata {:?}: {}", path, e);
            return HashMap::new();
        }
    };

    match serde_json::from_slice(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Cache metadata {:?} is corrupt ({}); starting with an empty cache",
                path, e
            );
            HashMap::new()
        }
    }
}

async fn remove_file_if_exists(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete cache file {:?}: {}", path, e),
    }
}

fn total_size(entries: &HashMap<String, DiskEntry>) -> u64 {
    entries.values().map(|entry| entry.size).sum()
}

/// File name for a clip: `{voice}_{hash8}_{text}.{format}`.
///
/// The hash prefix keeps names unique; voice and text are cosmetic. Every
/// part is truncated so the name stays well under filesystem limits.
pub fn cache_file_name(key: &AudioKey, content_key: &str) -> String {
    let hash: String = content_key.chars().take(FILENAME_HASH_LENGTH).collect();
    format!(
        "{}_{}_{}.{}",
        clean_voice_for_filename(&key.voice, FILENAME_VOICE_LENGTH),
        hash,
        clean_filename_text(&key.text, FILENAME_TEXT_LENGTH),
        clean_voice_for_filename(&key.format, FILENAME_FORMAT_LENGTH)
    )
}

/// Keep word characters, spaces and hyphens; collapse runs of spaces and
/// hyphens into a single underscore
pub fn clean_filename_text(text: &str, max_length: usize) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .take(max_length)
        .collect();

    let mut cleaned = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.trim().chars() {
        if c == '-' || c.is_whitespace() {
            if !in_separator {
                cleaned.push('_');
            }
            in_separator = true;
        } else {
            cleaned.push(c);
            in_separator = false;
        }
    }
    cleaned
}

/// Strip voice-blend syntax (`a+b(0.5)`, `provider:voice`) from voice names.
///
/// Only ASCII letters, digits, `_`, `-` and `.` survive; anything else
/// becomes `_`.
pub fn clean_voice_for_filename(voice: &str, max_length: usize) -> String {
    voice
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' => c,
            _ => '_',
        })
        .take(max_length)
        .collect()
}
