//! Disk tier metadata records

use crate::cache::key::AudioKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Characters of request text kept in each record for debugging
pub const TEXT_PREVIEW_LENGTH: usize = 100;

/// Metadata for one clip stored on disk.
///
/// The audio lives in a separate file at `path`; a record whose file is
/// missing or has a different length is orphaned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskEntry {
    /// Location of the audio file
    pub path: PathBuf,

    /// Size of the audio file in bytes
    pub size: u64,

    /// When the clip was stored
    pub created_at: DateTime<Utc>,

    /// Last successful read (drives LRU eviction)
    pub last_access_at: DateTime<Utc>,

    /// Number of stores plus successful reads
    pub access_count: u64,

    /// Leading characters of the request text
    pub text_preview: String,

    pub voice: String,
    pub format: String,
}

impl DiskEntry {
    /// Create a fresh record for a clip just written to `path`
    pub fn new(key: &AudioKey, path: PathBuf, size: u64) -> Self {
        let now = Utc::now();

        Self {
            path,
            size,
            created_at: now,
            last_access_at: now,
            access_count: 1,
            text_preview: key.text.chars().take(TEXT_PREVIEW_LENGTH).collect(),
            voice: key.voice.clone(),
            format: key.format.clone(),
        }
    }

    /// Mark the entry as read (updates access time and count)
    pub fn mark_accessed(&mut self) {
        self.last_access_at = Utc::now();
        self.access_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let key = AudioKey::new("Build completed successfully", "af_bella", 1.0, "wav");
        let entry = DiskEntry::new(&key, PathBuf::from("/tmp/a.wav"), 2048);

        assert_eq!(entry.size, 2048);
        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.created_at, entry.last_access_at);
        assert_eq!(entry.text_preview, "Build completed successfully");
        assert_eq!(entry.voice, "af_bella");
        assert_eq!(entry.format, "wav");
    }

    #[test]
    fn test_text_preview_truncated_on_char_boundary() {
        let text = "é".repeat(TEXT_PREVIEW_LENGTH + 20);
        let key = AudioKey::new(text, "af_bella", 1.0, "wav");
        let entry = DiskEntry::new(&key, PathBuf::from("x.wav"), 1);

        assert_eq!(entry.text_preview.chars().count(), TEXT_PREVIEW_LENGTH);
    }

    #[test]
    fn test_mark_accessed() {
        let key = AudioKey::new("Tests passed", "af_bella", 1.0, "wav");
        let mut entry = DiskEntry::new(&key, PathBuf::from("x.wav"), 1);
        let initial_time = entry.last_access_at;

        sleep(Duration::from_millis(10));
        entry.mark_accessed();

        assert_eq!(entry.access_count, 2);
        assert!(entry.last_access_at > initial_time);
        assert!(entry.created_at < entry.last_access_at);
    }

    #[test]
    fn test_json_roundtrip() {
        let key = AudioKey::new("Tests passed", "af_bella", 1.0, "wav");
        let entry = DiskEntry::new(&key, PathBuf::from("cache/audio/x.wav"), 42);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"last_access_at\""));
        assert!(json.contains("\"access_count\":1"));

        let parsed: DiskEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
