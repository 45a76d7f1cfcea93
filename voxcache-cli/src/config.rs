//! Configuration file loading for the voxcache binary
//!
//! Settings come from `config.yml`, `config.yaml` or `config.json` in the
//! config directory (default `~/.voxcache`). Curated hot-cache texts are read
//! from `preload.yml`, then `preload.json`, then the main config, then the
//! built-in defaults, stopping at the first source that yields any.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use voxcache::CacheConfig;

/// Hot-cache texts used when no configuration names any
pub const DEFAULT_HOT_KEYS: [&str; 3] = [
    "build completed successfully",
    "tests passed",
    "session complete",
];

const CONFIG_FILE_NAMES: [&str; 3] = ["config.yml", "config.yaml", "config.json"];

/// `~/.voxcache`, or the current directory when there is no home directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".voxcache")
}

/// Values read from the main configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_memory_mb: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_disk_gb: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hot_cache: Vec<String>,
}

impl Settings {
    /// Load settings from an explicit file, choosing the parser by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yml") | Some("yaml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config: {:?}", path)),
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config: {:?}", path)),
            _ => Err(anyhow::anyhow!("Unsupported config file format: {:?}", path)),
        }
    }

    /// Load the first config file found in `config_dir`, or defaults
    pub fn discover(config_dir: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = config_dir.join(name);
            if path.exists() {
                debug!("Loading settings from {:?}", path);
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Turn these settings into a cache configuration
    pub fn to_cache_config(&self, hot_keys: Vec<String>) -> CacheConfig {
        let mut builder = CacheConfig::builder().hot_keys(hot_keys);

        if let Some(dir) = &self.cache_dir {
            builder = builder.cache_dir(dir);
        }
        if let Some(max_items) = self.max_items {
            builder = builder.max_items(max_items);
        }
        if let Some(mb) = self.max_memory_mb {
            builder = builder.max_memory_mb(mb);
        }
        if let Some(gb) = self.max_disk_gb {
            builder = builder.max_disk_gb(gb);
        }

        builder.build()
    }
}

/// Collect curated hot-cache texts, lowercased and de-duplicated.
///
/// Malformed preload files are logged and skipped.
pub fn load_hot_keys(config_dir: &Path, settings: &Settings) -> Vec<String> {
    let mut keys = read_preload_yaml(&config_dir.join("preload.yml"));

    if keys.is_empty() {
        keys = read_preload_json(&config_dir.join("preload.json"));
    }

    if keys.is_empty() {
        keys = settings.hot_cache.clone();
    }

    if keys.is_empty() {
        keys = DEFAULT_HOT_KEYS.iter().map(|k| k.to_string()).collect();
    }

    keys.iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn read_preload_yaml(path: &Path) -> Vec<String> {
    let Some(content) = read_optional(path) else {
        return Vec::new();
    };

    match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(value) => value
            .get("hot_cache")
            .and_then(|list| list.as_sequence())
            .map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        Err(e) => {
            warn!("Failed to load YAML hot cache config {:?}: {}", path, e);
            Vec::new()
        }
    }
}

fn read_preload_json(path: &Path) -> Vec<String> {
    let Some(content) = read_optional(path) else {
        return Vec::new();
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => value
            .get("hot_cache")
            .and_then(|list| list.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        Err(e) => {
            warn!("Failed to load JSON hot cache config {:?}: {}", path, e);
            Vec::new()
        }
    }
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_files() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::discover(tmp.path()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(
            load_hot_keys(tmp.path(), &settings),
            vec![
                "build completed successfully".to_string(),
                "session complete".to_string(),
                "tests passed".to_string(),
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "max_items = 3").unwrap();

        assert!(Settings::load(&path).is_err());
    }
}
