use std::fs;
use tempfile::TempDir;
use voxcache::CacheManager;
use voxcache_cli::config::{load_hot_keys, Settings, DEFAULT_HOT_KEYS};

/// Test: YAML config keys map onto the cache configuration
#[test]
fn test_yaml_settings_to_cache_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.yml"),
        "max_items: 12\nmax_memory_mb: 2\nmax_disk_gb: 0.5\ncache_dir: /tmp/vox/audio\n",
    )
    .unwrap();

    let settings = Settings::discover(tmp.path()).unwrap();
    assert_eq!(settings.max_items, Some(12));

    let config = settings.to_cache_config(vec!["tests passed".to_string()]);
    assert_eq!(config.max_items, 12);
    assert_eq!(config.max_memory_bytes, 2 * 1024 * 1024);
    assert_eq!(config.max_disk_bytes, 512 * 1024 * 1024);
    assert_eq!(config.cache_dir, std::path::PathBuf::from("/tmp/vox/audio"));
    assert_eq!(config.hot_keys, vec!["tests passed".to_string()]);
}

/// Test: JSON config is used when no YAML config exists
#[test]
fn test_json_settings_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{ "max_items": 3, "hot_cache": ["Deploy Finished"] }"#,
    )
    .unwrap();

    let settings = Settings::discover(tmp.path()).unwrap();
    assert_eq!(settings.max_items, Some(3));
    assert_eq!(
        load_hot_keys(tmp.path(), &settings),
        vec!["deploy finished".to_string()]
    );
}

/// Test: preload.yml wins over preload.json and the main config
#[test]
fn test_preload_yaml_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("preload.yml"),
        "hot_cache:\n  - Tests Passed\n  - 42\n  - Build Failed\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("preload.json"),
        r#"{ "hot_cache": ["from json"] }"#,
    )
    .unwrap();

    let settings = Settings {
        hot_cache: vec!["from config".to_string()],
        ..Default::default()
    };

    assert_eq!(
        load_hot_keys(tmp.path(), &settings),
        vec!["build failed".to_string(), "tests passed".to_string()]
    );
}

/// Test: a malformed preload.yml is skipped in favour of preload.json
#[test]
fn test_malformed_preload_yaml_falls_back_to_json() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("preload.yml"), "hot_cache: [unterminated\n").unwrap();
    fs::write(
        tmp.path().join("preload.json"),
        r#"{ "hot_cache": ["Session Complete"] }"#,
    )
    .unwrap();

    assert_eq!(
        load_hot_keys(tmp.path(), &Settings::default()),
        vec!["session complete".to_string()]
    );
}

/// Test: built-in defaults apply when nothing names hot keys
#[test]
fn test_default_hot_keys_when_unconfigured() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("preload.json"), "not json").unwrap();

    let keys = load_hot_keys(tmp.path(), &Settings::default());
    assert_eq!(keys.len(), DEFAULT_HOT_KEYS.len());
    for default in DEFAULT_HOT_KEYS {
        assert!(keys.contains(&default.to_string()));
    }
}

/// Test: a broken main config file is an error, not silently ignored
#[test]
fn test_invalid_config_file_is_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.yml"), "max_items: [1, 2\n").unwrap();

    assert!(Settings::discover(tmp.path()).is_err());
}

/// Test: loaded settings build a working cache whose hot tier is curated
#[tokio::test]
async fn test_settings_build_cache_manager() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("preload.yml"), "hot_cache:\n  - Tests Passed\n").unwrap();

    let settings = Settings {
        cache_dir: Some(tmp.path().join("cache").join("audio")),
        ..Default::default()
    };
    let hot_keys = load_hot_keys(tmp.path(), &settings);
    let cache = CacheManager::new(settings.to_cache_config(hot_keys))
        .await
        .unwrap();

    assert!(cache.hot().is_curated("TESTS PASSED").await);
    assert_eq!(cache.comprehensive_stats().await.hot.curated_keys, 1);
    assert!(tmp.path().join("cache").join("audio").is_dir());
}
