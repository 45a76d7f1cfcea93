//! Support code for the `voxcache` command line tool

pub mod config;

pub use config::{default_config_dir, load_hot_keys, Settings, DEFAULT_HOT_KEYS};
