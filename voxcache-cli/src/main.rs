use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxcache::{AudioKey, CacheManager};
use voxcache_cli::config::{self, Settings};

#[derive(Parser)]
#[command(name = "voxcache")]
#[command(about = "Three-tier cache for synthesized speech audio", long_about = None)]
struct Cli {
    /// Explicit config file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding config.yml and preload files (default ~/.voxcache)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Audio cache directory, overriding the config file
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics for every tier
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear a tier (hot, disk, memory) or all of them
    Clear {
        #[arg(default_value = "all")]
        tier: String,
    },

    /// Look up cached audio
    Get {
        /// Text that was spoken
        text: String,

        #[command(flatten)]
        audio: AudioArgs,

        /// Write the audio to this file instead of reporting its size
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store audio from a file
    Put {
        /// Text that was spoken
        text: String,

        /// Audio file to store
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        audio: AudioArgs,
    },

    /// Curate a text for the hot tier and backfill it from disk
    Promote {
        /// Text to curate
        text: String,

        /// Voice to try first
        #[arg(short, long, default_value = "af_bella")]
        voice: String,
    },

    /// List curated hot-cache texts
    HotKeys,
}

#[derive(clap::Args)]
struct AudioArgs {
    /// Voice identifier
    #[arg(short, long, default_value = "af_bella")]
    voice: String,

    /// Speech rate multiplier
    #[arg(short, long, default_value_t = 1.0)]
    speed: f64,

    /// Audio container format
    #[arg(short, long, default_value = "wav")]
    format: String,
}

impl AudioArgs {
    fn key(&self, text: &str) -> AudioKey {
        AudioKey::new(text, &self.voice, self.speed, &self.format)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "voxcache=info".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::HotKeys => {
            let (_, hot_keys) = load_settings(&cli)?;
            println!("Curated hot-cache texts ({}):", hot_keys.len());
            for key in hot_keys {
                println!("  - {}", key);
            }
        }

        Commands::Stats { json } => {
            let cache = create_manager(&cli).await?;
            let report = cache.comprehensive_stats().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }

        Commands::Clear { ref tier } => {
            let cache = create_manager(&cli).await?;
            cache.clear_cache_named(tier).await?;
            println!("Cleared {} cache", tier);
        }

        Commands::Get { ref text, ref audio, ref output } => {
            let cache = create_manager(&cli).await?;
            let key = audio.key(text);

            let Some(bytes) = cache.get_audio(&key).await else {
                anyhow::bail!("No cached audio for {}", key);
            };

            match output {
                Some(path) => {
                    std::fs::write(path, &bytes)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote {} bytes to {:?}", bytes.len(), path);
                }
                None => println!("Cache hit: {} ({} bytes)", key, bytes.len()),
            }
        }

        Commands::Put { ref text, ref input, ref audio } => {
            let bytes = std::fs::read(input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let cache = create_manager(&cli).await?;
            let key = audio.key(text);

            cache.put_audio(&key, &bytes).await;
            println!("Stored {} ({} bytes)", key, bytes.len());
        }

        Commands::Promote { ref text, ref voice } => {
            let cache = create_manager(&cli).await?;

            if cache.promote_to_hot_cache(text, voice).await {
                println!("Promoted {:?} to hot cache", text);
            } else {
                println!("Curated {:?}; no cached audio found to backfill", text);
            }
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<(Settings, Vec<String>)> {
    let config_dir = cli.config_dir.clone().unwrap_or_else(config::default_config_dir);

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(&config_dir)?,
    };

    if let Some(dir) = &cli.cache_dir {
        settings.cache_dir = Some(dir.clone());
    }

    let hot_keys = config::load_hot_keys(&config_dir, &settings);
    Ok((settings, hot_keys))
}

async fn create_manager(cli: &Cli) -> Result<CacheManager> {
    let (settings, hot_keys) = load_settings(cli)?;
    let cache = CacheManager::new(settings.to_cache_config(hot_keys)).await?;
    Ok(cache)
}
