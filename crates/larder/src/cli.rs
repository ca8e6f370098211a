//! Operator command line
//!
//! Every command loads configuration, installs logging, starts a cache against
//! the configured tiers, runs once and shuts the cache down again.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use larder_domain::error::Result;
use larder_infrastructure::cache::CacheOrchestrator;
use larder_infrastructure::config::{AppConfig, ConfigLoader};
use larder_infrastructure::error_ext::ErrorContext;
use larder_infrastructure::logging::init_logging;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Command line interface for Larder
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(about = "Larder - two-tier cache maintenance")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current metrics snapshot as JSON
    Stats,
    /// Print the cached value for a key
    Get { key: String },
    /// Store a value; non-JSON input is stored as a string
    Set {
        key: String,
        value: String,
        /// TTL in seconds, defaults to the key's pattern
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Remove one key from both tiers
    Delete { key: String },
    /// Remove every key matching a glob
    Invalidate {
        glob: String,
        /// Follow the pattern's invalidation links
        #[arg(long)]
        linked: bool,
    },
    /// Load a JSON object of key/value pairs with pattern TTLs
    Warm { file: PathBuf },
    /// Clear both tiers
    Flush,
    /// List namespace policies
    Patterns,
    /// Print the effective configuration and check the cold tier connection
    Check,
}

/// Load configuration, start the cache and run `cli.command`
pub async fn run(cli: Cli) -> std::result::Result<String, Box<dyn std::error::Error>> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    init_logging(config.logging.clone())?;

    let cache = CacheOrchestrator::from_config(&config.cache)?;
    cache.start().await?;
    info!(command = ?cli.command, "Running command");

    let output = execute(&cache, &config, cli.command).await;
    cache.shutdown().await;
    Ok(output?)
}

/// Run one command against a started cache and render its output
pub async fn execute(
    cache: &CacheOrchestrator,
    config: &AppConfig,
    command: Command,
) -> Result<String> {
    match command {
        Command::Stats => render(&cache.get_metrics()),
        Command::Get { key } => match cache.get::<Value>(&key).await? {
            Some(value) => render(&value),
            None => Ok(format!("{key}: miss")),
        },
        Command::Set { key, value, ttl } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            cache
                .set(&key, &value, ttl.map(Duration::from_secs))
                .await?;
            Ok(format!("{key}: stored"))
        }
        Command::Delete { key } => {
            let removed = cache.delete(&key).await?;
            Ok(format!("{key}: {}", if removed { "deleted" } else { "absent" }))
        }
        Command::Invalidate { glob, linked } => {
            if linked {
                render(&cache.invalidate_linked(&glob).await?)
            } else {
                render(&cache.invalidate_pattern(&glob).await?)
            }
        }
        Command::Warm { file } => {
            let content = std::fs::read_to_string(&file)
                .io_context(format!("Failed to read warm-up file {}", file.display()))?;
            let entries: serde_json::Map<String, Value> = serde_json::from_str(&content)
                .serialization_context("Warm-up file must be a JSON object")?;
            let count = cache.warm_up(entries).await?;
            Ok(format!("{count} entries warmed"))
        }
        Command::Flush => {
            cache.clear().await?;
            Ok("both tiers cleared".to_string())
        }
        Command::Patterns => {
            let patterns: Vec<_> = cache.patterns().patterns().collect();
            render(&patterns)
        }
        Command::Check => {
            let cold = match (config.cache.cold.is_enabled(), cache.get_metrics().cold_connected) {
                (false, _) => "disabled",
                (true, true) => "connected",
                (true, false) => "unreachable",
            };
            Ok(format!(
                "{}\n# {} patterns, cold tier {cold}",
                ConfigLoader::to_toml_string(config)?.trim_end(),
                cache.patterns().len(),
            ))
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).serialization_context("Failed to render output")
}
