//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables, and
//! default values through Figment.

use crate::cache::patterns::compile_glob;
use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    REDIS_URL_ENV,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use larder_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. `REDIS_URL`, mapped onto `cache.cold.url`
    /// 4. Prefixed environment variables (e.g., `LARDER_CACHE__HOT__CAPACITY`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment
            .merge(
                Env::raw()
                    .only(&[REDIS_URL_ENV])
                    .map(|_| "cache.cold.url".into()),
            )
            .merge(Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Render configuration as TOML
    pub fn to_toml_string(config: &AppConfig) -> Result<String> {
        toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = Self::to_toml_string(config)?;
        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;
        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_cache_config(config)?;
    validate_pattern_config(config)?;
    validate_cold_config(config)?;
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    crate::logging::parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    let cache = &config.cache;
    if cache.default_ttl_secs == 0 {
        return Err(Error::configuration("Default cache TTL cannot be 0"));
    }
    if cache.hot.capacity == 0 {
        return Err(Error::configuration("Hot tier capacity cannot be 0"));
    }
    if cache.hot.sweep_interval_secs == 0 {
        return Err(Error::configuration("Hot tier sweep interval cannot be 0"));
    }
    if cache.metrics_flush_interval_secs == 0 {
        return Err(Error::configuration("Metrics flush interval cannot be 0"));
    }
    Ok(())
}

fn validate_pattern_config(config: &AppConfig) -> Result<()> {
    for pattern in config.cache.patterns.iter().flatten() {
        if pattern.ttl_secs == 0 {
            return Err(Error::configuration(format!(
                "Pattern '{}' has a TTL of 0",
                pattern.prefix
            )));
        }
        compile_glob(&pattern.prefix).map_err(|e| {
            Error::configuration(format!("Pattern '{}' is not a valid glob: {e}", pattern.prefix))
        })?;
        for link in &pattern.invalidation_links {
            compile_glob(link).map_err(|e| {
                Error::configuration(format!(
                    "Invalidation link '{link}' of pattern '{}' is not a valid glob: {e}",
                    pattern.prefix
                ))
            })?;
        }
    }
    Ok(())
}

fn validate_cold_config(config: &AppConfig) -> Result<()> {
    let cold = &config.cache.cold;
    if cold.operation_timeout_ms == 0 {
        return Err(Error::configuration("Cold tier operation timeout cannot be 0"));
    }
    if cold.connect_timeout_ms == 0 {
        return Err(Error::configuration("Cold tier connect timeout cannot be 0"));
    }
    if cold.provider.trim().is_empty() {
        return Err(Error::configuration("Cold tier provider name cannot be empty"));
    }
    Ok(())
}
