//! Configuration Loader Tests

use figment::Jail;
use larder_domain::constants::{DEFAULT_HOT_CAPACITY, DEFAULT_TTL_SECS};
use larder_domain::error::Error;
use larder_infrastructure::config::loader::{ConfigLoader, validate_app_config};
use larder_infrastructure::config::AppConfig;
use larder_infrastructure::constants::DEFAULT_LOG_LEVEL;
use tempfile::TempDir;

fn load(loader: &ConfigLoader) -> figment::error::Result<AppConfig> {
    loader.load().map_err(|e| e.to_string().into())
}

#[test]
fn test_config_loader_defaults() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        let config = load(&ConfigLoader::new())?;

        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.cache.default_ttl_secs, DEFAULT_TTL_SECS);
        assert_eq!(config.cache.hot.capacity, DEFAULT_HOT_CAPACITY);
        assert!(config.cache.patterns.is_none());
        assert!(!config.cache.cold.is_enabled());
        Ok(())
    });
}

#[test]
fn test_config_loader_reads_toml_file() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_file(
            "larder.toml",
            r#"
                [logging]
                level = "debug"

                [cache]
                default_ttl_secs = 120

                [cache.hot]
                capacity = 50

                [cache.cold]
                url = "redis://cache.internal:6379"
                operation_timeout_ms = 250

                [[cache.patterns]]
                prefix = "recipe:*"
                ttl_secs = 60
                compression = true
                invalidation_links = ["nutrition:*"]
            "#,
        )?;

        let config = load(&ConfigLoader::new().with_config_path("larder.toml"))?;

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.cache.default_ttl_secs, 120);
        assert_eq!(config.cache.hot.capacity, 50);
        assert!(config.cache.cold.is_enabled());
        assert_eq!(config.cache.cold.operation_timeout_ms, 250);

        let patterns = config.cache.patterns.unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].ttl_secs, 60);
        assert!(patterns[0].compression);
        assert!(patterns[0].invalidation_links.contains("nutrition:*"));
        Ok(())
    });
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        let config = load(&ConfigLoader::new().with_config_path("absent.toml"))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    });
}

#[test]
fn test_prefixed_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_file("larder.toml", "[cache.hot]\ncapacity = 50\n")?;
        jail.set_env("LARDER_CACHE__HOT__CAPACITY", "75");
        jail.set_env("LARDER_LOGGING__JSON_FORMAT", "true");

        let config = load(&ConfigLoader::new().with_config_path("larder.toml"))?;

        assert_eq!(config.cache.hot.capacity, 75);
        assert!(config.logging.json_format);
        Ok(())
    });
}

#[test]
fn test_redis_url_env_enables_cold_tier() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("REDIS_URL", "redis://10.0.0.5:6379");

        let config = load(&ConfigLoader::new())?;
        assert_eq!(config.cache.cold.url.as_deref(), Some("redis://10.0.0.5:6379"));
        assert!(config.cache.cold.is_enabled());
        Ok(())
    });
}

#[test]
fn test_prefixed_url_wins_over_redis_url() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("REDIS_URL", "redis://10.0.0.5:6379");
        jail.set_env("LARDER_CACHE__COLD__URL", "redis://10.0.0.6:6379");

        let config = load(&ConfigLoader::new())?;
        assert_eq!(config.cache.cold.url.as_deref(), Some("redis://10.0.0.6:6379"));
        Ok(())
    });
}

#[test]
fn test_custom_env_prefix() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("PANTRY_CACHE__DEFAULT_TTL_SECS", "30");

        let config = load(&ConfigLoader::new().with_env_prefix("PANTRY"))?;
        assert_eq!(config.cache.default_ttl_secs, 30);
        Ok(())
    });
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("LARDER_CACHE__HOT__CAPACITY", "0");

        let result = ConfigLoader::new().load();
        assert!(matches!(result, Err(Error::Configuration { .. })));
        Ok(())
    });
}

#[test]
fn test_validate_app_config() {
    assert!(validate_app_config(&AppConfig::default()).is_ok());

    let mut config = AppConfig::default();
    config.logging.level = "loud".to_string();
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.cache.default_ttl_secs = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.cache.cold.operation_timeout_ms = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.cache.cold.provider = "  ".to_string();
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_validate_pattern_overrides() {
    use larder_domain::value_objects::CachePattern;
    use std::time::Duration;

    let mut config = AppConfig::default();
    config.cache.patterns = Some(vec![CachePattern::new("recipe:*", Duration::ZERO)]);
    assert!(validate_app_config(&config).is_err());

    config.cache.patterns = Some(vec![CachePattern::new("recipe:[", Duration::from_secs(5))]);
    let err = validate_app_config(&config).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    config.cache.patterns = Some(vec![
        CachePattern::new("recipe:*", Duration::from_secs(5)).with_link("nutrition:{"),
    ]);
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("larder.toml");

    let mut original = AppConfig::default();
    original.cache.hot.capacity = 321;
    original.cache.cold.url = Some("redis://127.0.0.1:6380".to_string());

    let loader = ConfigLoader::new().with_config_path(&config_path);
    loader.save_to_file(&original, &config_path).unwrap();
    assert_eq!(loader.config_path(), Some(config_path.as_path()));

    let rendered = ConfigLoader::to_toml_string(&original).unwrap();
    assert!(rendered.contains("capacity = 321"));

    Jail::expect_with(|jail| {
        jail.clear_env();
        let loaded = load(&loader)?;
        assert_eq!(loaded, original);
        Ok(())
    });
}
