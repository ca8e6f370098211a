//! Unit tests for the error taxonomy

use larder_domain::error::Error;

#[test]
fn test_invalid_key_is_programmer_error() {
    let error = Error::invalid_key("empty");
    assert!(error.is_programmer_error());
    assert!(!error.is_tier_failure());
    assert_eq!(error.to_string(), "Invalid key: empty");
}

#[test]
fn test_shut_down_is_programmer_error() {
    assert!(Error::ShutDown.is_programmer_error());
    assert_eq!(Error::ShutDown.to_string(), "Cache has been shut down");
}

#[test]
fn test_tier_failures() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let connection = Error::connection_with_source("redis down", io);
    assert!(connection.is_tier_failure());
    assert!(std::error::Error::source(&connection).is_some());

    assert!(Error::timeout("GET recipe:1").is_tier_failure());
    assert!(Error::serialization("bad envelope").is_tier_failure());
    assert!(!Error::configuration("bad capacity").is_tier_failure());
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
    let error: Error = json_err.into();
    match error {
        Error::Json { .. } => {}
        other => panic!("Expected Json error, got {other:?}"),
    }
}

#[test]
fn test_configuration_with_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error = Error::configuration_with_source("cannot read larder.toml", io);
    match error {
        Error::Configuration { message, source } => {
            assert_eq!(message, "cannot read larder.toml");
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}
