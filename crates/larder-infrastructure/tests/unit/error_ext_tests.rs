//! Error Extension Tests

use larder_domain::error::{Error, Result};
use larder_infrastructure::error_ext::ErrorContext;
use std::io;

#[test]
fn test_io_context() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).io_context("failed to read file");
    if let Err(Error::Io { source, message }) = result {
        assert!(message.contains("failed to read file"));
        assert!(message.contains("file not found"));
        assert!(source.is_some());
    } else {
        panic!("Expected Io error");
    }
}

#[test]
fn test_config_context() {
    let parse_error = "abc".parse::<u32>().unwrap_err();

    let result: Result<u32> = Err(parse_error).config_context("bad capacity");
    assert!(matches!(
        result,
        Err(Error::Configuration { source: Some(_), .. })
    ));
}

#[test]
fn test_serialization_context() {
    let json_error = serde_json::from_str::<u32>("nope").unwrap_err();

    let result: Result<u32> = Err(json_error).serialization_context("decode entry");
    match result {
        Err(Error::Serialization { message, .. }) => assert!(message.starts_with("decode entry")),
        other => panic!("Expected Serialization error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context built for Ok") })
        .unwrap();
    assert_eq!(value, 1);

    let err: std::result::Result<u8, io::Error> = Err(io::Error::other("boom"));
    let result = err.with_context(|| format!("step {}", 3));
    assert!(matches!(result, Err(Error::Cache { message }) if message == "step 3: boom"));
}
