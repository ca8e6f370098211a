//! Configuration Tests
//!
//! Layered loading, environment overrides and validation.

mod loader_test;
