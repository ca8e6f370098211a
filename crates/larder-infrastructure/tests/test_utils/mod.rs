//! Test utilities for larder-infrastructure integration tests
//!
//! Cold store doubles implementing the provider port.


pub use cold_stores::*;
