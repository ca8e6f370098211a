// Clippy allows for nested tier checks
#![allow(clippy::collapsible_if)]

//! # Larder Infrastructure
//!
//! Hot and cold tiers, the orchestrator that composes them, and the ambient
//! services around it.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Tiers, policies, metrics and the orchestrator |
//! | [`config`] | Figment configuration loading and validation |
//! | [`logging`] | Structured logging with tracing |
//! | [`infrastructure`] | Background task shutdown coordination |
//! | [`error_ext`] | Context adapters for foreign errors |
//! | [`constants`] | Configuration and metric names |

// Link the providers so their registry entries are present
extern crate larder_providers;

pub mod cache;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod infrastructure;
pub mod logging;

pub use cache::{CacheOrchestrator, memoize};
pub use error_ext::ErrorContext;
