//! # Larder Domain
//!
//! Core types for the Larder multi-tier cache: cache entries, key generation,
//! namespace policies, metrics snapshots and the cold store port.
//!
//! This crate has no I/O. Tier implementations live in
//! `larder-infrastructure`, backend adapters in `larder-providers`.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`keys`] | Deterministic namespaced key generation |
//! | [`value_objects`] | `CacheEntry`, `CachePattern`, `ReadOptions`, `MetricsSnapshot` |
//! | [`ports`] | `ColdStoreProvider` trait and provider registry |
//! | [`constants`] | Defaults shared by every layer |

pub mod constants;
pub mod error;
pub mod keys;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use keys::CacheKey;
pub use ports::ColdStoreProvider;
pub use value_objects::{CacheEntry, CachePattern, MetricsSnapshot, ReadOptions};
