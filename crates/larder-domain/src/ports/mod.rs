//! Domain Port Interfaces
//!
//! Contracts implemented by the provider layer:
//!
//! - **cold_store** - byte-level networked key/value backend behind the cold tier
//! - **registry** - compile-time registration and name-based resolution of backends

/// Cold store provider port
pub mod cold_store;
/// Cold store provider registry
pub mod registry;

pub use cold_store::ColdStoreProvider;
pub use registry::{
    COLD_STORE_PROVIDERS, ColdStoreProviderConfig, ColdStoreProviderEntry, list_cold_stores,
    resolve_cold_store,
};
