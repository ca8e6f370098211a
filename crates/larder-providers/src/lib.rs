//! # Larder Providers
//!
//! Cold store backends implementing
//! [`ColdStoreProvider`](larder_domain::ports::ColdStoreProvider).
//!
//! | Provider | Feature | Description |
//! |----------|---------|-------------|
//! | [`NullColdStore`](cache::NullColdStore) | always | Holds nothing, never connected |
//! | [`RedisColdStore`](cache::RedisColdStore) | `cache-redis` | Shared Redis backend |
//!
//! Every provider registers itself in
//! [`COLD_STORE_PROVIDERS`](larder_domain::ports::COLD_STORE_PROVIDERS); linking
//! this crate is enough to make them resolvable by name.

pub mod cache;
pub mod constants;

pub use cache::NullColdStore;
#[cfg(feature = "cache-redis")]
pub use cache::RedisColdStore;
