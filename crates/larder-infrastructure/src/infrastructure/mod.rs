//! Runtime infrastructure shared by the cache components

pub mod shutdown;

pub use shutdown::ShutdownCoordinator;
