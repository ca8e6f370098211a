//! Read options
//!
//! # Example
//!
//! ```ignore
//! let opts = ReadOptions::default()
//!     .skip_memory()
//!     .with_timeout(Duration::from_millis(50));
//! let value: Option<Recipe> = cache.get_with("recipe:42", &opts).await?;
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Per-call options for cache reads
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Bypass the hot tier
    pub skip_memory: bool,
    /// Bypass the cold tier
    pub skip_cold: bool,
    /// Deadline for cold tier calls, overriding the configured default
    pub timeout: Option<Duration>,
    /// Cancelling this token turns the pending cold call into a miss
    pub cancel: Option<CancellationToken>,
}

impl ReadOptions {
    /// Create default read options (both tiers, configured deadline)
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cold tier only
    pub fn skip_memory(mut self) -> Self {
        self.skip_memory = true;
        self
    }

    /// Read the hot tier only
    pub fn skip_cold(mut self) -> Self {
        self.skip_cold = true;
        self
    }

    /// Set the cold tier deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Whether the attached token was already cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
