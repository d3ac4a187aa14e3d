//! Fan-out configuration for the price search.

use std::time::Duration;

/// Configuration parameters for one price search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of route searches in flight at once.
    pub max_concurrent: usize,

    /// Deadline for a single route search, measured from when it starts
    /// running (not from when it was queued).
    pub route_timeout: Duration,

    /// Deadline for the whole fan-out. Searches still running when it
    /// passes are cancelled.
    pub overall_timeout: Duration,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_concurrent: usize, route_timeout: Duration, overall_timeout: Duration) -> Self {
        Self {
            max_concurrent,
            route_timeout,
            overall_timeout,
        }
    }

    /// Set maximum concurrent searches.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_route_timeout(mut self, d: Duration) -> Self {
        self.route_timeout = d;
        self
    }

    pub fn with_overall_timeout(mut self, d: Duration) -> Self {
        self.overall_timeout = d;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            route_timeout: Duration::from_secs(60),
            overall_timeout: Duration::from_secs(180),
        }
    }
}
