//! Console engine configuration

use std::time::Duration;

use strama_core::filter::{DEFAULT_MAX_CRITERIA, DEFAULT_MAX_CRITERIA_PER_FIELD};

/// Default list poll cadence
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default list page size
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the console engine.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Cadence of the recurring list fetch
    pub poll_interval: Duration,
    /// Page size requested from the list endpoint
    pub page_size: u32,
    /// Global cap on committed filter criteria
    pub max_filter_criteria: usize,
    /// Per-field cap on committed filter criteria
    pub max_filter_criteria_per_field: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
            max_filter_criteria: DEFAULT_MAX_CRITERIA,
            max_filter_criteria_per_field: DEFAULT_MAX_CRITERIA_PER_FIELD,
        }
    }
}

impl ConsoleConfig {
    /// Create a new builder.
    pub fn builder() -> ConsoleConfigBuilder {
        ConsoleConfigBuilder::default()
    }
}

/// Builder for [`ConsoleConfig`].
#[derive(Debug, Default)]
pub struct ConsoleConfigBuilder {
    config: ConsoleConfig,
}

impl ConsoleConfigBuilder {
    /// Set the poll cadence.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the list page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set the global filter criteria cap.
    pub fn max_filter_criteria(mut self, max: usize) -> Self {
        self.config.max_filter_criteria = max;
        self
    }

    /// Set the per-field filter criteria cap.
    pub fn max_filter_criteria_per_field(mut self, max: usize) -> Self {
        self.config.max_filter_criteria_per_field = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ConsoleConfig {
        self.config
    }
}
