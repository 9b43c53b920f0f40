// src/config.rs

//! Configuration types for the admission limiter

// dependencies
use std::time::Duration;

use crate::errors::LimiterError;

/// Default trailing window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default soft cap on the number of distinct client keys.
pub const DEFAULT_MAX_TRACKED_CLIENTS: usize = 500;

/// Configuration for the admission limiter: the trailing window admissions
/// are counted over, and how many distinct clients may be tracked at once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LimiterConfig {
    pub(crate) window: Duration,
    pub(crate) max_tracked_clients: usize,
}

impl LimiterConfig {
    /// Create a new configuration with window and capacity settings
    pub fn new(window: Duration, max_tracked_clients: usize) -> Self {
        Self {
            window,
            max_tracked_clients,
        }
    }

    /// Builder-style: set the trailing window
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Builder-style: set the tracked-client cap
    pub fn max_tracked_clients(mut self, max_tracked_clients: usize) -> Self {
        self.max_tracked_clients = max_tracked_clients;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LimiterError> {
        if self.window.is_zero() {
            return Err(LimiterError::InvalidConfiguration(
                "window must be a positive duration",
            ));
        }
        if self.max_tracked_clients == 0 {
            return Err(LimiterError::InvalidConfiguration(
                "max_tracked_clients must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_TRACKED_CLIENTS)
    }
}
