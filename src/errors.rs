// src/errors.rs

// error handling for the admission limiter

// dependencies
use std::time::Duration;

use crate::clock::ClockError;

/// Errors returned by the admission limiter.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimiterError {
    /// Window or tracked-client cap is not positive.
    #[error("invalid limiter configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// `check` was called with a limit of zero.
    #[error("limit must be positive")]
    InvalidLimit,

    /// `check` was called with an empty client key.
    #[error("client key must not be empty")]
    InvalidClientKey,

    /// The client has no remaining quota in the current window.
    #[error("too many requests, retry after {retry_after:?}")]
    RateLimitExceeded { retry_after: Duration },

    /// The clock could not be read. Nothing was mutated.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),
}

impl LimiterError {
    /// Whether the caller's caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::Clock(_))
    }

    /// How long until the client regains quota, when rate limited.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
