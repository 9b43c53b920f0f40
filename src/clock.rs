// src/clock.rs

// time sources for the admission limiter

// dependencies
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for the limiter, in nanoseconds since the Unix epoch.
///
/// Implementors must be thread-safe, since one limiter is shared by every
/// request handler and by the background sweeper. Tests substitute a clock
/// they can move by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;
}

/// Clock error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("system time is before the Unix epoch")]
    SystemTimeError,
}

/// Wall-clock time source. The default clock for `AdmissionLimiter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<u64, ClockError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .map_err(|_| ClockError::SystemTimeError)
    }
}
