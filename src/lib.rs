// src/lib.rs

//! # Admission Limiter
//!
//! An in-memory sliding-window-log rate limiter. Each client key keeps the
//! timestamps of its recent admissions; a request is admitted while fewer
//! than `limit` of them fall inside the trailing window. The number of
//! tracked clients is soft-capped, evicting the least recently active
//! first, and a background sweep drops idle clients.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::time::Duration;
//! use admission_limiter::{AdmissionLimiter, LimiterConfig, LimiterError};
//!
//! let config = LimiterConfig::new(Duration::from_secs(60), 500);
//! let limiter = AdmissionLimiter::new(config).unwrap();
//!
//! for _ in 0..3 {
//!     limiter.check(3, "1.2.3.4").unwrap();
//! }
//! match limiter.check(3, "1.2.3.4") {
//!     Err(LimiterError::RateLimitExceeded { retry_after }) => {
//!         println!("429 - retry after {:.0}s", retry_after.as_secs_f64());
//!     }
//!     other => panic!("expected rejection, got {other:?}"),
//! }
//! ```

// private modules
mod admission_limiter;
mod client_key;
mod clock;
mod config;
mod errors;
mod sweeper;

// public API exports
pub use admission_limiter::AdmissionLimiter;
pub use client_key::{UNKNOWN_CLIENT, client_key_from_forwarded};
pub use clock::{Clock, ClockError, SystemClock};
pub use config::{DEFAULT_MAX_TRACKED_CLIENTS, DEFAULT_WINDOW, LimiterConfig};
pub use errors::LimiterError;
