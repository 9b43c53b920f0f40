// src/sweeper.rs

//! Background sweep of idle clients.
//!
//! Per-call pruning only touches the key being checked, so clients that go
//! quiet would otherwise stay in the store forever. The sweeper runs
//! `cleanup_stale_clients` once per window on the tokio runtime.

// dependencies
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::admission_limiter::AdmissionLimiter;
use crate::clock::Clock;

impl<C> AdmissionLimiter<C>
where
    C: Clock + 'static,
{
    /// Spawn the periodic sweep onto the current tokio runtime.
    ///
    /// The task holds a weak reference and exits on the first tick after
    /// every limiter handle has been dropped. Aborting the returned handle
    /// stops it earlier.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.window;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            tracing::info!(?period, "admission sweeper started");

            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    tracing::info!("admission limiter dropped, sweeper exiting");
                    break;
                };

                let limiter = AdmissionLimiter::from_inner(inner);
                if let Err(e) = limiter.cleanup_stale_clients() {
                    tracing::warn!(error = %e, "admission sweep failed");
                }
            }
        })
    }
}
