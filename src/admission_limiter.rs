// src/admission_limiter.rs

// admission-limiter: a sliding-window-log rate limiter with a soft cap on tracked clients.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::errors::LimiterError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// The main AdmissionLimiter model.
/// C is the clock type, defaulting to SystemClock.
///
/// Each client key owns a log of admission timestamps (nanoseconds). A
/// `check` prunes the log to the trailing window, compares the remaining
/// count against the caller's limit and appends on success. The whole
/// read-modify-write runs under the key's `DashMap` shard guard, so
/// concurrent checks for one key are linearized.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug)]
pub struct AdmissionLimiter<C = SystemClock>
where
    C: Clock,
{
    pub(crate) inner: Arc<LimiterInner<C>>,
}

#[derive(Debug)]
pub(crate) struct LimiterInner<C> {
    pub(crate) window: Duration,
    window_nanos: u64,
    max_tracked_clients: usize,
    logs: DashMap<String, VecDeque<u64>>,
    clock: C,
}

impl<C: Clock> Clone for AdmissionLimiter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AdmissionLimiter<SystemClock> {
    /// Create a limiter driven by the system clock.
    pub fn new(config: LimiterConfig) -> Result<Self, LimiterError> {
        Self::with_config(config, SystemClock)
    }
}

// methods for the AdmissionLimiter type
impl<C> AdmissionLimiter<C>
where
    C: Clock,
{
    // method to create a new limiter from a config object
    pub fn with_config(config: LimiterConfig, clock: C) -> Result<Self, LimiterError> {
        config.validate()?;

        let window_nanos = u64::try_from(config.window.as_nanos()).unwrap_or(u64::MAX);

        Ok(Self {
            inner: Arc::new(LimiterInner {
                window: config.window,
                window_nanos,
                max_tracked_clients: config.max_tracked_clients,
                logs: DashMap::new(),
                clock,
            }),
        })
    }

    pub(crate) fn from_inner(inner: Arc<LimiterInner<C>>) -> Self {
        Self { inner }
    }

    // accessor method to return the trailing window
    pub fn window(&self) -> Duration {
        self.inner.window
    }

    // accessor method to return the tracked-client cap
    pub fn max_tracked_clients(&self) -> usize {
        self.inner.max_tracked_clients
    }

    /// Number of distinct client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.inner.logs.len()
    }

    pub fn is_tracked(&self, client_key: &str) -> bool {
        self.inner.logs.contains_key(client_key)
    }

    /// Admissions logged for `client_key` that still fall inside the window.
    /// Read-only: stale entries are counted out but not removed.
    pub fn admitted_in_window(&self, client_key: &str) -> Result<usize, LimiterError> {
        let cutoff = self.cutoff(self.inner.clock.now()?);
        Ok(self
            .inner
            .logs
            .get(client_key)
            .map_or(0, |log| log.iter().filter(|&&t| t >= cutoff).count()))
    }

    /// Forget everything recorded for `client_key`.
    pub fn reset(&self, client_key: &str) -> bool {
        self.inner.logs.remove(client_key).is_some()
    }

    /// Admit `client_key` if it has fewer than `limit` admissions in the
    /// trailing window.
    ///
    /// Call sites may pass different limits against the same limiter. On
    /// rejection nothing is appended and the error carries the time until
    /// the oldest logged admission leaves the window.
    pub fn check(&self, limit: u32, client_key: &str) -> Result<(), LimiterError> {
        if limit == 0 {
            return Err(LimiterError::InvalidLimit);
        }
        if client_key.is_empty() {
            return Err(LimiterError::InvalidClientKey);
        }

        let now = self.inner.clock.now()?;

        // Fast path: existing key, no allocation for the lookup.
        if let Some(mut log) = self.inner.logs.get_mut(client_key) {
            return self.admit(log.value_mut(), limit, now, client_key);
        }

        let created = match self.inner.logs.entry(client_key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                self.admit(occupied.get_mut(), limit, now, client_key)?;
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(VecDeque::from([now]));
                true
            }
        };

        // the entry guard is released here; eviction iterates every shard
        if created {
            self.enforce_capacity(client_key);
        }

        Ok(())
    }

    fn admit(
        &self,
        log: &mut VecDeque<u64>,
        limit: u32,
        now: u64,
        client_key: &str,
    ) -> Result<(), LimiterError> {
        let cutoff = self.cutoff(now);
        log.retain(|&t| t >= cutoff);

        if log.len() >= limit as usize {
            let oldest = log.iter().copied().min().unwrap_or(now);
            let retry_after = Duration::from_nanos(
                oldest
                    .saturating_add(self.inner.window_nanos)
                    .saturating_add(1)
                    .saturating_sub(now),
            );
            tracing::debug!(client_key, limit, ?retry_after, "admission rejected");
            return Err(LimiterError::RateLimitExceeded { retry_after });
        }

        log.push_back(now);
        Ok(())
    }

    // entries strictly older than this are stale
    fn cutoff(&self, now: u64) -> u64 {
        now.saturating_sub(self.inner.window_nanos)
    }

    /// Evict the least recently active keys (smallest earliest timestamp)
    /// until the tracked count is back under the cap. `admitted` is never
    /// a candidate. Approximate under concurrent inserts.
    fn enforce_capacity(&self, admitted: &str) {
        let max = self.inner.max_tracked_clients;
        let tracked = self.inner.logs.len();
        if tracked <= max {
            return;
        }
        let excess = tracked - max;

        // max-heap holding the `excess` oldest candidates seen so far
        let mut oldest: BinaryHeap<(u64, String)> = BinaryHeap::with_capacity(excess + 1);
        for entry in self.inner.logs.iter() {
            if entry.key() == admitted {
                continue;
            }
            let last_active = entry.value().iter().copied().min().unwrap_or(0);
            if oldest.len() == excess
                && oldest
                    .peek()
                    .is_some_and(|(newest, _)| last_active >= *newest)
            {
                continue;
            }
            oldest.push((last_active, entry.key().clone()));
            if oldest.len() > excess {
                oldest.pop();
            }
        }

        let mut evicted = 0usize;
        for (_, key) in oldest {
            if self.inner.logs.remove(&key).is_some() {
                evicted += 1;
            }
        }

        tracing::warn!(
            evicted,
            tracked,
            max_tracked_clients = max,
            "tracked clients over capacity, evicted least recently active"
        );
    }

    /// Prune every log to the window and drop keys left empty.
    /// Returns the number of keys removed.
    pub fn cleanup_stale_clients(&self) -> Result<usize, LimiterError> {
        let cutoff = self.cutoff(self.inner.clock.now()?);

        let mut removed = 0usize;
        self.inner.logs.retain(|_, log| {
            log.retain(|&t| t >= cutoff);
            if log.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            tracing::debug!(removed, "swept idle clients");
        }
        Ok(removed)
    }
}
