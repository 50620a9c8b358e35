//! Keyed cache for asynchronous fetches.
//!
//! A [`RequestCache`] maps a [`CacheKey`] to the latest known state of one
//! fetch: pending, success (with its value and time), or error. Callers ask
//! for a key with [`RequestCache::get`] and get back a [`Snapshot`]
//! immediately; the fetch, when one is needed, runs as a background task.
//!
//! Rules per key:
//! - no entry: start a fetch, report `Pending`;
//! - fresh success: return it, fetcher not called;
//! - stale success: return the old value and start one background refetch;
//! - error: returned as-is until the caller retries via [`RequestCache::refetch`]
//!   or [`RequestCache::invalidate`];
//! - at most one fetch in flight; further requests coalesce into it.
//!
//! Results are applied in completion order. Each key owns its entry, so a
//! late result for a key the caller has moved away from is stored for reuse
//! but never shows up under the new key.
//!
//! Fetches are spawned with [`tokio::spawn`]; `get` and `refetch` must be
//! called from within a Tokio runtime.

mod clock;
mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{HeroError, HeroResult};

/// Default freshness window: five minutes.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// Per-request freshness and error policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Age after which a successful value is refetched in the background.
    pub stale_time: Duration,
    /// Keep the last good value visible when a refetch fails.
    pub keep_previous_on_error: bool,
}

impl FetchPolicy {
    pub fn new(stale_time: Duration) -> Self {
        Self { stale_time, keep_previous_on_error: false }
    }

    pub fn keep_previous_on_error(mut self, keep: bool) -> Self {
        self.keep_previous_on_error = keep;
        self
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

/// Point-in-time view of one key.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub key: CacheKey,
    pub status: CacheStatus,
    pub value: Option<Arc<T>>,
    pub error: Option<HeroError>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// A fetch for this key is in flight (initial load or background refetch).
    pub is_fetching: bool,
    /// Cache-wide version at the time of the snapshot.
    pub version: u64,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: self.status,
            value: self.value.clone(),
            error: self.error.clone(),
            fetched_at: self.fetched_at,
            is_fetching: self.is_fetching,
            version: self.version,
        }
    }
}

impl<T> Snapshot<T> {
    /// First load in progress with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == CacheStatus::Pending && self.value.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.status == CacheStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == CacheStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        self.value.as_deref()
    }
}

struct Entry<T> {
    status: CacheStatus,
    value: Option<Arc<T>>,
    error: Option<HeroError>,
    fetched_at: Option<DateTime<Utc>>,
    in_flight: bool,
    invalidated: bool,
}

impl<T> Entry<T> {
    fn idle() -> Self {
        Self {
            status: CacheStatus::Idle,
            value: None,
            error: None,
            fetched_at: None,
            in_flight: false,
            invalidated: false,
        }
    }

    fn is_stale(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
        if self.invalidated {
            return true;
        }
        match self.fetched_at {
            // A clock that went backwards counts as zero age.
            Some(at) => (now - at).to_std().unwrap_or_default() >= stale_time,
            None => true,
        }
    }

    fn needs_fetch(&self, now: DateTime<Utc>, policy: &FetchPolicy) -> bool {
        if self.in_flight {
            return false;
        }
        match self.status {
            CacheStatus::Idle => true,
            CacheStatus::Pending => false,
            CacheStatus::Success => self.is_stale(now, policy.stale_time),
            CacheStatus::Error => self.invalidated,
        }
    }

    fn begin_fetch(&mut self) {
        self.in_flight = true;
        self.invalidated = false;
        if matches!(self.status, CacheStatus::Idle | CacheStatus::Error) {
            self.status = CacheStatus::Pending;
        }
    }

    fn apply(&mut self, outcome: HeroResult<T>, now: DateTime<Utc>, keep_previous: bool) {
        self.in_flight = false;
        match outcome {
            Ok(value) => {
                self.status = CacheStatus::Success;
                self.value = Some(Arc::new(value));
                self.error = None;
                self.fetched_at = Some(now);
            }
            Err(err) => {
                self.status = CacheStatus::Error;
                self.error = Some(err);
                if !keep_previous {
                    self.value = None;
                }
            }
        }
    }

    fn snapshot(&self, key: &CacheKey, version: u64) -> Snapshot<T> {
        Snapshot {
            key: key.clone(),
            status: self.status,
            value: self.value.clone(),
            error: self.error.clone(),
            fetched_at: self.fetched_at,
            is_fetching: self.in_flight,
            version,
        }
    }
}

struct State<T> {
    entries: HashMap<CacheKey, Entry<T>>,
    version: u64,
    fetches_started: u64,
    /// Bumped by `clear`; fetches spawned under an older generation are dropped.
    generation: u64,
}

/// Keyed cache of asynchronous fetch results. Cheap to clone; clones share state.
pub struct RequestCache<T> {
    state: Arc<Mutex<State<T>>>,
    clock: Arc<dyn Clock>,
    version_tx: Arc<watch::Sender<u64>>,
}

impl<T> Clone for RequestCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
            version_tx: Arc::clone(&self.version_tx),
        }
    }
}

impl<T: Send + Sync + 'static> Default for RequestCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> RequestCache<T> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(State {
                entries: HashMap::new(),
                version: 0,
                fetches_started: 0,
                generation: 0,
            })),
            clock,
            version_tx: Arc::new(version_tx),
        }
    }

    /// Return the current state for `key`, starting a fetch if one is due.
    ///
    /// `fetcher` is only called when a fetch actually starts.
    pub fn get<F, Fut>(&self, key: &CacheKey, fetcher: F, policy: &FetchPolicy) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HeroResult<T>> + Send + 'static,
    {
        let now = self.clock.now();
        let mut state = lock(&self.state);
        let version = state.version;
        let entry = state.entries.entry(key.clone()).or_insert_with(Entry::idle);

        let start = entry.needs_fetch(now, policy);
        if start {
            if entry.status == CacheStatus::Success {
                tracing::debug!(key = %key, "stale entry, refetching in background");
            } else {
                tracing::debug!(key = %key, "cache miss, fetching");
            }
            entry.begin_fetch();
        } else if entry.in_flight {
            tracing::trace!(key = %key, "fetch already in flight, coalescing");
        } else {
            tracing::trace!(key = %key, status = ?entry.status, "cache hit");
        }

        let snapshot = entry.snapshot(key, version);
        if start {
            state.fetches_started += 1;
        }
        let generation = state.generation;
        drop(state);

        if start {
            self.spawn_fetch(key.clone(), generation, fetcher(), policy.keep_previous_on_error);
        }
        snapshot
    }

    /// Like [`get`](Self::get), but waits until no fetch is in flight for `key`.
    pub async fn get_settled<F, Fut>(
        &self,
        key: &CacheKey,
        fetcher: F,
        policy: &FetchPolicy,
    ) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HeroResult<T>> + Send + 'static,
    {
        let snapshot = self.get(key, fetcher, policy);
        if snapshot.is_fetching {
            self.settled(key).await
        } else {
            snapshot
        }
    }

    /// Explicit retry: start a fetch now unless one is already in flight.
    pub fn refetch<F, Fut>(&self, key: &CacheKey, fetcher: F, policy: &FetchPolicy) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HeroResult<T>> + Send + 'static,
    {
        self.invalidate(key);
        self.get(key, fetcher, policy)
    }

    /// Mark `key` stale so the next `get` refetches it. Keeps the current value.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(entry) = lock(&self.state).entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    /// Current state for `key` without starting anything.
    pub fn snapshot(&self, key: &CacheKey) -> Snapshot<T> {
        let state = lock(&self.state);
        match state.entries.get(key) {
            Some(entry) => entry.snapshot(key, state.version),
            None => Entry::idle().snapshot(key, state.version),
        }
    }

    /// Wait until `key` has no fetch in flight and return its state.
    pub async fn settled(&self, key: &CacheKey) -> Snapshot<T> {
        // Subscribe before checking so a completion in between is not missed.
        let mut rx = self.version_tx.subscribe();
        loop {
            {
                let state = lock(&self.state);
                match state.entries.get(key) {
                    Some(entry) if entry.in_flight => {}
                    Some(entry) => return entry.snapshot(key, state.version),
                    None => return Entry::idle().snapshot(key, state.version),
                }
            }
            if rx.changed().await.is_err() {
                return self.snapshot(key);
            }
        }
    }

    /// Incremented every time a fetch result is applied.
    pub fn version(&self) -> u64 {
        lock(&self.state).version
    }

    /// Receiver that changes whenever a fetch result is applied.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    /// Total number of fetches started over the cache's lifetime.
    pub fn fetches_started(&self) -> u64 {
        lock(&self.state).fetches_started
    }

    /// Drop every entry. Fetches still in flight finish but are discarded.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.entries.clear();
        state.generation += 1;
    }

    fn spawn_fetch<Fut>(&self, key: CacheKey, generation: u64, fetch: Fut, keep_previous: bool)
    where
        Fut: Future<Output = HeroResult<T>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let version_tx = Arc::clone(&self.version_tx);

        tokio::spawn(async move {
            let outcome = fetch.await;
            if let Err(err) = &outcome {
                tracing::warn!(key = %key, error = %err, "fetch failed");
            } else {
                tracing::debug!(key = %key, "fetch succeeded");
            }

            let now = clock.now();
            let version = {
                let mut state = lock(&state);
                if state.generation != generation {
                    tracing::debug!(key = %key, "cache cleared while fetching, dropping result");
                    return;
                }
                state.version += 1;
                let version = state.version;
                if let Some(entry) = state.entries.get_mut(&key) {
                    entry.apply(outcome, now, keep_previous);
                }
                version
            };
            version_tx.send_replace(version);
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
