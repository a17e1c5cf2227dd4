//! Query/mutation cache
//!
//! [`QueryClient`] is the session-wide cache service. Reads go through
//! [`QueryClient::fetch_query`], which serves fresh entries from memory (or the
//! optional SQLite tier), and otherwise runs the fetch under its retry policy.
//! Concurrent reads of the same key share a single in-flight request.
//!
//! Writes go through [`QueryClient::mutate`]; its `on_success` hook runs only
//! after the write succeeded, so a failed mutation never touches cached reads.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::DEFAULT_STALE_TIME;
use super::key::{KeyFilter, QueryKey};
use super::retry::RetryPolicy;
use super::storage::CacheStorage;
use crate::error::{ApiError, Error, Result};

/// Per-read options.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Cached values younger than this are served without a network call
    pub stale_time: Duration,
    pub retry: RetryPolicy,
    /// Skip the cache and always fetch
    pub force: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retry: RetryPolicy::DEFAULT,
            force: false,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Freshness information about a cached read.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryState {
    pub fetched_at: DateTime<Utc>,
    pub invalidated: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: DateTime<Utc>,
    invalidated: bool,
}

impl CacheEntry {
    fn new(value: Value) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
            invalidated: false,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && is_younger_than(self.fetched_at, stale_time)
    }
}

fn is_younger_than(fetched_at: DateTime<Utc>, stale_time: Duration) -> bool {
    match Utc::now().signed_duration_since(fetched_at).to_std() {
        Ok(age) => age < stale_time,
        // fetched_at lies in the future (clock adjustment)
        Err(_) => !stale_time.is_zero(),
    }
}

type SharedFetch = Shared<BoxFuture<'static, std::result::Result<Value, ApiError>>>;

struct InFlight {
    id: u64,
    future: SharedFetch,
}

struct Inner {
    default_stale_time: Duration,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    in_flight: Mutex<HashMap<QueryKey, InFlight>>,
    next_id: AtomicU64,
    storage: Option<Mutex<CacheStorage>>,
}

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    /// Record the outcome of fetch `id`, unless it was detached meanwhile.
    fn complete(&self, key: &QueryKey, id: u64, value: &Value, stale_time: Duration) {
        // Lock order: in_flight, then entries
        let mut in_flight = lock(&self.in_flight);
        if !in_flight.get(key).is_some_and(|f| f.id == id) {
            debug!("Discarding result of detached query {}", key);
            return;
        }
        in_flight.remove(key);

        let entry = CacheEntry::new(value.clone());
        self.persist(key, &entry, stale_time);
        lock(&self.entries).insert(key.clone(), entry);
    }

    fn forget(&self, key: &QueryKey, id: u64) {
        let mut in_flight = lock(&self.in_flight);
        if in_flight.get(key).is_some_and(|f| f.id == id) {
            in_flight.remove(key);
        }
    }

    fn persist(&self, key: &QueryKey, entry: &CacheEntry, ttl: Duration) {
        let Some(ref storage) = self.storage else {
            return;
        };
        match serde_json::to_string(&entry.value) {
            Ok(data) => {
                if let Err(e) = lock(storage).put(key, &data, entry.fetched_at, ttl) {
                    warn!("Failed to persist {}: {}", key, e);
                }
            }
            Err(e) => warn!("Failed to encode {}: {}", key, e),
        }
    }

    fn load_persisted(&self, key: &QueryKey, stale_time: Duration) -> Option<CacheEntry> {
        let storage = self.storage.as_ref()?;
        let stored = match lock(storage).get(key) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!("Failed to read {} from cache: {}", key, e);
                return None;
            }
        };
        if !is_younger_than(stored.fetched_at, stale_time) {
            return None;
        }
        let value = serde_json::from_str(&stored.data).ok()?;
        Some(CacheEntry {
            value,
            fetched_at: stored.fetched_at,
            invalidated: false,
        })
    }

    /// Detach matching in-flight fetches; their results are not stored.
    fn detach(&self, filter: &KeyFilter) -> usize {
        let mut in_flight = lock(&self.in_flight);
        let before = in_flight.len();
        in_flight.retain(|key, _| !filter.matches(key));
        before - in_flight.len()
    }
}

/// Session-wide query cache. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
    /// Reads through `options()` bypass cached values
    refresh: bool,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl QueryClient {
    /// In-memory cache only.
    pub fn new(default_stale_time: Duration) -> Self {
        Self::build(default_stale_time, None)
    }

    /// In-memory cache backed by a persistent SQLite tier.
    pub fn persistent(default_stale_time: Duration, storage: CacheStorage) -> Self {
        Self::build(default_stale_time, Some(Mutex::new(storage)))
    }

    fn build(default_stale_time: Duration, storage: Option<Mutex<CacheStorage>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                default_stale_time,
                entries: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                storage,
            }),
            refresh: false,
        }
    }

    /// Make reads through `options()` skip cached values. Fetched results
    /// are still stored for later readers.
    pub fn refreshing(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Read options with this client's default stale time.
    pub fn options(&self) -> QueryOptions {
        QueryOptions::default()
            .stale_time(self.inner.default_stale_time)
            .force(self.refresh)
    }

    pub fn is_persistent(&self) -> bool {
        self.inner.storage.is_some()
    }

    /// Cached read.
    ///
    /// Returns the cached value when it is fresh, otherwise joins the
    /// in-flight request for `key` or starts one running `fetch` under
    /// `options.retry`. Every caller of a shared request gets the same result.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetch: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if !options.force
            && let Some(value) = self.fresh_value(&key, options.stale_time)
        {
            debug!("Cache hit: {}", key);
            return Ok(serde_json::from_value(value)?);
        }

        let shared = self.join_or_start(key, options, fetch);
        let value = shared.await.map_err(Error::Api)?;
        Ok(serde_json::from_value(value)?)
    }

    fn fresh_value(&self, key: &QueryKey, stale_time: Duration) -> Option<Value> {
        {
            let entries = lock(&self.inner.entries);
            if let Some(entry) = entries.get(key) {
                return entry
                    .is_fresh(stale_time)
                    .then(|| entry.value.clone());
            }
        }

        let entry = self.inner.load_persisted(key, stale_time)?;
        let value = entry.value.clone();
        lock(&self.inner.entries).insert(key.clone(), entry);
        Some(value)
    }

    fn join_or_start<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetch: F) -> SharedFetch
    where
        T: Serialize + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut in_flight = lock(&self.inner.in_flight);
        if let Some(existing) = in_flight.get(&key) {
            debug!("Joining in-flight query {}", key);
            return existing.future.clone();
        }

        debug!("Cache miss: {}", key);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task_key = key.clone();

        let future = async move {
            let result = options
                .retry
                .run(|| fetch())
                .await
                .and_then(|data| Ok(serde_json::to_value(data)?));

            if let Some(inner) = weak.upgrade() {
                match result {
                    Ok(ref value) => inner.complete(&task_key, id, value, options.stale_time),
                    Err(_) => inner.forget(&task_key, id),
                }
            }

            result.map_err(ApiError::from)
        }
        .boxed()
        .shared();

        in_flight.insert(
            key,
            InFlight {
                id,
                future: future.clone(),
            },
        );
        future
    }

    /// Run a write under `retry`; on success run `on_success` before returning.
    pub async fn mutate<T, F, Fut, S>(&self, retry: RetryPolicy, mutation: F, on_success: S) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        S: FnOnce(&QueryClient, &T),
    {
        let value = retry.run(mutation).await?;
        on_success(self, &value);
        Ok(value)
    }

    /// Mark matching entries stale so the next read refetches.
    ///
    /// Matching in-flight fetches are detached, as they may predate the
    /// change that caused the invalidation.
    pub fn invalidate_queries(&self, filter: &KeyFilter) -> usize {
        let detached = self.inner.detach(filter);

        let mut invalidated = 0;
        for (key, entry) in lock(&self.inner.entries).iter_mut() {
            if filter.matches(key) {
                entry.invalidated = true;
                invalidated += 1;
            }
        }

        if let Some(ref storage) = self.inner.storage
            && let Err(e) = lock(storage).delete_matching(filter)
        {
            warn!("Failed to invalidate persisted queries: {}", e);
        }

        debug!(
            "Invalidated {} queries ({} in flight) matching {:?}",
            invalidated, detached, filter
        );
        invalidated
    }

    /// Apply `updater` to the cached value of every matching entry.
    ///
    /// Updated entries count as freshly fetched in both tiers. Matching
    /// in-flight fetches are detached so they cannot overwrite the update.
    /// Entries whose value does not decode as `T` are left alone.
    /// Returns the number of in-memory entries updated.
    pub fn set_queries_data<T, U>(&self, filter: &KeyFilter, updater: U) -> usize
    where
        T: Serialize + DeserializeOwned,
        U: Fn(T) -> T,
    {
        let apply = |value: Value| -> Option<Value> {
            let typed = serde_json::from_value::<T>(value).ok()?;
            serde_json::to_value(updater(typed)).ok()
        };

        let detached = self.inner.detach(filter);
        let now = Utc::now();

        let mut updated = 0;
        for (key, entry) in lock(&self.inner.entries).iter_mut() {
            if !filter.matches(key) {
                continue;
            }
            match apply(entry.value.clone()) {
                Some(value) => {
                    *entry = CacheEntry {
                        value,
                        fetched_at: now,
                        invalidated: false,
                    };
                    updated += 1;
                }
                None => debug!("Skipping update of {}: unexpected shape", key),
            }
        }

        if let Some(ref storage) = self.inner.storage {
            let ttl = self.inner.default_stale_time;
            let result = lock(storage).update_matching(filter, now, ttl, |data| {
                let value = serde_json::from_str(data).ok()?;
                serde_json::to_string(&apply(value)?).ok()
            });
            if let Err(e) = result {
                warn!("Failed to update persisted queries: {}", e);
            }
        }

        debug!(
            "Updated {} queries ({} in flight) matching {:?}",
            updated, detached, filter
        );
        updated
    }

    /// Cached value for `key`, fresh or not.
    #[allow(dead_code)]
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = match lock(&self.inner.entries).get(key) {
            Some(entry) => entry.value.clone(),
            None => self.inner.load_persisted(key, Duration::MAX)?.value,
        };
        serde_json::from_value(value).ok()
    }

    /// Store `data` under `key` as freshly fetched.
    #[allow(dead_code)]
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, data: &T) -> Result<()> {
        let entry = CacheEntry::new(serde_json::to_value(data)?);
        self.inner
            .persist(key, &entry, self.inner.default_stale_time);
        lock(&self.inner.entries).insert(key.clone(), entry);
        Ok(())
    }

    #[allow(dead_code)]
    pub fn query_state(&self, key: &QueryKey) -> Option<QueryState> {
        lock(&self.inner.entries).get(key).map(|e| QueryState {
            fetched_at: e.fetched_at,
            invalidated: e.invalidated,
        })
    }

    /// Number of matching requests currently in flight.
    #[allow(dead_code)]
    pub fn is_fetching(&self, filter: &KeyFilter) -> usize {
        lock(&self.inner.in_flight)
            .keys()
            .filter(|key| filter.matches(key))
            .count()
    }

    /// Detach matching in-flight requests.
    ///
    /// Callers already waiting still receive the outcome, but it is not
    /// stored and later reads start a new request.
    #[allow(dead_code)]
    pub fn cancel_queries(&self, filter: &KeyFilter) -> usize {
        self.inner.detach(filter)
    }

    /// Drop matching entries from every tier.
    #[allow(dead_code)]
    pub fn remove_queries(&self, filter: &KeyFilter) -> usize {
        self.inner.detach(filter);

        let removed = {
            let mut entries = lock(&self.inner.entries);
            let before = entries.len();
            entries.retain(|key, _| !filter.matches(key));
            before - entries.len()
        };

        if let Some(ref storage) = self.inner.storage
            && let Err(e) = lock(storage).delete_matching(filter)
        {
            warn!("Failed to remove persisted queries: {}", e);
        }

        removed
    }

    /// Drop every in-memory entry and in-flight request.
    #[allow(dead_code)]
    pub fn clear(&self) {
        lock(&self.inner.in_flight).clear();
        lock(&self.inner.entries).clear();
    }
}
