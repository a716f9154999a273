//! In-process query cache.
//!
//! One instance is built at application start and handed to whoever needs
//! it. Per key: at most one fetch in flight, results reused while fresh,
//! failures retried and never cached. Stale idle entries are dropped when a
//! new key arrives, and the map never holds more than `max_entries` keys.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How long a result is served without refetching.
    pub stale_time: Duration,
    /// Extra attempts after a failed fetch.
    pub retry: u32,
    /// Upper bound on cached keys; the oldest idle entry goes first.
    pub max_entries: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            retry: 1,
            max_entries: 1024,
        }
    }
}

struct CachedQuery {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

type Slot = Arc<Mutex<Option<CachedQuery>>>;

pub struct QueryClient {
    config: QueryConfig,
    slots: RwLock<HashMap<String, Slot>>,
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    async fn slot(&self, key: &str) -> Slot {
        if let Some(slot) = self.slots.read().await.get(key) {
            return slot.clone();
        }

        let mut slots = self.slots.write().await;
        if let Some(slot) = slots.get(key) {
            return slot.clone();
        }

        self.evict(&mut slots);

        let slot = Slot::default();
        slots.insert(key.to_string(), slot.clone());
        slot
    }

    /// Make room for one more key. Entries someone is fetching or waiting on
    /// are never touched.
    fn evict(&self, slots: &mut HashMap<String, Slot>) {
        let stale_time = self.config.stale_time;
        let before = slots.len();

        slots.retain(|_, slot| match idle_entry_age(slot) {
            Some(age) => age.is_some_and(|age| age < stale_time),
            None => true,
        });

        while !slots.is_empty() && slots.len() >= self.config.max_entries {
            let oldest = slots
                .iter()
                .filter_map(|(key, slot)| Some((key, idle_entry_age(slot)??)))
                .max_by_key(|(_, age)| *age)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    slots.remove(&key);
                }
                None => break,
            }
        }

        let evicted = before - slots.len();
        if evicted > 0 {
            tracing::trace!(evicted, remaining = slots.len(), "Query cache entries evicted");
        }
    }

    /// Return the cached value for `key` if fresh, otherwise run `fetcher`.
    ///
    /// Concurrent callers for the same key wait for the running fetch and
    /// then read its result instead of issuing their own.
    pub async fn fetch_query<T, E, F, Fut>(&self, key: &str, fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.config.stale_time {
                if let Some(value) = cached.value.downcast_ref::<T>() {
                    tracing::trace!(key, "Query served from cache");
                    return Ok(value.clone());
                }
            }
        }

        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => {
                    *entry = Some(CachedQuery {
                        value: Arc::new(value.clone()),
                        fetched_at: Instant::now(),
                    });
                    return Ok(value);
                }
                Err(e) if attempt < self.config.retry => {
                    attempt += 1;
                    tracing::debug!(key, attempt, error = %e, "Query failed, retrying");
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "Query failed");
                    return Err(e);
                }
            }
        }
    }

    /// Drop the cached value for `key`; the next fetch hits the network.
    pub async fn invalidate(&self, key: &str) {
        self.slots.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.slots.write().await.clear();
    }
}

/// Age of the cached value when nobody else holds the slot. `None` when the
/// slot is in use; `Some(None)` when it is idle but holds no value.
fn idle_entry_age(slot: &Slot) -> Option<Option<Duration>> {
    if Arc::strong_count(slot) > 1 {
        return None;
    }
    let entry = slot.try_lock().ok()?;
    Some(entry.as_ref().map(|cached| cached.fetched_at.elapsed()))
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}
