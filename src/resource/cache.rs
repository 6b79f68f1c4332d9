use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::resource::Tag;

struct Entry {
    value: Value,
    tags: Vec<Tag>,
    stored_at: Instant,
}

/// Query responses keyed by request identity, dropped by age or by tag.
///
/// Every invalidation or clear starts a new generation. A response fetched
/// in an earlier generation is refused by [`QueryCache::insert_since`], so
/// an answer that raced a mutation or a logout never lands in the cache.
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
    // Only changed while `entries` is locked.
    generation: AtomicU64,
}

impl QueryCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh response for `key`. Stale entries are evicted on lookup.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn insert(&self, key: impl Into<String>, value: Value, tags: Vec<Tag>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.lock();
        Self::store(&mut entries, key.into(), value, tags);
    }

    /// Insert unless the cache was invalidated or cleared after `generation`
    /// was read. Returns whether the value was stored.
    pub fn insert_since(
        &self,
        generation: u64,
        key: impl Into<String>,
        value: Value,
        tags: Vec<Tag>,
    ) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let mut entries = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        Self::store(&mut entries, key.into(), value, tags);
        true
    }

    fn store(entries: &mut HashMap<String, Entry>, key: String, value: Value, tags: Vec<Tag>) {
        entries.insert(
            key,
            Entry {
                value,
                tags,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry providing a tag matched by `tags`. Returns the number
    /// of dropped entries.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        if tags.is_empty() {
            return 0;
        }
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        let before = entries.len();
        entries.retain(|_, entry| {
            !tags
                .iter()
                .any(|tag| entry.tags.iter().any(|provided| tag.invalidates(provided)))
        });
        before - entries.len()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
