use crate::domain_model::{CacheTag, QueryKey};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::watch;

struct CacheEntry {
    value: Option<Value>,
    stale: bool,
    generation: watch::Sender<u64>,
}

impl CacheEntry {
    fn empty() -> Self {
        let (generation, _) = watch::channel(0);
        CacheEntry {
            value: None,
            stale: true,
            generation,
        }
    }
}

/// Client-side cache of query results with a tag dependency map
/// (tag -> keys that provide it). Invalidating a tag marks every key under it
/// stale and wakes its subscribers; the next read refetches.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    providers: DashMap<CacheTag, HashSet<QueryKey>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_fresh(&self, key: &QueryKey) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.stale {
            None
        } else {
            entry.value.clone()
        }
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_none_or(|e| e.stale)
    }

    /// Registers `key` under `tags` before its fetch goes out and returns the
    /// invalidation generation the fetch started from.
    pub fn begin_fetch(&self, key: &QueryKey, tags: &[CacheTag]) -> u64 {
        for tag in tags {
            self.providers.entry(*tag).or_default().insert(key.clone());
        }
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::empty);
        let generation = *entry.generation.borrow();
        generation
    }

    /// Stores a fetched value. It only counts as fresh if no invalidation hit
    /// the key since `started`; otherwise it stays stale and the next read
    /// refetches. Returns whether the value was stored fresh.
    pub fn complete_fetch(&self, key: &QueryKey, value: Value, started: u64) -> bool {
        let mut entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::empty);
        let current = *entry.generation.borrow();
        entry.value = Some(value);
        entry.stale = current != started;
        !entry.stale
    }

    pub fn store(&self, key: &QueryKey, tags: &[CacheTag], value: Value) {
        let started = self.begin_fetch(key, tags);
        self.complete_fetch(key, value, started);
    }

    /// Returns the number of entries marked stale.
    pub fn invalidate(&self, tags: &[CacheTag]) -> usize {
        let mut keys: HashSet<QueryKey> = HashSet::new();
        for tag in tags {
            if let Some(providers) = self.providers.get(tag) {
                keys.extend(providers.iter().cloned());
            }
        }

        for key in &keys {
            if let Some(mut entry) = self.entries.get_mut(key) {
                entry.stale = true;
                entry.generation.send_modify(|g| *g += 1);
            }
        }
        keys.len()
    }

    /// The receiver sees a new value each time the key is invalidated.
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<u64> {
        self.entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::empty)
            .generation
            .subscribe()
    }

    pub fn providers_of(&self, tag: CacheTag) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .providers
            .get(&tag)
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Drops all cached values; subscribers are woken so they refetch.
    pub fn clear(&self) {
        for mut entry in self.entries.iter_mut() {
            entry.value = None;
            entry.stale = true;
            entry.generation.send_modify(|g| *g += 1);
        }
    }
}
