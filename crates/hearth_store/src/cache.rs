//! Bounded in-memory read cache.

use moka::sync::Cache;
use std::sync::Arc;

/// Byte-bounded cache of record contents.
///
/// A zero budget disables caching entirely: nothing is stored, not even
/// empty records. Records larger than the budget are never cached.
#[derive(Debug)]
pub(crate) struct ReadCache {
    budget: u64,
    entries: Option<Cache<String, Arc<[u8]>>>,
}

impl ReadCache {
    pub(crate) fn new(budget: u64) -> Self {
        let entries = (budget > 0).then(|| {
            Cache::builder()
                .max_capacity(budget)
                .weigher(|_key: &String, value: &Arc<[u8]>| {
                    u32::try_from(value.len()).unwrap_or(u32::MAX)
                })
                .build()
        });
        Self { budget, entries }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        self.entries.as_ref()?.get(key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains_key(key))
    }

    pub(crate) fn insert(&self, key: &str, value: &[u8]) {
        let Some(entries) = &self.entries else {
            return;
        };
        if value.len() as u64 > self.budget {
            return;
        }
        entries.insert(key.to_string(), Arc::from(value));
    }

    pub(crate) fn remove(&self, key: &str) {
        if let Some(entries) = &self.entries {
            entries.invalidate(key);
        }
    }

    /// Bytes currently held, after pending evictions are applied.
    pub(crate) fn used(&self) -> u64 {
        self.entries.as_ref().map_or(0, |entries| {
            entries.run_pending_tasks();
            entries.weighted_size()
        })
    }
}
