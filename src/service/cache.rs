use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::service::ports::ShuffleRecord;

/// Bounded, TTL-expiring lookup of recent shuffle records by id.
///
/// Owned by a service instance rather than living in a global, so two
/// services never share entries.
#[derive(Clone)]
pub struct ShuffleCache {
    inner: Cache<String, Arc<ShuffleRecord>>,
}

impl ShuffleCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        ShuffleCache {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl())
    }

    pub fn insert(&self, record: ShuffleRecord) {
        debug!(shuffle_id = %record.shuffle_id, "cache insert");
        self.inner.insert(record.shuffle_id.clone(), Arc::new(record));
    }

    pub fn get(&self, shuffle_id: &str) -> Option<Arc<ShuffleRecord>> {
        self.inner.get(shuffle_id)
    }

    pub fn invalidate(&self, shuffle_id: &str) {
        self.inner.invalidate(shuffle_id);
    }
}

impl std::fmt::Debug for ShuffleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuffleCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
