//! Process-local cache. Entries vanish on restart, which is acceptable for
//! token revocations: a restart with a new JWT secret invalidates tokens anyway.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::Cache;

struct CacheEntry {
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-memory cache over a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn set(&self, key: &str, ttl: Option<Duration>) {
        let now = Instant::now();
        let mut store = self.store.write().await;

        // expired entries are only ever dropped here
        store.retain(|_, entry| entry.is_live(now));
        store.insert(
            key.to_string(),
            CacheEntry {
                expires_at: ttl.map(|d| now + d),
            },
        );
    }

    async fn exists(&self, key: &str) -> bool {
        let store = self.store.read().await;
        store
            .get(key)
            .is_some_and(|entry| entry.is_live(Instant::now()))
    }
}
