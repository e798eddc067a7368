//! Read-through cache over the admin API.
#![allow(dead_code)]
//!
//! The export dialog re-reads the same payload for preview, download and
//! print, and the surrounding list views share the client. Entries are
//! keyed by endpoint path, stored as serialized JSON, and expire after a
//! fixed TTL. Mutations invalidate their keys explicitly rather than
//! waiting the TTL out.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

/// List-view keys invalidated after a successful invoice generation.
pub const INVOICES_KEY: &str = "invoices";
pub const TIMESHEETS_KEY: &str = "timesheets";
pub const BIWEEKLY_TIMESHEETS_KEY: &str = "biweekly-timesheets";

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// TTL cache storing JSON-serialized payloads keyed by endpoint path.
pub struct ApiCache {
    ttl: Duration,
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl ApiCache {
    pub fn new(ttl: Duration) -> Self {
        ApiCache {
            ttl,
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached payload for `key`, or `None` on a miss, an
    /// expired entry, or a payload that no longer decodes as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let expired = {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if entry.is_expired() => true,
                Some(entry) => return serde_json::from_str(&entry.value).ok(),
                None => return None,
            }
        };
        if expired {
            self.store.write().await.remove(key);
        }
        None
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                debug!("Skipping cache write for {key}: {e}");
                return;
            }
        };
        let entry = CacheEntry {
            value: serialized,
            expires_at: Instant::now() + self.ttl,
        };
        self.store.write().await.insert(key.to_string(), entry);
    }

    /// Read-through access: returns the cached payload for `key`, or runs
    /// `fetch` and caches its result before returning it. A failed fetch
    /// caches nothing.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }
        let fresh = fetch().await?;
        self.put(key, &fresh).await;
        Ok(fresh)
    }

    pub async fn invalidate(&self, key: &str) {
        self.store.write().await.remove(key);
    }

    pub async fn invalidate_many(&self, keys: &[&str]) {
        let mut store = self.store.write().await;
        for key in keys {
            store.remove(*key);
        }
    }

    /// Number of live (possibly expired, not yet swept) entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for ApiCache {
    fn default() -> Self {
        ApiCache::new(DEFAULT_TTL)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
