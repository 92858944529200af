//! Plan cache
//!
//! Generated plan lists are memoised per request key for a fixed TTL. The
//! cache is handed to the planner as a [`PlanCache`] trait object; there is
//! no process-wide instance.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::config::{CacheBackend, CacheConfig};
use crate::models::TravelPlan;

/// Get/set contract for cached plan lists
#[async_trait]
pub trait PlanCache: Send + Sync {
    /// Fresh plans stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Vec<TravelPlan>>>;

    /// Store `plans` under `key` for `ttl`
    async fn set(&self, key: &str, plans: &[TravelPlan], ttl: Duration) -> Result<()>;
}

/// Build the cache selected in configuration
pub fn from_config(config: &CacheConfig) -> Result<Box<dyn PlanCache>> {
    match config.backend {
        CacheBackend::Persistent => Ok(Box::new(PersistentCache::open(&config.location)?)),
        CacheBackend::Memory => Ok(Box::new(MemoryCache::new())),
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

/// Cache persisted in a fjall keyspace, entries encoded with postcard
pub struct PersistentCache {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PersistentCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("plans", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = SystemTime::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn fetch<T: DeserializeOwned + Send + 'static>(
        &self,
        key: &str,
    ) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        if now < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

#[async_trait]
impl PlanCache for PersistentCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<TravelPlan>>> {
        self.fetch(key).await
    }

    async fn set(&self, key: &str, plans: &[TravelPlan], ttl: Duration) -> Result<()> {
        self.put(key, plans.to_vec(), ttl).await
    }
}

/// In-process cache, lost on restart
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, Vec<TravelPlan>)>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<TravelPlan>>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?;
        match entries.get(key) {
            Some((expires_at, plans)) if Instant::now() < *expires_at => Ok(Some(plans.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, plans: &[TravelPlan], ttl: Duration) -> Result<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?;
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?
            .insert(key.to_string(), (expires_at, plans.to_vec()));
        Ok(())
    }
}
