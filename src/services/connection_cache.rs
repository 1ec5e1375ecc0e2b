// Connection cache: memoizes one live handle per (backend, credentials)
// tuple with passive TTL expiry, so a chat session does not reconnect on
// every turn.
use crate::api::middleware::AppError;
use crate::models::{BackendKind, Credentials};
use crate::services::database::{ConnectionFactory, ConnectionHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default handle time-to-live: 2 hours. Bounds staleness so credential
/// rotations and backend changes eventually take effect.
pub const DEFAULT_HANDLE_TTL_SECS: u64 = 2 * 60 * 60;

type CacheKey = (BackendKind, Credentials);

struct CachedHandle {
    handle: ConnectionHandle,
    created_at: Instant,
}

impl CachedHandle {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Cache of live database handles keyed by (backend kind, credentials).
///
/// Expiry is checked on access, never swept in the background. Two sessions
/// racing on the same cold key may each connect once; the last insert wins,
/// which is an acceptable at-worst-once extra connection.
pub struct ConnectionCache {
    entries: Arc<RwLock<HashMap<CacheKey, CachedHandle>>>,
    factory: ConnectionFactory,
    ttl: Duration,
}

impl ConnectionCache {
    pub fn new(factory: ConnectionFactory) -> Self {
        Self::with_ttl(factory, Duration::from_secs(DEFAULT_HANDLE_TTL_SECS))
    }

    pub fn with_ttl(factory: ConnectionFactory, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            factory,
            ttl,
        }
    }

    /// Return the cached handle for this key, or connect and cache a new
    /// one if none exists or the cached entry has outlived its TTL.
    pub async fn get_or_create(
        &self,
        kind: BackendKind,
        credentials: &Credentials,
    ) -> Result<ConnectionHandle, AppError> {
        let key = (kind, credentials.clone());

        // Fast path: fresh entry under a read lock
        {
            let entries = self.entries.read().await;
            if let Some(cached) = entries.get(&key) {
                if !cached.is_expired(self.ttl) {
                    tracing::debug!("Reusing cached {} handle", kind);
                    return Ok(cached.handle.clone());
                }
            }
        }

        // Slow path: connect without holding the lock, then insert. A
        // concurrent connect for the same key is tolerated rather than
        // serialized.
        let handle = self.factory.connect(kind, credentials).await?;

        let mut entries = self.entries.write().await;
        match entries.get(&key) {
            // Another task won the race with a still-fresh handle; use it
            Some(cached) if !cached.is_expired(self.ttl) => {
                tracing::debug!("Handle created by another task for {}", kind);
                Ok(cached.handle.clone())
            }
            _ => {
                tracing::info!("Caching new {} handle (ttl: {:?})", kind, self.ttl);
                entries.insert(
                    key,
                    CachedHandle {
                        handle: handle.clone(),
                        created_at: Instant::now(),
                    },
                );
                Ok(handle)
            }
        }
    }

    /// Drop the cached handle for a key, if any.
    pub async fn remove(&self, kind: BackendKind, credentials: &Credentials) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(&(kind, credentials.clone())).is_some()
    }

    /// Number of cached handles, expired entries included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
