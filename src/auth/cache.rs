//! Short-lived identity cache keyed by email.
//!
//! Entries are serialized snapshots rather than full user records, so a
//! remote cache shared between processes (or implementations in another
//! language) can read them. Entries are stale-tolerant: a just-flipped
//! `confirmed` bit or a rotated refresh token may lag by up to the TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;

/// How long a cached identity stays valid.
pub const USER_CACHE_TTL: Duration = Duration::from_secs(900);

/// Bumped whenever the snapshot field list changes; readers treat an
/// unknown version as a miss.
const SNAPSHOT_VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
    #[error("Cache codec error: {0}")]
    Codec(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    v: u8,
    #[serde(flatten)]
    user: CurrentUser,
}

/// Read errors degrade to a miss at the call site; authentication must not
/// go down because the cache did.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, email: &str) -> Result<Option<CurrentUser>, CacheError>;

    async fn put(&self, email: &str, user: &CurrentUser, ttl: Duration) -> Result<(), CacheError>;
}

#[derive(Debug)]
struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

/// In-process implementation backing single-node deployments and tests.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn get(&self, email: &str) -> Result<Option<CurrentUser>, CacheError> {
        let entries = self.entries.read();
        let Some(entry) = entries.get(email) else {
            return Ok(None);
        };
        if Instant::now() >= entry.expires_at {
            return Ok(None);
        }

        let snapshot: Snapshot =
            serde_json::from_str(&entry.payload).map_err(|e| CacheError::Codec(e.to_string()))?;
        if snapshot.v != SNAPSHOT_VERSION {
            return Ok(None);
        }
        Ok(Some(snapshot.user))
    }

    async fn put(&self, email: &str, user: &CurrentUser, ttl: Duration) -> Result<(), CacheError> {
        let snapshot = Snapshot {
            v: SNAPSHOT_VERSION,
            user: user.clone(),
        };
        let payload =
            serde_json::to_string(&snapshot).map_err(|e| CacheError::Codec(e.to_string()))?;

        self.entries.write().insert(
            email.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "deadpool".to_string(),
            email: "deadpool@example.com".to_string(),
            confirmed: true,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn get_returns_what_put_stored() {
        let cache = MemorySessionCache::new();
        let user = sample_user();

        cache
            .put(&user.email, &user, Duration::from_secs(60))
            .await
            .expect("put");
        let cached = cache.get(&user.email).await.expect("get");

        assert_eq!(cached, Some(user));
    }

    #[tokio::test]
    async fn miss_on_unknown_email() {
        let cache = MemorySessionCache::new();

        assert_eq!(cache.get("nobody@example.com").await.expect("get"), None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MemorySessionCache::new();
        let user = sample_user();

        cache
            .put(&user.email, &user, Duration::from_millis(10))
            .await
            .expect("put");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.get(&user.email).await.expect("get"), None);
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_entry() {
        let cache = MemorySessionCache::new();
        let mut user = sample_user();

        cache
            .put(&user.email, &user, Duration::from_secs(60))
            .await
            .expect("put");
        user.confirmed = false;
        cache
            .put(&user.email, &user, Duration::from_secs(60))
            .await
            .expect("put");

        let cached = cache.get(&user.email).await.expect("get").expect("hit");
        assert!(!cached.confirmed);
    }

    #[tokio::test]
    async fn unknown_snapshot_version_reads_as_miss() {
        let cache = MemorySessionCache::new();
        let user = sample_user();

        let stale = Snapshot { v: 0, user };
        cache.entries.write().insert(
            "deadpool@example.com".to_string(),
            CacheEntry {
                payload: serde_json::to_string(&stale).unwrap(),
                expires_at: Instant::now() + Duration::from_secs(60),
            },
        );

        assert_eq!(cache.get("deadpool@example.com").await.expect("get"), None);
    }
}
