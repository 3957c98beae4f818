//! Reference data cache with a fixed TTL
//!
//! A cache is EMPTY until its first successful fetch, FRESH for `ttl` after
//! it, and STALE afterwards. Reads on EMPTY or STALE refetch the whole
//! mapping and replace it. A failed refetch keeps serving the previous
//! snapshot. Snapshots are persisted so a restart starts FRESH when the
//! stored copy is still young enough.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::storage::SnapshotStorage;
use crate::client::{Credential, TornApi};
use crate::error::Result;

/// Turns an upstream payload into the id-keyed mapping
pub type Parser<E> = fn(Value) -> Result<HashMap<u64, E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

/// Snapshot summary for status output
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub name: &'static str,
    pub entries: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub fresh: bool,
}

struct Snapshot<E> {
    entries: Arc<HashMap<u64, E>>,
    last_updated: Option<DateTime<Utc>>,
}

impl<E> Snapshot<E> {
    fn empty() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
            last_updated: None,
        }
    }

    fn state_at(&self, now: DateTime<Utc>, ttl: Duration) -> CacheState {
        match self.last_updated {
            _ if self.entries.is_empty() => CacheState::Empty,
            None => CacheState::Empty,
            Some(at) => {
                let age = (now - at).to_std().unwrap_or(Duration::ZERO);
                if age < ttl {
                    CacheState::Fresh
                } else {
                    CacheState::Stale
                }
            }
        }
    }
}

/// Process-scoped cache of one reference catalog.
///
/// Construct one per catalog and share it behind an `Arc`.
pub struct ReferenceCache<E> {
    name: &'static str,
    path: String,
    parse: Parser<E>,
    ttl: Duration,
    api: Arc<dyn TornApi>,
    storage: Option<Arc<SnapshotStorage>>,
    // async mutex: concurrent readers of a stale cache wait for one refetch
    snapshot: Mutex<Snapshot<E>>,
}

impl<E> ReferenceCache<E>
where
    E: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create the cache, loading any persisted snapshot from `storage`.
    pub fn new(
        name: &'static str,
        path: impl Into<String>,
        parse: Parser<E>,
        ttl: Duration,
        api: Arc<dyn TornApi>,
        storage: Option<Arc<SnapshotStorage>>,
    ) -> Self {
        let snapshot = storage
            .as_deref()
            .and_then(|s| Self::load_persisted(name, s))
            .unwrap_or_else(Snapshot::empty);

        Self {
            name,
            path: path.into(),
            parse,
            ttl,
            api,
            storage,
            snapshot: Mutex::new(snapshot),
        }
    }

    fn load_persisted(name: &str, storage: &SnapshotStorage) -> Option<Snapshot<E>> {
        let stored = match storage.load(name) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!("Failed to read {} snapshot: {}", name, e);
                return None;
            }
        };

        match serde_json::from_str::<HashMap<u64, E>>(&stored.data) {
            Ok(entries) => {
                debug!(
                    "Loaded {} snapshot: {} entries from {}",
                    name,
                    entries.len(),
                    stored.updated_at
                );
                Some(Snapshot {
                    entries: Arc::new(entries),
                    last_updated: Some(stored.updated_at),
                })
            }
            Err(e) => {
                warn!("Discarding unreadable {} snapshot: {}", name, e);
                None
            }
        }
    }

    /// Current mapping, refetching first when EMPTY or STALE.
    pub async fn entries(&self, credential: &Credential) -> Arc<HashMap<u64, E>> {
        self.entries_at(credential, Utc::now()).await
    }

    /// As [`Self::entries`], evaluated at `now`.
    pub async fn entries_at(&self, credential: &Credential, now: DateTime<Utc>) -> Arc<HashMap<u64, E>> {
        let mut snapshot = self.snapshot.lock().await;
        if snapshot.state_at(now, self.ttl) == CacheState::Fresh {
            return Arc::clone(&snapshot.entries);
        }

        match self.fetch(credential).await {
            Ok(entries) if !entries.is_empty() => {
                info!("Refreshed {} cache: {} entries", self.name, entries.len());
                snapshot.entries = Arc::new(entries);
                snapshot.last_updated = Some(now);
                self.persist(&snapshot);
            }
            Ok(_) => {
                warn!(
                    "{} refresh returned no entries, keeping {} cached",
                    self.name,
                    snapshot.entries.len()
                );
            }
            Err(e) => {
                warn!(
                    "{} refresh failed, serving {} cached entries: {}",
                    self.name,
                    snapshot.entries.len(),
                    e
                );
            }
        }

        Arc::clone(&snapshot.entries)
    }

    pub async fn state_at(&self, now: DateTime<Utc>) -> CacheState {
        self.snapshot.lock().await.state_at(now, self.ttl)
    }

    pub async fn status(&self) -> CacheStatus {
        let snapshot = self.snapshot.lock().await;
        CacheStatus {
            name: self.name,
            entries: snapshot.entries.len(),
            last_updated: snapshot.last_updated,
            fresh: snapshot.state_at(Utc::now(), self.ttl) == CacheState::Fresh,
        }
    }

    /// Drop the in-memory snapshot; the next read refetches.
    pub async fn invalidate(&self) {
        *self.snapshot.lock().await = Snapshot::empty();
    }

    async fn fetch(&self, credential: &Credential) -> Result<HashMap<u64, E>> {
        let payload = self.api.request(&self.path, credential).await?;
        (self.parse)(payload)
    }

    fn persist(&self, snapshot: &Snapshot<E>) {
        let (Some(storage), Some(updated_at)) = (self.storage.as_deref(), snapshot.last_updated) else {
            return;
        };

        let result = serde_json::to_string(&*snapshot.entries)
            .map_err(crate::error::Error::from)
            .and_then(|data| {
                storage
                    .save(self.name, &data, snapshot.entries.len(), updated_at)
                    .map_err(Into::into)
            });
        if let Err(e) = result {
            warn!("Failed to persist {} snapshot: {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTornApi;
    use crate::client::mock::MockReply;
    use chrono::TimeDelta;
    use serde_json::json;
    use tempfile::TempDir;

    const PATH: &str = "/torn/?selections=stocks";

    fn parse_names(value: Value) -> Result<HashMap<u64, String>> {
        let map: HashMap<String, String> = serde_json::from_value(value["names"].clone())?;
        Ok(map
            .into_iter()
            .map(|(k, v)| (k.parse().unwrap_or_default(), v))
            .collect())
    }

    fn mock() -> Arc<MockTornApi> {
        Arc::new(MockTornApi::new().with_json(PATH, json!({"names": {"1": "one", "2": "two"}})))
    }

    fn cache(api: Arc<MockTornApi>, storage: Option<Arc<SnapshotStorage>>) -> ReferenceCache<String> {
        ReferenceCache::new(
            "names",
            PATH,
            parse_names,
            Duration::from_secs(24 * 60 * 60),
            api,
            storage,
        )
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_once() {
        let api = mock();
        let cache = cache(api.clone(), None);
        let cred = Credential::new("k");

        assert_eq!(cache.state_at(t0()).await, CacheState::Empty);
        let entries = cache.entries_at(&cred, t0()).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(cache.state_at(t0()).await, CacheState::Fresh);

        cache.entries_at(&cred, t0() + TimeDelta::hours(1)).await;
        assert_eq!(api.call_count(PATH), 1);
    }

    #[tokio::test]
    async fn test_staleness_boundary() {
        let api = mock();
        let cache = cache(api.clone(), None);
        let cred = Credential::new("k");

        cache.entries_at(&cred, t0()).await;
        assert_eq!(api.call_count(PATH), 1);

        cache
            .entries_at(&cred, t0() + TimeDelta::hours(23) + TimeDelta::minutes(59))
            .await;
        assert_eq!(api.call_count(PATH), 1);

        cache
            .entries_at(&cred, t0() + TimeDelta::hours(24) + TimeDelta::seconds(1))
            .await;
        assert_eq!(api.call_count(PATH), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_mapping() {
        let api = mock();
        let cache = cache(api.clone(), None);
        let cred = Credential::new("k");
        cache.entries_at(&cred, t0()).await;

        api.set_reply(PATH, None, MockReply::Json(json!({"names": {"3": "three"}})));
        let entries = cache.entries_at(&cred, t0() + TimeDelta::days(2)).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&3).map(String::as_str), Some("three"));
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_stale() {
        let api = mock();
        let cache = cache(api.clone(), None);
        let cred = Credential::new("k");
        cache.entries_at(&cred, t0()).await;

        api.set_reply(PATH, None, MockReply::Timeout);
        let later = t0() + TimeDelta::days(2);
        let entries = cache.entries_at(&cred, later).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(cache.state_at(later).await, CacheState::Stale);
    }

    #[tokio::test]
    async fn test_failed_first_fetch_is_empty_not_error() {
        let api = Arc::new(MockTornApi::new().with_http_error(PATH, 502));
        let cache = cache(api, None);
        let entries = cache.entries_at(&Credential::new("k"), t0()).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(SnapshotStorage::open_at(dir.path()).unwrap());
        let cred = Credential::new("k");
        let now = Utc::now();

        let first_api = mock();
        cache(first_api.clone(), Some(storage.clone()))
            .entries_at(&cred, now)
            .await;
        assert_eq!(first_api.call_count(PATH), 1);

        let second_api = mock();
        let restarted = cache(second_api.clone(), Some(storage));
        assert_eq!(restarted.state_at(now).await, CacheState::Fresh);
        let entries = restarted.entries_at(&cred, now).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(second_api.call_count(PATH), 0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let api = mock();
        let cache = cache(api.clone(), None);
        let cred = Credential::new("k");
        cache.entries_at(&cred, t0()).await;
        cache.invalidate().await;
        cache.entries_at(&cred, t0()).await;
        assert_eq!(api.call_count(PATH), 2);
    }
}
