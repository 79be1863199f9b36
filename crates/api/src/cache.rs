//! Short-lived cache for owner-scoped GET responses.
//!
//! Entries expire after a fixed TTL and are dropped when a mutation event for
//! their owner arrives. Invalidation runs on a background task, so a read that
//! races a mutation may still see the previous body until the event lands.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use site_forge_core::document::OwnerId;
use site_forge_core::events::WebsiteEvent;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct CachedResponse {
    owner_id: OwnerId,
    body: Value,
    created_at: Instant,
}

#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    entries: Arc<Mutex<HashMap<String, CachedResponse>>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cache key for a request path as seen by one owner.
    pub fn key(owner_id: &OwnerId, path: &str) -> String {
        format!("{owner_id}:{path}")
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, v| v.created_at.elapsed() <= self.ttl);
        entries.get(key).map(|entry| entry.body.clone())
    }

    pub async fn insert(&self, key: String, owner_id: &OwnerId, body: Value) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().await;
        entries.retain(|_, v| v.created_at.elapsed() <= self.ttl);
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&victim);
            }
        }
        entries.insert(
            key,
            CachedResponse {
                owner_id: owner_id.clone(),
                body,
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every entry belonging to `owner_id`.
    pub async fn invalidate_owner(&self, owner_id: &OwnerId) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, v| v.owner_id != *owner_id);
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Invalidate entries as mutation events arrive. Ends when the bus closes.
    pub fn spawn_invalidator(&self, mut events: broadcast::Receiver<WebsiteEvent>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let dropped = cache.invalidate_owner(event.owner_id()).await;
                        tracing::debug!(owner_id = %event.owner_id(), dropped, "response cache invalidated");
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "cache invalidator lagged, clearing cache");
                        cache.clear().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use site_forge_core::document::WebsiteId;
    use site_forge_core::events::{EventBus, MutationEvent, MutationKind};

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name)
    }

    #[tokio::test]
    async fn stores_and_returns_bodies() {
        let cache = ResponseCache::new(Duration::from_secs(60), 10);
        let key = ResponseCache::key(&owner("u1"), "/website");
        cache.insert(key.clone(), &owner("u1"), json!({ "a": 1 })).await;
        assert_eq!(cache.get(&key).await, Some(json!({ "a": 1 })));
        assert_eq!(cache.get("u2:/website").await, None);
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = ResponseCache::new(Duration::from_millis(10), 10);
        cache.insert("k".into(), &owner("u1"), json!(1)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn evicts_oldest_when_full() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.insert("a".into(), &owner("u1"), json!(1)).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert("b".into(), &owner("u1"), json!(2)).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert("c".into(), &owner("u1"), json!(3)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("c").await, Some(json!(3)));
    }

    #[tokio::test]
    async fn invalidation_is_per_owner() {
        let cache = ResponseCache::new(Duration::from_secs(60), 10);
        cache.insert("u1:/a".into(), &owner("u1"), json!(1)).await;
        cache.insert("u1:/b".into(), &owner("u1"), json!(2)).await;
        cache.insert("u2:/a".into(), &owner("u2"), json!(3)).await;

        assert_eq!(cache.invalidate_owner(&owner("u1")).await, 2);
        assert_eq!(cache.get("u2:/a").await, Some(json!(3)));
    }

    #[tokio::test]
    async fn invalidator_follows_event_bus() {
        let cache = ResponseCache::new(Duration::from_secs(60), 10);
        let bus = EventBus::new(8);
        let handle = cache.spawn_invalidator(bus.subscribe());
        cache.insert("u1:/website".into(), &owner("u1"), json!([])).await;

        bus.publish(WebsiteEvent::Mutation(MutationEvent {
            website_id: WebsiteId::generate(),
            owner_id: owner("u1"),
            operation: MutationKind::Patch,
            timestamp: Utc::now(),
        }));

        for _ in 0..100 {
            if cache.len().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(cache.len().await, 0);

        drop(bus);
        handle.await.unwrap();
    }
}
