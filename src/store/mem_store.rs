use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time;
use tokio::sync::Mutex;
use crate::store::Store;

pub const DEFAULT_STORE_CAPACITY: usize = 4096;

/// Longest time between two sweeps of expired slots.
pub const MAX_SWEEP_INTERVAL: time::Duration = time::Duration::from_secs(60 * 60);

/// [Slot] stores a payload and the instant it stops being visible.
/// A ttl too long to be represented never expires.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub value: String,
    pub expire_date: Option<time::Instant>,
}

impl Slot {
    /// Check if [Slot] has expired.
    pub fn expired(&self) -> bool {
        self.expired_at(time::Instant::now())
    }

    /// Check if [Slot] has expired at instant.
    pub fn expired_at(&self, instant: time::Instant) -> bool {
        self.expire_date.is_some_and(|date| date <= instant)
    }
}

/// [MemStore] stores data in memory.
///
/// Expired keys are dropped when read, and swept from the whole
/// store at most once per ttl (capped at [MAX_SWEEP_INTERVAL])
/// on [Store::set], so keys that are
/// never read again do not pile up.
///
/// Cloning a [MemStore] gives another handle to the same data.
#[derive(Debug, Clone)]
pub struct MemStore {
    pub(crate) inner: Arc<Mutex<MemStoreInner>>,
}

impl MemStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemStoreInner::new(capacity))),
        }
    }

    /// The [clear] function drops all stored data.
    pub async fn clear(&self) {
        self.inner.lock().await.clear()
    }

    /// Number of keys currently held, expired ones included
    /// until they are read or swept.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.data.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

#[async_trait::async_trait]
impl Store for MemStore {
    /// We don't have any error here.
    type Error = Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.lock().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: time::Duration) -> Result<(), Self::Error> {
        self.inner.lock().await.set(key, value, ttl);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), Self::Error> {
        self.inner.lock().await.del(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MemStoreInner {
    pub(crate) data: HashMap<String, Slot>,
    /// next instant [MemStoreInner::set] sweeps expired slots; `None` means now.
    pub(crate) sweep_date: Option<time::Instant>,
}

impl MemStoreInner {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
            sweep_date: None,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = self.data.get(key)?.expired();

        if expired {
            self.data.remove(key);
            return None;
        }

        self.data.get(key).map(|slot| slot.value.clone())
    }

    pub fn set(&mut self, key: &str, value: String, ttl: time::Duration) {
        let now = time::Instant::now();

        if self.sweep_date.map_or(true, |date| date <= now) {
            self.sweep(now);
            self.sweep_date = now.checked_add(ttl.min(MAX_SWEEP_INTERVAL));
        }

        let slot = Slot {
            value,
            expire_date: now.checked_add(ttl),
        };

        self.data.insert(key.to_string(), slot);
    }

    /// Drop every slot expired at `now`.
    pub fn sweep(&mut self, now: time::Instant) {
        self.data.retain(|_, slot| !slot.expired_at(now));
    }

    pub fn del(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.sweep_date = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: time::Duration = time::Duration::from_secs(100000);

    #[tokio::test]
    async fn set_get_del() -> anyhow::Result<()> {
        let store = MemStore::new(8);

        assert_eq!(store.get("John").await?, None);
        store.set("John", "a".to_string(), LONG).await?;
        store.set("Meg", "b".to_string(), LONG).await?;
        assert_eq!(store.get("John").await?, Some("a".to_string()));
        assert_eq!(store.get("Meg").await?, Some("b".to_string()));

        store.set("John", "c".to_string(), LONG).await?;
        assert_eq!(store.get("John").await?, Some("c".to_string()));

        let cloned = store.clone();
        cloned.del("John").await?;
        assert_eq!(store.get("John").await?, None);
        assert_eq!(cloned.get("Meg").await?, Some("b".to_string()));

        // deleting a missing key is fine.
        store.del("John").await?;

        Ok(())
    }

    #[tokio::test]
    async fn clear() -> anyhow::Result<()> {
        let store = MemStore::new(8);

        store.set("John", "a".to_string(), LONG).await?;
        store.set("Meg", "b".to_string(), LONG).await?;
        assert_eq!(store.len().await, 2);

        store.clear().await;
        assert!(store.is_empty().await);
        assert_eq!(store.get("John").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn ttl() -> anyhow::Result<()> {
        let store = MemStore::new(8);
        store.set("John", "a".to_string(), time::Duration::from_secs(3)).await?;

        // wait 1 second to add a new one...
        tokio::time::sleep(time::Duration::from_secs(1)).await;
        store.set("Meg", "b".to_string(), time::Duration::from_secs(3)).await?;

        // wait 2.5 seconds, "John" should be expired, while "Meg" should still exist.
        tokio::time::sleep(time::Duration::from_millis(2500)).await;
        assert_eq!(store.get("John").await?, None);
        assert_eq!(store.get("Meg").await?, Some("b".to_string()));
        assert_eq!(store.len().await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn abandoned_keys_are_reclaimed() -> anyhow::Result<()> {
        let store = MemStore::new(8);

        for i in 0..10_000 {
            store.set(&format!("10.0.{}.{}", i / 256, i % 256), "a".to_string(), time::Duration::from_millis(10)).await?;
        }

        // none of them is read again.
        tokio::time::sleep(time::Duration::from_millis(200)).await;
        store.set("Meg", "b".to_string(), LONG).await?;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("Meg").await?, Some("b".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn huge_ttl_never_expires() -> anyhow::Result<()> {
        let store = MemStore::new(8);

        store.set("John", "a".to_string(), time::Duration::from_secs(u64::MAX)).await?;
        store.set("Meg", "b".to_string(), time::Duration::from_secs(u64::MAX)).await?;

        assert_eq!(store.get("John").await?, Some("a".to_string()));
        assert_eq!(store.len().await, 2);

        Ok(())
    }
}
