//! Single-slot response cache.
//!
//! Each widget caches its most recent successful fetch under one store key
//! (`<widget>.cache`), tagged with the time it was captured. The slot is not
//! keyed by request parameters: changing the location or team without
//! saving settings keeps serving the old payload until the TTL runs out.
//!
//! A cached payload is served iff:
//!
//! - it exists and decodes,
//! - `now - captured_at <= ttl`, and
//! - the widget's staleness predicate does not hold for it.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use chrono::Utc;
//! use newtab_protocol::WidgetKind;
//! use newtab_widgets::{MemoryStore, ResponseCache};
//!
//! # async fn example() -> newtab_widgets::Result<()> {
//! let cache = ResponseCache::new(MemoryStore::new(), WidgetKind::Mail, Duration::from_secs(180));
//! let now = Utc::now();
//!
//! cache.write(&vec!["hello".to_string()], now).await?;
//! let hit: Option<Vec<String>> = cache.read(now, |_, _| false).await?;
//! assert!(hit.is_some());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use newtab_protocol::WidgetKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::store::KvStore;

/// A cached payload with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// When the payload was fetched.
    pub captured_at: DateTime<Utc>,
    /// The normalized fetch result.
    pub payload: T,
}

impl<T> CacheEntry<T> {
    /// Returns the age of the entry at `now`.
    ///
    /// An entry captured in the future (clock skew) has age zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use chrono::{TimeDelta, Utc};
    /// use newtab_widgets::CacheEntry;
    ///
    /// let now = Utc::now();
    /// let entry = CacheEntry { captured_at: now - TimeDelta::seconds(90), payload: () };
    /// assert_eq!(entry.age(now), Duration::from_secs(90));
    ///
    /// let skewed = CacheEntry { captured_at: now + TimeDelta::seconds(5), payload: () };
    /// assert_eq!(skewed.age(now), Duration::ZERO);
    /// ```
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.captured_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns whether the entry is strictly older than `max_age` at `now`.
    #[must_use]
    pub fn is_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) > max_age
    }
}

/// A widget's response cache.
#[derive(Debug, Clone)]
pub struct ResponseCache<S> {
    store: S,
    key: String,
    ttl: Duration,
}

impl<S: KvStore> ResponseCache<S> {
    /// Creates the cache slot of `kind` with the given TTL.
    #[must_use]
    pub fn new(store: S, kind: WidgetKind, ttl: Duration) -> Self {
        Self {
            store,
            key: kind.cache_key(),
            ttl,
        }
    }

    /// Returns the time-to-live of entries.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached payload if it is still servable at `now`.
    ///
    /// An entry that no longer decodes is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip(self, is_stale), fields(key = %self.key))]
    pub async fn read<T>(
        &self,
        now: DateTime<Utc>,
        is_stale: impl Fn(&T, DateTime<Utc>) -> bool + Send,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let Some(value) = self.store.get(&self.key).await? else {
            debug!("cache miss");
            return Ok(None);
        };

        let entry: CacheEntry<T> = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "discarding unreadable cache entry");
                return Ok(None);
            }
        };

        if entry.is_older_than(self.ttl, now) {
            debug!(age_secs = entry.age(now).as_secs(), "cache entry expired");
            return Ok(None);
        }

        if is_stale(&entry.payload, now) {
            debug!("cache entry stale");
            return Ok(None);
        }

        debug!(age_secs = entry.age(now).as_secs(), "cache hit");
        Ok(Some(entry.payload))
    }

    /// Overwrites the slot with `payload`, captured at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self, payload), fields(key = %self.key))]
    pub async fn write<T>(&self, payload: &T, now: DateTime<Utc>) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let entry = CacheEntry {
            captured_at: now,
            payload,
        };
        self.store.set_as(&self.key, &entry).await?;
        debug!("cache written");
        Ok(())
    }

    /// Empties the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(&self.key).await?;
        debug!("cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeDelta;
    use proptest::prelude::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(30 * 60);

    fn cache() -> ResponseCache<MemoryStore> {
        ResponseCache::new(MemoryStore::new(), WidgetKind::Weather, TTL)
    }

    fn never_stale(_: &u32, _: DateTime<Utc>) -> bool {
        false
    }

    #[tokio::test]
    async fn read_empty_is_miss() {
        let hit = cache().read(Utc::now(), never_stale).await.unwrap();
        assert_eq!(hit, None);
    }

    #[tokio::test]
    async fn read_within_ttl_is_hit() {
        let cache = cache();
        let captured = Utc::now();
        cache.write(&7u32, captured).await.unwrap();

        let at_ttl = captured + TimeDelta::from_std(TTL).unwrap();
        assert_eq!(cache.read(at_ttl, never_stale).await.unwrap(), Some(7));

        let past_ttl = at_ttl + TimeDelta::seconds(1);
        assert_eq!(cache.read(past_ttl, never_stale).await.unwrap(), None);
    }

    #[tokio::test]
    async fn stale_predicate_overrides_ttl() {
        let cache = cache();
        let now = Utc::now();
        cache.write(&7u32, now).await.unwrap();

        let hit = cache.read(now, |payload: &u32, _| *payload == 7).await.unwrap();
        assert_eq!(hit, None);
    }

    #[tokio::test]
    async fn clear_empties_slot() {
        let cache = cache();
        let now = Utc::now();
        cache.write(&1u32, now).await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.read(now, never_stale).await.unwrap(), None);
    }

    #[tokio::test]
    async fn undecodable_entry_is_miss() {
        let store = MemoryStore::new();
        store
            .set(&WidgetKind::Weather.cache_key(), json!({"captured_at": "yesterday"}))
            .await
            .unwrap();
        let cache = ResponseCache::new(store, WidgetKind::Weather, TTL);
        assert_eq!(cache.read(Utc::now(), never_stale).await.unwrap(), None);
    }

    #[tokio::test]
    async fn slots_are_per_widget() {
        let store = MemoryStore::new();
        let weather = ResponseCache::new(store.clone(), WidgetKind::Weather, TTL);
        let mail = ResponseCache::new(store, WidgetKind::Mail, TTL);
        let now = Utc::now();

        weather.write(&1u32, now).await.unwrap();
        assert_eq!(mail.read(now, never_stale).await.unwrap(), None);
    }

    proptest! {
        #[test]
        fn expiry_is_strictly_after_ttl(age_secs in 0i64..(2 * 3600)) {
            let now = Utc::now();
            let entry = CacheEntry {
                captured_at: now - TimeDelta::seconds(age_secs),
                payload: (),
            };
            prop_assert_eq!(entry.is_older_than(TTL, now), age_secs > TTL.as_secs() as i64);
        }

        #[test]
        fn future_entries_never_expire(skew_secs in 1i64..86_400) {
            let now = Utc::now();
            let entry = CacheEntry {
                captured_at: now + TimeDelta::seconds(skew_secs),
                payload: (),
            };
            prop_assert!(!entry.is_older_than(Duration::ZERO, now));
        }
    }
}
