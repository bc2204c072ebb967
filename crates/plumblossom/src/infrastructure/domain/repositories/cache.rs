use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use plumblossom_lib::models::{Language, Listing};
use tokio::sync::RwLock;

use crate::{
    domain::{
        entities::cache::{GroupStatus, ListingEntry},
        repositories::cache::ListingCacheRepository,
    },
    infrastructure::clock::{Clock, SystemClock},
};

/// One slot per language group, each swapped whole on write.
#[derive(Clone)]
pub struct InMemoryListingCache<K = SystemClock>
where
    K: Clock,
{
    ttl: chrono::Duration,
    clock: K,
    slots: Arc<BTreeMap<Language, RwLock<Option<ListingEntry>>>>,
}

impl InMemoryListingCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K> InMemoryListingCache<K>
where
    K: Clock,
{
    pub fn with_clock(ttl: Duration, clock: K) -> Self {
        let slots = Language::ALL
            .into_iter()
            .map(|language| (language, RwLock::new(None)))
            .collect();

        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            slots: Arc::new(slots),
        }
    }

    fn slot(&self, language: Language) -> Option<&RwLock<Option<ListingEntry>>> {
        self.slots.get(&language)
    }
}

#[async_trait]
impl<K> ListingCacheRepository for InMemoryListingCache<K>
where
    K: Clock,
{
    async fn get(&self, language: Language) -> Option<ListingEntry> {
        let entry = self.slot(language)?.read().await.clone()?;

        let age = self.clock.now().signed_duration_since(entry.last_update);
        if age < self.ttl {
            debug!("cache hit for {language}, {}s old", age.num_seconds());
            Some(entry)
        } else {
            debug!("cache for {language} expired");
            None
        }
    }

    async fn set(&self, language: Language, listing: Listing) -> ListingEntry {
        let entry = ListingEntry::new(listing, self.clock.now());

        if let Some(slot) = self.slot(language) {
            *slot.write().await = Some(entry.clone());
        }

        entry
    }

    /// Every group is locked before any is reset, so readers never see a half-cleared cache.
    async fn clear(&self) {
        let mut guards = Vec::with_capacity(self.slots.len());
        for slot in self.slots.values() {
            guards.push(slot.write().await);
        }

        for guard in guards.iter_mut() {
            **guard = None;
        }
        info!("cache cleared");
    }

    async fn status(&self) -> BTreeMap<Language, GroupStatus> {
        let mut status = BTreeMap::new();

        for (language, slot) in self.slots.iter() {
            let group = match slot.read().await.as_ref() {
                Some(entry) => GroupStatus {
                    count: entry.listing.len(),
                    last_update: Some(entry.last_update),
                },
                None => GroupStatus::default(),
            };
            status.insert(*language, group);
        }

        status
    }
}

#[cfg(test)]
mod test {
    use plumblossom_lib::models::{ChapterCandidate, SourceId};

    use super::*;
    use crate::infrastructure::clock::testing::ManualClock;

    fn listing() -> Listing {
        Listing::Candidates(vec![ChapterCandidate::new(
            1,
            "Capítulo 1",
            "https://b.test/1".to_string(),
            SourceId::Blogspot,
        )])
    }

    #[tokio::test]
    async fn test_get_within_ttl() {
        let clock = ManualClock::default();
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(3600), clock.clone());

        let stored = cache.set(Language::Es, listing()).await;
        clock.advance(chrono::Duration::seconds(3599));

        let entry = cache.get(Language::Es).await.unwrap();
        assert_eq!(*entry.listing, listing());
        assert_eq!(entry.last_update, stored.last_update);
        assert!(cache.get(Language::En).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_but_counted() {
        let clock = ManualClock::default();
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(3600), clock.clone());

        let stored = cache.set(Language::Es, listing()).await;
        clock.advance(chrono::Duration::seconds(3600));

        assert!(cache.get(Language::Es).await.is_none());

        let status = cache.status().await;
        assert_eq!(
            status[&Language::Es],
            GroupStatus {
                count: 1,
                last_update: Some(stored.last_update)
            }
        );
        assert_eq!(status[&Language::En], GroupStatus::default());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_restamps() {
        let clock = ManualClock::default();
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.set(Language::En, Listing::Unified(vec![])).await;
        clock.advance(chrono::Duration::seconds(59));
        cache.set(Language::En, Listing::Unified(vec![])).await;
        clock.advance(chrono::Duration::seconds(59));

        assert!(cache.get(Language::En).await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(3600), ManualClock::default());
        cache.set(Language::Es, listing()).await;
        cache.set(Language::En, Listing::Unified(vec![])).await;

        cache.clear().await;
        cache.clear().await;

        assert!(cache.get(Language::Es).await.is_none());
        assert!(cache.status().await.values().all(|s| s.count == 0 && s.last_update.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_every_group_together() {
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(3600), ManualClock::default());
        cache.set(Language::Es, listing()).await;
        cache.set(Language::En, Listing::Unified(vec![])).await;

        let reader = cache.slot(Language::En).unwrap().read().await;
        let clearing = tokio::spawn({
            let cache = cache.clone();
            async move { cache.clear().await }
        });
        tokio::task::yield_now().await;

        // es must not read as cleared while en is still being served
        let es = tokio::time::timeout(Duration::from_secs(1), cache.get(Language::Es)).await;
        assert!(es.is_err());

        drop(reader);
        clearing.await.unwrap();
        assert!(cache.get(Language::Es).await.is_none());
        assert!(cache.get(Language::En).await.is_none());
    }
}
