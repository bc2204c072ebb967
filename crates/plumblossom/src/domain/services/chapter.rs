use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use plumblossom_lib::{
    models::{Language, Listing, SnapshotStats},
    unify,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{
    entities::{
        cache::{GroupStatus, ListingEntry},
        failure::SourceFailure,
    },
    repositories::{
        cache::ListingCacheRepository,
        snapshot::{SnapshotRepository, SnapshotRepositoryError},
        source::SourceRepository,
    },
};

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("every {language} source failed: {}", describe(.failures))]
    AggregateExtractionFailure {
        language: Language,
        failures: Vec<SourceFailure>,
    },
    #[error("no sources configured for {0}")]
    NoSources(Language),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotRepositoryError),
}

fn describe(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.source, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    pub last_update: DateTime<Utc>,
    pub stats: SnapshotStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub cache: BTreeMap<Language, GroupStatus>,
    pub failures: BTreeMap<Language, Vec<SourceFailure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotStatus>,
}

#[derive(Clone)]
pub struct ChapterService<C, R, S>
where
    C: ListingCacheRepository,
    R: SourceRepository,
    S: SnapshotRepository,
{
    cache: C,
    repo: R,
    snapshot: Option<S>,
    failures: Arc<RwLock<BTreeMap<Language, Vec<SourceFailure>>>>,
}

impl<C, R, S> ChapterService<C, R, S>
where
    C: ListingCacheRepository,
    R: SourceRepository,
    S: SnapshotRepository,
{
    pub fn new(cache: C, repo: R, snapshot: Option<S>) -> Self {
        Self {
            cache,
            repo,
            snapshot,
            failures: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub async fn get_chapters(&self, language: &str) -> Result<ListingEntry, ChapterError> {
        let language: Language = language
            .parse()
            .map_err(|e: plumblossom_lib::error::Error| ChapterError::InvalidRequest(e.to_string()))?;

        if let Some(entry) = self.from_snapshot(language).await? {
            debug!("serving {language} from snapshot");
            return Ok(entry);
        }

        if let Some(entry) = self.cache.get(language).await {
            return Ok(entry);
        }

        let listing = self.fetch_listing(language).await?;

        Ok(self.cache.set(language, listing).await)
    }

    async fn from_snapshot(&self, language: Language) -> Result<Option<ListingEntry>, ChapterError> {
        let Some(store) = &self.snapshot else {
            return Ok(None);
        };

        let entry = store.load().await?.and_then(|snapshot| {
            snapshot
                .listing(language)
                .map(|listing| ListingEntry::new(listing.clone(), snapshot.last_update))
        });

        Ok(entry)
    }

    /// Scrapes every source of the group concurrently and builds its listing.
    ///
    /// Failed sources contribute nothing; only a group where every source failed is an error.
    async fn fetch_listing(&self, language: Language) -> Result<Listing, ChapterError> {
        let sources = self.repo.sources(language).await;
        if sources.is_empty() {
            return Err(ChapterError::NoSources(language));
        }

        info!("scraping {} {language} sources", sources.len());

        let results = join_all(sources.iter().map(|source| async move {
            (source.id, self.repo.get_chapters(source.id).await)
        }))
        .await;

        let mut candidates = vec![];
        let mut failures = vec![];
        for (id, result) in results {
            match result {
                Ok(chapters) => {
                    info!("{id}: {} chapters", chapters.len());
                    candidates.extend(chapters);
                }
                Err(e) => {
                    warn!("{id} failed: {e}");
                    failures.push(SourceFailure {
                        source: id,
                        reason: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
        }

        self.failures
            .write()
            .await
            .insert(language, failures.clone());

        if failures.len() == sources.len() {
            return Err(ChapterError::AggregateExtractionFailure { language, failures });
        }

        let listing = unify::listing(language, candidates);
        info!("{language}: {} chapters", listing.len());

        Ok(listing)
    }

    pub async fn clear(&self) {
        self.cache.clear().await;

        if let Some(store) = &self.snapshot {
            store.invalidate().await;
        }
    }

    pub async fn status(&self) -> ServiceStatus {
        let snapshot = match &self.snapshot {
            Some(store) => match store.load().await {
                Ok(snapshot) => snapshot.map(|s| SnapshotStatus {
                    last_update: s.last_update,
                    stats: s.stats.clone(),
                }),
                Err(e) => {
                    warn!("snapshot unavailable: {e}");
                    None
                }
            },
            None => None,
        };

        ServiceStatus {
            cache: self.cache.status().await,
            failures: self.failures.read().await.clone(),
            snapshot,
        }
    }
}


#[cfg(test)]
mod test {
    use std::time::Duration;

    use plumblossom_lib::models::{ChapterCandidate, SourceId, SourceLink};

    use super::{testing::FakeSources, *};
    use crate::infrastructure::{
        clock::testing::ManualClock,
        domain::repositories::{cache::InMemoryListingCache, snapshot::SnapshotRepositoryImpl},
    };

    type TestService =
        ChapterService<InMemoryListingCache<ManualClock>, Arc<FakeSources>, SnapshotRepositoryImpl>;

    fn candidate(number: u32, title: &str, url: &str, source: SourceId) -> ChapterCandidate {
        ChapterCandidate::new(number, title, url.to_string(), source)
    }

    fn service(sources: FakeSources) -> (TestService, Arc<FakeSources>, ManualClock) {
        let clock = ManualClock::default();
        let sources = Arc::new(sources);
        let cache = InMemoryListingCache::with_clock(Duration::from_secs(3600), clock.clone());

        (ChapterService::new(cache, sources.clone(), None), sources, clock)
    }

    #[tokio::test]
    async fn test_invalid_language() {
        let (svc, _, _) = service(FakeSources::default());

        for language in ["fr", "ES", ""] {
            assert!(matches!(
                svc.get_chapters(language).await,
                Err(ChapterError::InvalidRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_no_sources() {
        let (svc, _, _) = service(FakeSources::default());

        assert!(matches!(
            svc.get_chapters("en").await,
            Err(ChapterError::NoSources(Language::En))
        ));
    }

    #[tokio::test]
    async fn test_english_sources_are_unified() -> anyhow::Result<()> {
        let (svc, _, _) = service(
            FakeSources::default()
                .with_source(
                    SourceId::Maehwasup,
                    Some(vec![
                        candidate(11, "Chapter 11", "https://site-a.test/p/11-x", SourceId::Maehwasup),
                        candidate(12, "Chapter 12", "https://site-a.test/p/12-x", SourceId::Maehwasup),
                    ]),
                )
                .with_source(
                    SourceId::Skydemon,
                    Some(vec![candidate(
                        12,
                        "The Plum Blossom",
                        "https://site-b.test/ch/12",
                        SourceId::Skydemon,
                    )]),
                ),
        );

        let entry = svc.get_chapters("en").await?;

        let Listing::Unified(chapters) = entry.listing.as_ref() else {
            panic!("expected unified listing");
        };
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].number, 12);
        assert_eq!(chapters[1].title, "Chapter 12");
        assert_eq!(
            chapters[1].sources,
            vec![
                SourceLink {
                    source: SourceId::Maehwasup,
                    url: "https://site-a.test/p/12-x".to_string()
                },
                SourceLink {
                    source: SourceId::Skydemon,
                    url: "https://site-b.test/ch/12".to_string()
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_spanish_source_is_served_raw() -> anyhow::Result<()> {
        let (svc, _, _) = service(FakeSources::default().with_source(
            SourceId::Blogspot,
            Some(vec![
                candidate(2, "Capítulo 2", "https://b.test/2", SourceId::Blogspot),
                candidate(1, "Capítulo 1", "https://b.test/1", SourceId::Blogspot),
            ]),
        ));

        let entry = svc.get_chapters("es").await?;

        assert!(matches!(entry.listing.as_ref(), Listing::Candidates(_)));
        assert_eq!(entry.listing.numbers(), vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_failure_serves_surviving_sources() -> anyhow::Result<()> {
        let surviving = vec![
            candidate(4, "Chapter 4", "https://m.test/4", SourceId::Maehwasup),
            candidate(3, "Chapter 3", "https://m.test/3", SourceId::Maehwasup),
        ];
        let (svc, _, _) = service(
            FakeSources::default()
                .with_source(SourceId::Blogspot, None)
                .with_source(SourceId::Maehwasup, Some(surviving.clone()))
                .with_source(SourceId::Skydemon, None),
        );

        let entry = svc.get_chapters("en").await?;

        assert_eq!(
            entry.listing.as_ref(),
            &Listing::Unified(unify::unify(&surviving))
        );
        let Listing::Unified(chapters) = entry.listing.as_ref() else {
            panic!("expected unified listing");
        };
        assert!(chapters.iter().all(|c| {
            c.sources.len() == 1 && c.sources[0].source == SourceId::Maehwasup
        }));
        assert!(matches!(
            svc.get_chapters("es").await,
            Err(ChapterError::AggregateExtractionFailure { .. })
        ));

        let status = svc.status().await;
        let failures = &status.failures[&Language::En];
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, SourceId::Skydemon);
        assert!(failures[0].reason.contains("timed out"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_are_scraped_concurrently() -> anyhow::Result<()> {
        let (svc, sources, _) = service(
            FakeSources::default()
                .with_source(
                    SourceId::Maehwasup,
                    Some(vec![candidate(1, "Chapter 1", "https://m.test/1", SourceId::Maehwasup)]),
                )
                .with_source(
                    SourceId::Skydemon,
                    Some(vec![candidate(2, "Chapter 2", "https://s.test/2", SourceId::Skydemon)]),
                )
                .with_delay(SourceId::Maehwasup, Duration::from_secs(3))
                .with_delay(SourceId::Skydemon, Duration::from_secs(5)),
        );

        let start = tokio::time::Instant::now();
        let entry = svc.get_chapters("en").await?;
        let elapsed = start.elapsed();

        assert_eq!(entry.listing.numbers(), vec![1, 2]);
        assert_eq!(sources.calls(), 2);
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(8));
        Ok(())
    }

    #[tokio::test]
    async fn test_total_failure() {
        let (svc, _, _) = service(
            FakeSources::default()
                .with_source(SourceId::Maehwasup, None)
                .with_source(SourceId::Skydemon, None),
        );

        match svc.get_chapters("en").await {
            Err(ChapterError::AggregateExtractionFailure { language, failures }) => {
                assert_eq!(language, Language::En);
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected aggregate failure, got {:?}", other.map(|e| e.listing)),
        }
        assert_eq!(svc.status().await.cache[&Language::En].count, 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_sources_until_expired() -> anyhow::Result<()> {
        let (svc, sources, clock) = service(FakeSources::default().with_source(
            SourceId::Blogspot,
            Some(vec![candidate(1, "Capítulo 1", "https://b.test/1", SourceId::Blogspot)]),
        ));

        let first = svc.get_chapters("es").await?;
        clock.advance(chrono::Duration::minutes(30));
        let second = svc.get_chapters("es").await?;
        assert_eq!(sources.calls(), 1);
        assert_eq!(first.last_update, second.last_update);

        clock.advance(chrono::Duration::minutes(31));
        svc.get_chapters("es").await?;
        assert_eq!(sources.calls(), 2);

        svc.clear().await;
        svc.get_chapters("es").await?;
        assert_eq!(sources.calls(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_is_served_before_sources() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = SnapshotRepositoryImpl::new(dir.path().join("chapters.json"));
        let chapters = vec![candidate(9, "Capítulo 9", "https://b.test/9", SourceId::Blogspot)];
        store
            .save(&plumblossom_lib::models::Snapshot::new(
                Utc::now(),
                BTreeMap::from([(Language::Es, Listing::Candidates(chapters.clone()))]),
                BTreeMap::from([(SourceId::Blogspot, chapters)]),
            ))
            .await?;

        let sources = Arc::new(FakeSources::default().with_source(SourceId::Blogspot, None));
        let svc = ChapterService::new(
            InMemoryListingCache::with_clock(Duration::from_secs(3600), ManualClock::default()),
            sources.clone(),
            Some(store),
        );

        let entry = svc.get_chapters("es").await?;

        assert_eq!(entry.listing.numbers(), vec![9]);
        assert_eq!(sources.calls(), 0);
        assert!(svc.status().await.snapshot.is_some());
        Ok(())
    }
}
