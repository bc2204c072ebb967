use std::{collections::BTreeMap, path::Path};

use anyhow::bail;
use chrono::Utc;
use futures::future::join_all;
use plumblossom::{
    domain::repositories::snapshot::SnapshotRepository,
    infrastructure::domain::repositories::snapshot::SnapshotRepositoryImpl,
};
use plumblossom_lib::{
    models::{ChapterCandidate, Language, Snapshot, SourceId},
    unify,
};
use plumblossom_scraper::bus::SourceBus;

/// Scrapes every registered source at once; a group is left out when none of its sources answered.
pub async fn build_snapshot(bus: &SourceBus) -> Result<Snapshot, anyhow::Error> {
    let sources = bus.list();

    let results = join_all(sources.iter().map(|source| async move {
        (source.id, bus.get_chapters(source.id).await)
    }))
    .await;

    let mut raw: BTreeMap<SourceId, Vec<ChapterCandidate>> = BTreeMap::new();
    let mut ordered = vec![];
    for (id, result) in results {
        match result {
            Ok(chapters) => {
                info!("{id}: {} chapters", chapters.len());
                ordered.push(id);
                raw.insert(id, chapters);
            }
            Err(e) => error!("{id} failed: {e}"),
        }
    }

    if raw.is_empty() {
        bail!("every source failed, no snapshot written");
    }

    let mut groups = BTreeMap::new();
    for language in Language::ALL {
        let answered: Vec<SourceId> = ordered
            .iter()
            .copied()
            .filter(|id| id.language() == language)
            .collect();
        if answered.is_empty() {
            warn!("no {language} source answered, leaving the group to live scraping");
            continue;
        }

        let candidates = answered
            .iter()
            .filter_map(|id| raw.get(id))
            .flatten()
            .cloned()
            .collect();
        groups.insert(language, unify::listing(language, candidates));
    }

    Ok(Snapshot::new(Utc::now(), groups, raw))
}

pub async fn scrape(bus: &SourceBus, output: &Path) -> Result<(), anyhow::Error> {
    let snapshot = build_snapshot(bus).await?;

    SnapshotRepositoryImpl::new(output).save(&snapshot).await?;

    for (language, count) in snapshot.stats.groups.iter() {
        println!("{language}: {count} chapters");
    }
    for (source, count) in snapshot.stats.sources.iter() {
        println!("  {source}: {count}");
    }
    println!("snapshot written to {}", output.display());

    Ok(())
}
