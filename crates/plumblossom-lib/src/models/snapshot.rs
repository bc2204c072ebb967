use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChapterCandidate, Language, Listing, SourceId};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStats {
    pub groups: BTreeMap<Language, usize>,
    pub sources: BTreeMap<SourceId, usize>,
}

/// Precomputed listings written by the offline scraper
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    pub last_update: DateTime<Utc>,
    pub stats: SnapshotStats,
    pub groups: BTreeMap<Language, Listing>,
    pub raw: BTreeMap<SourceId, Vec<ChapterCandidate>>,
}

impl Snapshot {
    pub fn new(
        last_update: DateTime<Utc>,
        groups: BTreeMap<Language, Listing>,
        raw: BTreeMap<SourceId, Vec<ChapterCandidate>>,
    ) -> Self {
        let stats = SnapshotStats {
            groups: groups.iter().map(|(lang, l)| (*lang, l.len())).collect(),
            sources: raw.iter().map(|(id, c)| (*id, c.len())).collect(),
        };

        Self {
            version: crate::LIB_VERSION.to_string(),
            last_update,
            stats,
            groups,
            raw,
        }
    }

    pub fn listing(&self, language: Language) -> Option<&Listing> {
        self.groups.get(&language)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_snapshot_stats() {
        let chapter = ChapterCandidate::new(
            1,
            "Capítulo 1",
            "https://b.test/1".to_string(),
            SourceId::Blogspot,
        );
        let groups = BTreeMap::from([
            (Language::Es, Listing::Candidates(vec![chapter.clone()])),
            (Language::En, Listing::Unified(vec![])),
        ]);
        let raw = BTreeMap::from([(SourceId::Blogspot, vec![chapter])]);

        let snapshot = Snapshot::new(Utc::now(), groups, raw);

        assert_eq!(snapshot.stats.groups[&Language::Es], 1);
        assert_eq!(snapshot.stats.groups[&Language::En], 0);
        assert_eq!(snapshot.stats.sources[&SourceId::Blogspot], 1);
        assert_eq!(snapshot.listing(Language::Es).map(|l| l.len()), Some(1));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"lastUpdate\""));
        assert!(json.contains("\"es\""));
    }
}
