use std::collections::BTreeMap;

use crate::models::{ChapterCandidate, Language, Listing, SourceLink, UnifiedChapter};

/// Merges candidates sharing a number into one chapter per number, ascending.
///
/// The first candidate seen for a number supplies the title; every candidate, in
/// input order, contributes a source entry.
pub fn unify<'a, I>(candidates: I) -> Vec<UnifiedChapter>
where
    I: IntoIterator<Item = &'a ChapterCandidate>,
{
    let mut chapters: BTreeMap<u32, UnifiedChapter> = BTreeMap::new();

    for candidate in candidates {
        chapters
            .entry(candidate.number)
            .or_insert_with(|| UnifiedChapter {
                number: candidate.number,
                title: candidate.title.clone(),
                sources: vec![],
            })
            .sources
            .push(SourceLink {
                source: candidate.source,
                url: candidate.url.clone(),
            });
    }

    chapters.into_values().collect()
}

/// Expands unified chapters back into one candidate per source entry.
pub fn flatten(chapters: &[UnifiedChapter]) -> Vec<ChapterCandidate> {
    chapters
        .iter()
        .flat_map(|chapter| {
            chapter.sources.iter().map(|link| {
                ChapterCandidate::new(chapter.number, &chapter.title, link.url.clone(), link.source)
            })
        })
        .collect()
}

/// The listing served for a group, from its candidates in source order.
pub fn listing(language: Language, mut candidates: Vec<ChapterCandidate>) -> Listing {
    if language.unifies() {
        Listing::Unified(unify(&candidates))
    } else {
        candidates.sort_by_key(|c| c.number);
        Listing::Candidates(candidates)
    }
}
