use serde::{Deserialize, Serialize};

use super::{ChapterCandidate, UnifiedChapter};

/// What a language group serves: raw candidates for single-site groups, merged chapters otherwise
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Unified(Vec<UnifiedChapter>),
    Candidates(Vec<ChapterCandidate>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Listing::Unified(chapters) => chapters.len(),
            Listing::Candidates(chapters) => chapters.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn numbers(&self) -> Vec<u32> {
        match self {
            Listing::Unified(chapters) => chapters.iter().map(|c| c.number).collect(),
            Listing::Candidates(chapters) => chapters.iter().map(|c| c.number).collect(),
        }
    }
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Candidates(vec![])
    }
}
