use serde::{Deserialize, Serialize};

use super::{Language, SourceId};

/// A type represent one source's observation of a chapter, before merging
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCandidate {
    pub number: u32,
    pub title: String,
    pub url: String,
    pub language: Language,
    pub source: SourceId,
}

impl ChapterCandidate {
    /// Builds a candidate, falling back to "Chapter {number}" when the link had no text.
    pub fn new(number: u32, title: &str, url: String, source: SourceId) -> Self {
        let title = if title.is_empty() {
            format!("Chapter {number}")
        } else {
            title.to_string()
        };

        Self {
            number,
            title,
            url,
            language: source.language(),
            source,
        }
    }
}

/// Where a unified chapter can be read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceLink {
    pub source: SourceId,
    pub url: String,
}

/// A type represent a chapter merged across every source of a language group
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedChapter {
    pub number: u32,
    pub title: String,
    pub sources: Vec<SourceLink>,
}

/// Prose of a single chapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    pub content: String,
    pub url: String,
    pub source: SourceId,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_candidate_title_fallback() {
        let chapter = ChapterCandidate::new(7, "", "https://a.test/7".to_string(), SourceId::Skydemon);
        assert_eq!(chapter.title, "Chapter 7");
        assert_eq!(chapter.language, Language::En);

        let chapter = ChapterCandidate::new(
            7,
            "Capítulo 7",
            "https://a.test/7".to_string(),
            SourceId::Blogspot,
        );
        assert_eq!(chapter.title, "Capítulo 7");
        assert_eq!(chapter.language, Language::Es);
    }
}
