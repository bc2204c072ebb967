use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use plumblossom_lib::{
    error::Result,
    models::{ChapterCandidate, ChapterContent, SourceId, SourceInfo},
    traits::Source,
};

use super::SourceSettings;
use crate::{
    content,
    extract::{self, ChapterLinks, ChapterSet, Link},
    fetch::{FetchOptions, Fetcher},
};

static TEXT_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"(?i)cap[ií]tulo\s*[:\-]?\s*(\d+)", r"(\d+)"]));
static HREF_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"(?i)cap[ií]tulo[\-_]?(\d+)"]));

const CONTENT_SELECTORS: &[&str] = &[".post-body", "article", ".entry-content"];

/// Spanish index page: a single hand-maintained list of "Capítulo N" links.
pub struct BlogspotLinks {
    origin: String,
}

impl BlogspotLinks {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
        }
    }
}

impl ChapterLinks for BlogspotLinks {
    fn source(&self) -> SourceId {
        SourceId::Blogspot
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn is_relevant(&self, link: &Link) -> bool {
        if link.text.is_empty() || link.href.is_empty() {
            return false;
        }

        let text = link.text.to_lowercase();
        text.contains("capítulo") || text.contains("capitulo")
    }

    fn text_patterns(&self) -> &[Regex] {
        TEXT_PATTERNS.as_slice()
    }

    fn href_patterns(&self) -> &[Regex] {
        HREF_PATTERNS.as_slice()
    }
}

pub struct Blogspot {
    url: String,
    links: BlogspotLinks,
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
}

impl Blogspot {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &SourceSettings) -> Result<Self> {
        let origin = extract::origin_of(&settings.blogspot_url)?;

        Ok(Self {
            url: settings.blogspot_url.clone(),
            links: BlogspotLinks::new(&origin),
            fetcher,
            timeout: settings.direct_timeout,
        })
    }
}

#[async_trait]
impl Source for Blogspot {
    fn get_source_info(&self) -> SourceInfo {
        SourceInfo {
            id: SourceId::Blogspot,
            name: "Animes Hoy (Blogspot)".to_string(),
            url: self.url.clone(),
            language: SourceId::Blogspot.language(),
        }
    }

    async fn get_chapters(&self) -> Result<Vec<ChapterCandidate>> {
        let markup = self
            .fetcher
            .fetch(&self.url, FetchOptions::direct(self.timeout))
            .await?;

        let mut found = ChapterSet::default();
        extract::scan(&self.links, &markup, &mut found);
        info!("blogspot: {} chapters", found.len());

        Ok(found.into_sorted())
    }

    async fn get_content(&self, url: &str) -> Result<ChapterContent> {
        let markup = self
            .fetcher
            .fetch(url, FetchOptions::direct(self.timeout))
            .await?;

        content::chapter_content(&markup, CONTENT_SELECTORS, url, SourceId::Blogspot)
    }
}
