use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use plumblossom_lib::{
    error::Result,
    models::{ChapterCandidate, ChapterContent, SourceId, SourceInfo},
    traits::Source,
};

use super::{SourceSettings, maehwasup::CONTENT_SELECTORS};
use crate::{
    content,
    extract::{self, ChapterLinks, ChapterSet, Link},
    fetch::{FetchOptions, Fetcher},
};

static PROJECT_CHAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/projects/[\w\-]+/(\d+)-").expect("valid project chapter pattern")
});
static TEXT_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"(?i)chapter\s*[:\-]?\s*(\d+)"]));
static HREF_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"/projects/[\w\-]+/(\d+)-"]));
/// Paid early releases use their own "Episode N" numbering
static PAY_GATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^episode\s+\d+").expect("valid pay gate pattern"));

/// Project page behind a bot challenge; chapter links look like `/projects/<slug>/<N>-<title>`.
pub struct SkydemonLinks {
    origin: String,
}

impl SkydemonLinks {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
        }
    }
}

impl ChapterLinks for SkydemonLinks {
    fn source(&self) -> SourceId {
        SourceId::Skydemon
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn is_relevant(&self, link: &Link) -> bool {
        PROJECT_CHAPTER.is_match(&link.href).unwrap_or(false)
    }

    fn text_patterns(&self) -> &[Regex] {
        TEXT_PATTERNS.as_slice()
    }

    fn href_patterns(&self) -> &[Regex] {
        HREF_PATTERNS.as_slice()
    }

    fn is_excluded(&self, link: &Link) -> bool {
        if PAY_GATE.is_match(&link.text).unwrap_or(false) {
            debug!("skydemon: skipping paid release {:?}", link.text);
            return true;
        }

        extract::is_denylisted(&link.href)
    }
}

pub struct Skydemon {
    url: String,
    links: SkydemonLinks,
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
    content_timeout: Duration,
}

impl Skydemon {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &SourceSettings) -> Result<Self> {
        let origin = extract::origin_of(&settings.skydemon_url)?;

        Ok(Self {
            url: settings.skydemon_url.clone(),
            links: SkydemonLinks::new(&origin),
            fetcher,
            timeout: settings.bypass_timeout,
            content_timeout: settings.content_bypass_timeout,
        })
    }
}

#[async_trait]
impl Source for Skydemon {
    fn get_source_info(&self) -> SourceInfo {
        SourceInfo {
            id: SourceId::Skydemon,
            name: "Sky Demon Order".to_string(),
            url: self.url.clone(),
            language: SourceId::Skydemon.language(),
        }
    }

    async fn get_chapters(&self) -> Result<Vec<ChapterCandidate>> {
        let markup = self
            .fetcher
            .fetch(&self.url, FetchOptions::bypass(self.timeout))
            .await?;

        let mut found = ChapterSet::default();
        extract::scan(&self.links, &markup, &mut found);

        if found.is_empty() && markup.contains("Just a moment") {
            warn!("skydemon: page still shows the challenge, no chapters extracted");
        }
        info!("skydemon: {} chapters", found.len());

        Ok(found.into_sorted())
    }

    async fn get_content(&self, url: &str) -> Result<ChapterContent> {
        let markup = self
            .fetcher
            .fetch(url, FetchOptions::bypass(self.content_timeout))
            .await?;

        content::chapter_content(&markup, CONTENT_SELECTORS, url, SourceId::Skydemon)
    }
}
