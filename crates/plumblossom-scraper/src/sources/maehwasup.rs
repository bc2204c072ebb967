use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use plumblossom_lib::{
    error::{Error, Result},
    models::{ChapterCandidate, ChapterContent, SourceId, SourceInfo},
    traits::Source,
};
use url::Url;

use super::SourceSettings;
use crate::{
    content,
    extract::{self, ChapterLinks, ChapterSet, Link},
    fetch::{FetchOptions, Fetcher},
};

static TEXT_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"(?i)chapter\s*[:\-]?\s*(\d+)"]));
static HREF_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| extract::patterns(&[r"(?i)chapter[/\-_]?(\d+)"]));

pub(crate) const CONTENT_SELECTORS: &[&str] = &[
    ".entry-content",
    "article",
    ".chapter-content",
    ".reading-content",
    ".page-body",
    ".text-left",
    "#chapter-content",
];

/// WordPress blog: chapters are posts, the front page is paginated newest first.
pub struct MaehwasupLinks {
    origin: String,
    host: String,
}

impl MaehwasupLinks {
    pub fn new(origin: &str) -> Self {
        let host = Url::parse(origin)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            origin: origin.to_string(),
            host,
        }
    }

    fn is_on_site(&self, href: &str) -> bool {
        Url::parse(&extract::canonicalize(&self.origin, href))
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .is_some_and(|host| host == self.host || host.ends_with(&format!(".{}", self.host)))
    }
}

impl ChapterLinks for MaehwasupLinks {
    fn source(&self) -> SourceId {
        SourceId::Maehwasup
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn is_relevant(&self, link: &Link) -> bool {
        let mentions_chapter = TEXT_PATTERNS
            .iter()
            .any(|re| re.is_match(&link.text).unwrap_or(false))
            || HREF_PATTERNS
                .iter()
                .any(|re| re.is_match(&link.href).unwrap_or(false));

        mentions_chapter && !link.href.is_empty() && self.is_on_site(&link.href)
    }

    fn text_patterns(&self) -> &[Regex] {
        TEXT_PATTERNS.as_slice()
    }

    fn href_patterns(&self) -> &[Regex] {
        HREF_PATTERNS.as_slice()
    }
}

pub struct Maehwasup {
    url: String,
    links: MaehwasupLinks,
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
    page_delay: Duration,
    max_pages: u32,
}

impl Maehwasup {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &SourceSettings) -> Result<Self> {
        let origin = extract::origin_of(&settings.maehwasup_url)?;

        Ok(Self {
            url: settings.maehwasup_url.clone(),
            links: MaehwasupLinks::new(&origin),
            fetcher,
            timeout: settings.direct_timeout,
            page_delay: settings.page_delay,
            max_pages: settings.max_pages,
        })
    }

    fn page_url(&self, page: u32) -> String {
        if page == 1 {
            self.url.clone()
        } else {
            format!("{}/page/{page}/", self.url.trim_end_matches('/'))
        }
    }
}

#[async_trait]
impl Source for Maehwasup {
    fn get_source_info(&self) -> SourceInfo {
        SourceInfo {
            id: SourceId::Maehwasup,
            name: "Maehwasup".to_string(),
            url: self.url.clone(),
            language: SourceId::Maehwasup.language(),
        }
    }

    async fn get_chapters(&self) -> Result<Vec<ChapterCandidate>> {
        let mut found = ChapterSet::default();

        for page in 1..=self.max_pages {
            let url = self.page_url(page);
            debug!("maehwasup: page {page}");

            let markup = match self
                .fetcher
                .fetch(&url, FetchOptions::direct(self.timeout))
                .await
            {
                Ok(markup) => markup,
                Err(Error::Status { status: 404, .. }) if page > 1 => {
                    debug!("maehwasup: page {page} does not exist, stopping");
                    break;
                }
                Err(e) => return Err(e),
            };

            if extract::scan(&self.links, &markup, &mut found) == 0 {
                debug!("maehwasup: no new chapters on page {page}, stopping");
                break;
            }

            if page < self.max_pages {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        info!("maehwasup: {} chapters", found.len());

        Ok(found.into_sorted())
    }

    async fn get_content(&self, url: &str) -> Result<ChapterContent> {
        let markup = self
            .fetcher
            .fetch(url, FetchOptions::direct(self.timeout))
            .await?;

        content::chapter_content(&markup, CONTENT_SELECTORS, url, SourceId::Maehwasup)
    }
}
