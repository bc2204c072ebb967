//! Link scanning shared by every source.
//!
//! A source supplies a [`ChapterLinks`] rule set; [`scan`] walks every anchor of a
//! page, keeps the relevant ones, recovers a chapter number and canonical URL, and
//! records the first candidate seen for each number.

use std::collections::HashSet;

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use plumblossom_lib::{
    MAX_CHAPTER_NUMBER,
    error::{Error, Result},
    models::{ChapterCandidate, SourceId},
};
use scraper::{Html, Selector};
use url::Url;

use crate::sources::{blogspot::BlogspotLinks, maehwasup::MaehwasupLinks, skydemon::SkydemonLinks};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));

/// Href fragments that never point at a chapter: social networks, taxonomies, pagination
pub const DENYLIST: &[&str] = &[
    "facebook.",
    "twitter.",
    "//x.com/",
    ".x.com/",
    "instagram.",
    "discord.",
    "reddit.",
    "patreon.",
    "ko-fi.",
    "/tag/",
    "/category/",
    "/label/",
    "/search",
    "/page/",
    "#comment",
    "/feed",
    "/author/",
    "wp-login",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// Every anchor of the document, with its visible text collapsed to single spaces.
pub fn links(markup: &str) -> Vec<Link> {
    let document = Html::parse_document(markup);

    document
        .select(&ANCHOR)
        .map(|a| Link {
            text: a
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" "),
            href: a.value().attr("href").unwrap_or_default().trim().to_string(),
        })
        .collect()
}

/// `scheme://host[:port]` of a configured source URL.
pub fn origin_of(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).map_err(|e| Error::Parse(format!("{base_url}: {e}")))?;
    if !url.has_host() {
        return Err(Error::Parse(format!("{base_url}: url has no host")));
    }

    Ok(url.origin().ascii_serialization())
}

pub fn canonicalize(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        let scheme = origin.split("://").next().unwrap_or("https");
        format!("{scheme}://{rest}")
    } else if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

pub fn is_denylisted(href: &str) -> bool {
    let href = href.to_lowercase();
    DENYLIST.iter().any(|fragment| href.contains(fragment))
}

/// Compiles constant patterns; a typo here is a programming error.
pub(crate) fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|s| Regex::new(s).expect("valid chapter pattern"))
        .collect()
}

fn first_capture<'h>(patterns: &[Regex], haystack: &'h str) -> Option<&'h str> {
    patterns.iter().find_map(|re| {
        re.captures(haystack)
            .ok()
            .flatten()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Source-specific heuristics recognizing chapter links.
pub trait ChapterLinks {
    fn source(&self) -> SourceId;

    fn origin(&self) -> &str;

    fn is_relevant(&self, link: &Link) -> bool;

    /// Tried in order against the link text before any href pattern.
    fn text_patterns(&self) -> &[Regex];

    fn href_patterns(&self) -> &[Regex];

    fn is_excluded(&self, link: &Link) -> bool {
        is_denylisted(&link.href)
    }

    /// Number captured by the first matching pattern, text first, if within bounds.
    fn number(&self, link: &Link) -> Option<u32> {
        let digits = first_capture(self.text_patterns(), &link.text)
            .or_else(|| first_capture(self.href_patterns(), &link.href))?;

        digits
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0 && *n < MAX_CHAPTER_NUMBER)
    }
}

/// Candidates of one extraction run, first-seen wins per number.
#[derive(Debug, Default)]
pub struct ChapterSet {
    seen: HashSet<u32>,
    chapters: Vec<ChapterCandidate>,
}

impl ChapterSet {
    pub fn insert(&mut self, chapter: ChapterCandidate) -> bool {
        if self.seen.insert(chapter.number) {
            self.chapters.push(chapter);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn into_sorted(mut self) -> Vec<ChapterCandidate> {
        self.chapters.sort_by_key(|c| c.number);
        self.chapters
    }
}

/// Scans one page into `found`, returning how many new numbers it contributed.
pub fn scan<R>(rules: &R, markup: &str, found: &mut ChapterSet) -> usize
where
    R: ChapterLinks + ?Sized,
{
    let links = links(markup);
    let total = links.len();
    let mut added = 0;

    for link in links {
        if !rules.is_relevant(&link) || rules.is_excluded(&link) {
            continue;
        }

        let Some(number) = rules.number(&link) else {
            trace!("{}: no chapter number in {:?}", rules.source(), link);
            continue;
        };

        let url = canonicalize(rules.origin(), &link.href);
        if found.insert(ChapterCandidate::new(number, &link.text, url, rules.source())) {
            added += 1;
        }
    }

    debug!(
        "{}: {added} new chapters from {total} links",
        rules.source()
    );

    added
}

/// Extracts the chapters a single page of `source` links to, ascending by number.
pub fn extract(markup: &str, source: SourceId, origin: &str) -> Vec<ChapterCandidate> {
    let mut found = ChapterSet::default();

    match source {
        SourceId::Blogspot => scan(&BlogspotLinks::new(origin), markup, &mut found),
        SourceId::Maehwasup => scan(&MaehwasupLinks::new(origin), markup, &mut found),
        SourceId::Skydemon => scan(&SkydemonLinks::new(origin), markup, &mut found),
    };

    found.into_sorted()
}
