use plumblossom_lib::{
    error::{Error, Result},
    models::{ChapterContent, SourceId},
};
use scraper::{Html, Selector};

/// Anything shorter is a challenge page, a paywall or an empty post
pub const MIN_CONTENT_LEN: usize = 500;

/// Text of the first selector whose matches hold any text.
///
/// Text nodes are trimmed and joined by newlines so paragraphs survive.
pub fn extract_text(markup: &str, selectors: &[&str]) -> Option<String> {
    let document = Html::parse_document(markup);

    selectors.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        let text = document
            .select(&selector)
            .flat_map(|element| element.text())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        (!text.is_empty()).then_some(text)
    })
}

pub fn chapter_content(
    markup: &str,
    selectors: &[&str],
    url: &str,
    source: SourceId,
) -> Result<ChapterContent> {
    let content = extract_text(markup, selectors).unwrap_or_default();

    let len = content.chars().count();
    if len < MIN_CONTENT_LEN {
        warn!("{source}: only {len} chars of content at {url}");
        return Err(Error::ContentTooShort {
            len,
            min: MIN_CONTENT_LEN,
        });
    }

    Ok(ChapterContent {
        content,
        url: url.to_string(),
        source,
    })
}
