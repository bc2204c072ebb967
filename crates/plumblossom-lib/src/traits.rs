use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChapterCandidate, ChapterContent, SourceInfo};

/// A site publishing chapters of the work.
///
/// Implementations fetch their own markup, so a failing site only fails its own call.
#[async_trait]
pub trait Source: Send + Sync {
    fn get_source_info(&self) -> SourceInfo;

    /// Every chapter currently listed by the site, ascending by number, one per number.
    async fn get_chapters(&self) -> Result<Vec<ChapterCandidate>>;

    async fn get_content(&self, url: &str) -> Result<ChapterContent>;
}
