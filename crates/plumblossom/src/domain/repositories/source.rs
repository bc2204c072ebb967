use async_trait::async_trait;
use plumblossom_lib::models::{ChapterCandidate, ChapterContent, Language, SourceId, SourceInfo};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceRepositoryError {
    #[error("{0}")]
    SourceError(#[from] plumblossom_lib::error::Error),
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Sources feeding `language`, in configuration order.
    async fn sources(&self, language: Language) -> Vec<SourceInfo>;

    async fn get_chapters(&self, id: SourceId)
    -> Result<Vec<ChapterCandidate>, SourceRepositoryError>;

    async fn get_content(
        &self,
        id: SourceId,
        url: &str,
    ) -> Result<ChapterContent, SourceRepositoryError>;
}
