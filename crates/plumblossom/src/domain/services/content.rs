use plumblossom_lib::{
    error,
    models::{ChapterContent, SourceId},
};
use thiserror::Error;

use crate::domain::repositories::source::{SourceRepository, SourceRepositoryError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("content too short ({len} chars, expected at least {min}), page is probably blocked")]
    ContentTooShort { len: usize, min: usize },
    #[error("source error: {0}")]
    Source(#[from] SourceRepositoryError),
}

#[derive(Clone)]
pub struct ContentService<R>
where
    R: SourceRepository,
{
    repo: R,
}

impl<R> ContentService<R>
where
    R: SourceRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn fetch_content(&self, source: &str, url: &str) -> Result<ChapterContent, ContentError> {
        if source.is_empty() || url.is_empty() {
            return Err(ContentError::InvalidRequest(
                "parameters \"url\" and \"source\" are required".to_string(),
            ));
        }

        let source: SourceId = source
            .parse()
            .map_err(|e: error::Error| ContentError::InvalidRequest(e.to_string()))?;

        debug!("fetching content of {url} from {source}");

        match self.repo.get_content(source, url).await {
            Ok(content) => Ok(content),
            Err(SourceRepositoryError::SourceError(error::Error::ContentTooShort { len, min })) => {
                Err(ContentError::ContentTooShort { len, min })
            }
            Err(SourceRepositoryError::SourceError(e @ error::Error::InvalidSource(_))) => {
                Err(ContentError::InvalidRequest(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::domain::services::chapter::testing::FakeSources;

    fn prose() -> String {
        "Chung Myung sighed. ".repeat(40)
    }

    fn service() -> ContentService<Arc<FakeSources>> {
        ContentService::new(Arc::new(
            FakeSources::default()
                .with_source(SourceId::Maehwasup, Some(vec![]))
                .with_content("https://m.test/12", &prose())
                .with_content("https://m.test/blocked", "Just a moment..."),
        ))
    }

    #[tokio::test]
    async fn test_fetch_content() -> anyhow::Result<()> {
        let content = service()
            .fetch_content("maehwasup", "https://m.test/12")
            .await?;

        assert_eq!(content.source, SourceId::Maehwasup);
        assert_eq!(content.content, prose());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let svc = service();

        assert!(matches!(
            svc.fetch_content("", "https://m.test/12").await,
            Err(ContentError::InvalidRequest(_))
        ));
        assert!(matches!(
            svc.fetch_content("maehwasup", "").await,
            Err(ContentError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_or_unregistered_source() {
        let svc = service();

        assert!(matches!(
            svc.fetch_content("mangadex", "https://m.test/12").await,
            Err(ContentError::InvalidRequest(_))
        ));
        assert!(matches!(
            svc.fetch_content("blogspot", "https://b.test/1").await,
            Err(ContentError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_blocked_page() {
        let err = service()
            .fetch_content("maehwasup", "https://m.test/blocked")
            .await
            .unwrap_err();

        assert!(matches!(err, ContentError::ContentTooShort { len: 15, min: 500 }));
    }
}
