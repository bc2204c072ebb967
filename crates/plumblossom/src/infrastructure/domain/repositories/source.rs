use async_trait::async_trait;
use plumblossom_lib::models::{ChapterCandidate, ChapterContent, Language, SourceId, SourceInfo};
use plumblossom_scraper::bus::SourceBus;

use crate::domain::repositories::source::{SourceRepository, SourceRepositoryError};

#[derive(Clone)]
pub struct SourceRepositoryImpl {
    bus: SourceBus,
}

impl SourceRepositoryImpl {
    pub fn new(bus: SourceBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl SourceRepository for SourceRepositoryImpl {
    async fn sources(&self, language: Language) -> Vec<SourceInfo> {
        self.bus
            .by_language(language)
            .iter()
            .map(|s| s.get_source_info())
            .collect()
    }

    async fn get_chapters(
        &self,
        id: SourceId,
    ) -> Result<Vec<ChapterCandidate>, SourceRepositoryError> {
        Ok(self.bus.get_chapters(id).await?)
    }

    async fn get_content(
        &self,
        id: SourceId,
        url: &str,
    ) -> Result<ChapterContent, SourceRepositoryError> {
        Ok(self.bus.get_content(id, url).await?)
    }
}
