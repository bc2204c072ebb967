use std::sync::Arc;

use plumblossom_lib::{
    error::{Error, Result},
    models::{ChapterCandidate, ChapterContent, Language, SourceId, SourceInfo},
    traits::Source,
};

/// Registry of the sources the service can talk to, in registration order.
#[derive(Clone, Default)]
pub struct SourceBus {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source`, replacing in place any source with the same id.
    pub fn insert(&mut self, source: Arc<dyn Source>) {
        let id = source.get_source_info().id;

        match self
            .sources
            .iter_mut()
            .find(|s| s.get_source_info().id == id)
        {
            Some(existing) => {
                info!("replacing source {id}");
                *existing = source;
            }
            None => {
                info!("registered source {id}");
                self.sources.push(source);
            }
        }
    }

    pub fn get(&self, id: SourceId) -> Result<Arc<dyn Source>> {
        self.sources
            .iter()
            .find(|s| s.get_source_info().id == id)
            .cloned()
            .ok_or_else(|| Error::InvalidSource(id.to_string()))
    }

    pub fn exist(&self, id: SourceId) -> bool {
        self.get(id).is_ok()
    }

    pub fn list(&self) -> Vec<SourceInfo> {
        self.sources.iter().map(|s| s.get_source_info()).collect()
    }

    pub fn by_language(&self, language: Language) -> Vec<Arc<dyn Source>> {
        self.sources
            .iter()
            .filter(|s| s.get_source_info().language == language)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub async fn get_chapters(&self, id: SourceId) -> Result<Vec<ChapterCandidate>> {
        self.get(id)?.get_chapters().await
    }

    pub async fn get_content(&self, id: SourceId, url: &str) -> Result<ChapterContent> {
        self.get(id)?.get_content(url).await
    }
}
