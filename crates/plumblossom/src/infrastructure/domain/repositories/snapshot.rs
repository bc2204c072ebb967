use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use plumblossom_lib::models::Snapshot;
use tokio::sync::RwLock;

use crate::domain::repositories::snapshot::{SnapshotRepository, SnapshotRepositoryError};

#[derive(Clone)]
pub struct SnapshotRepositoryImpl {
    path: PathBuf,
    loaded: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotRepositoryImpl {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: PathBuf::new().join(path),
            loaded: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotRepository for SnapshotRepositoryImpl {
    async fn load(&self) -> Result<Option<Arc<Snapshot>>, SnapshotRepositoryError> {
        if let Some(snapshot) = self.loaded.read().await.as_ref() {
            return Ok(Some(snapshot.clone()));
        }

        let mut loaded = self.loaded.write().await;
        if let Some(snapshot) = loaded.as_ref() {
            return Ok(Some(snapshot.clone()));
        }

        let encoded = match tokio::fs::read(&self.path).await {
            Ok(encoded) => encoded,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no snapshot at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Arc<Snapshot> = Arc::new(serde_json::from_slice(&encoded)?);
        info!(
            "loaded snapshot from {:?}, last update {}",
            self.path, snapshot.last_update
        );
        *loaded = Some(snapshot.clone());

        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotRepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let encoded = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, &encoded).await?;
        info!("wrote snapshot to {:?}", self.path);

        *self.loaded.write().await = Some(Arc::new(snapshot.clone()));

        Ok(())
    }

    async fn invalidate(&self) {
        *self.loaded.write().await = None;
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use plumblossom_lib::models::{ChapterCandidate, Language, Listing, SourceId};

    use super::*;

    fn snapshot() -> Snapshot {
        let chapter = ChapterCandidate::new(
            7,
            "Capítulo 7",
            "https://b.test/7".to_string(),
            SourceId::Blogspot,
        );

        Snapshot::new(
            Utc::now(),
            BTreeMap::from([(Language::Es, Listing::Candidates(vec![chapter.clone()]))]),
            BTreeMap::from([(SourceId::Blogspot, vec![chapter])]),
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_none() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let repo = SnapshotRepositoryImpl::new(dir.path().join("chapters.json"));

        assert!(repo.load().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_from_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data").join("chapters.json");

        SnapshotRepositoryImpl::new(&path).save(&snapshot()).await?;

        let loaded = SnapshotRepositoryImpl::new(&path).load().await?.unwrap();
        assert_eq!(loaded.listing(Language::Es).map(|l| l.numbers()), Some(vec![7]));
        assert_eq!(loaded.stats.sources[&SourceId::Blogspot], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalidate_rereads_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("chapters.json");
        let repo = SnapshotRepositoryImpl::new(&path);
        repo.save(&snapshot()).await?;
        assert!(repo.load().await?.is_some());

        tokio::fs::remove_file(&path).await?;
        assert!(repo.load().await?.is_some());

        repo.invalidate().await;
        assert!(repo.load().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("chapters.json");
        tokio::fs::write(&path, b"{ not json").await?;

        let err = SnapshotRepositoryImpl::new(&path).load().await.unwrap_err();

        assert!(matches!(err, SnapshotRepositoryError::SerializeError(_)));
        Ok(())
    }
}
