use std::sync::Arc;

use async_trait::async_trait;
use plumblossom_lib::models::Snapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotRepositoryError {
    #[error("io error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    SerializeError(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// The snapshot on disk, read once and kept until invalidated. `None` when there is no file.
    async fn load(&self) -> Result<Option<Arc<Snapshot>>, SnapshotRepositoryError>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotRepositoryError>;

    /// Forgets the loaded snapshot so the next `load` reads the file again.
    async fn invalidate(&self);
}
