use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
};

use super::{ApiError, ApiResponse};
use crate::domain::{
    repositories::{cache::ListingCacheRepository, snapshot::SnapshotRepository, source::SourceRepository},
    services::chapter::ChapterService,
};

pub async fn get_chapters<C, R, S>(
    Path(language): Path<String>,
    Extension(svc): Extension<ChapterService<C, R, S>>,
) -> Result<Response, ApiError>
where
    C: ListingCacheRepository + Clone + 'static,
    R: SourceRepository + Clone + 'static,
    S: SnapshotRepository + Clone + 'static,
{
    let entry = svc.get_chapters(&language).await?;

    Ok(ApiResponse::ok(entry.listing.as_ref())
        .with_total(entry.listing.len())
        .with_last_update(entry.last_update)
        .into_response())
}
