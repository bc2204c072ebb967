use axum::{extract::Extension, response::IntoResponse};
use serde_json::json;

use super::ApiResponse;
use crate::domain::{
    repositories::{cache::ListingCacheRepository, snapshot::SnapshotRepository, source::SourceRepository},
    services::chapter::ChapterService,
};

pub async fn clear_cache<C, R, S>(
    Extension(svc): Extension<ChapterService<C, R, S>>,
) -> impl IntoResponse
where
    C: ListingCacheRepository + Clone + 'static,
    R: SourceRepository + Clone + 'static,
    S: SnapshotRepository + Clone + 'static,
{
    svc.clear().await;

    ApiResponse::ok(json!({ "message": "cache cleared" }))
}
