use axum::{extract::Extension, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiResponse;
use crate::domain::{
    repositories::{cache::ListingCacheRepository, snapshot::SnapshotRepository, source::SourceRepository},
    services::chapter::{ChapterService, ServiceStatus},
};

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
    #[serde(flatten)]
    service: ServiceStatus,
}

pub async fn health_check<C, R, S>(
    Extension(svc): Extension<ChapterService<C, R, S>>,
) -> impl IntoResponse
where
    C: ListingCacheRepository + Clone + 'static,
    R: SourceRepository + Clone + 'static,
    S: SnapshotRepository + Clone + 'static,
{
    ApiResponse::ok(Health {
        status: "online",
        timestamp: Utc::now(),
        version: plumblossom_lib::LIB_VERSION,
        service: svc.status().await,
    })
}
