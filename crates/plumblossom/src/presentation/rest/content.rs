use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{ApiError, ApiResponse};
use crate::domain::{repositories::source::SourceRepository, services::content::ContentService};

#[derive(Debug, Deserialize)]
pub struct Params {
    url: Option<String>,
    source: Option<String>,
}

pub async fn get_content<R>(
    Query(params): Query<Params>,
    Extension(svc): Extension<ContentService<R>>,
) -> Result<Response, ApiError>
where
    R: SourceRepository + Clone + 'static,
{
    let content = svc
        .fetch_content(
            params.source.as_deref().unwrap_or_default(),
            params.url.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::ok(content).into_response())
}
