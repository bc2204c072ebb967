pub mod cache;
pub mod chapter;
pub mod content;
pub mod health;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::domain::services::{chapter::ChapterError, content::ContentError};

/// Envelope of every JSON body the server returns
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            total: None,
            last_update: None,
        }
    }

    pub fn with_total(self, total: usize) -> Self {
        Self {
            total: Some(total),
            ..self
        }
    }

    pub fn with_last_update(self, last_update: DateTime<Utc>) -> Self {
        Self {
            last_update: Some(last_update),
            ..self
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            total: None,
            last_update: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, ApiResponse::error(self.message)).into_response()
    }
}

impl From<ChapterError> for ApiError {
    fn from(e: ChapterError) -> Self {
        let status = match e {
            ChapterError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ChapterError::AggregateExtractionFailure { .. }
            | ChapterError::NoSources(_)
            | ChapterError::Snapshot(_) => {
                error!("listing failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        let status = match e {
            ContentError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ContentError::ContentTooShort { .. } => StatusCode::BAD_GATEWAY,
            ContentError::Source(_) => {
                error!("content failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: e.to_string(),
        }
    }
}

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "name": "plumblossom",
        "version": plumblossom_lib::LIB_VERSION,
        "endpoints": {
            "chapters_es": "/api/chapters/es",
            "chapters_en": "/api/chapters/en",
            "content": "/api/chapter/content?url=...&source=...",
            "clear_cache": "/api/cache/clear",
            "health": "/api/health"
        },
        "status": "online"
    }))
}

pub async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "endpoint not found".to_string(),
    }
}
