use chrono::{DateTime, Utc};
use plumblossom_lib::models::SourceId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: SourceId,
    pub reason: String,
    pub at: DateTime<Utc>,
}
