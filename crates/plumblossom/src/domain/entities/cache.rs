use std::sync::Arc;

use chrono::{DateTime, Utc};
use plumblossom_lib::models::Listing;
use serde::Serialize;

/// A listing together with the moment it was built
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub listing: Arc<Listing>,
    pub last_update: DateTime<Utc>,
}

impl ListingEntry {
    pub fn new(listing: Listing, last_update: DateTime<Utc>) -> Self {
        Self {
            listing: Arc::new(listing),
            last_update,
        }
    }
}

/// What a cache slot holds, regardless of freshness
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatus {
    pub count: usize,
    pub last_update: Option<DateTime<Utc>>,
}
