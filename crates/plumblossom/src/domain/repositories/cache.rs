use std::collections::BTreeMap;

use async_trait::async_trait;
use plumblossom_lib::models::{Language, Listing};

use crate::domain::entities::cache::{GroupStatus, ListingEntry};

#[async_trait]
pub trait ListingCacheRepository: Send + Sync {
    /// The group's listing if it was stored less than the TTL ago.
    async fn get(&self, language: Language) -> Option<ListingEntry>;

    /// Stores `listing` stamped with the current time, replacing any previous entry.
    async fn set(&self, language: Language, listing: Listing) -> ListingEntry;

    async fn clear(&self);

    async fn status(&self) -> BTreeMap<Language, GroupStatus>;
}
