pub mod blogspot;
pub mod maehwasup;
pub mod skydemon;

use std::{sync::Arc, time::Duration};

use plumblossom_lib::error::Result;

pub use self::{blogspot::Blogspot, maehwasup::Maehwasup, skydemon::Skydemon};
use crate::{bus::SourceBus, fetch::Fetcher};

pub const BLOGSPOT_URL: &str =
    "https://animeshoy12.blogspot.com/p/el-regreso-de-la-secta-del-monte-hua_2.html";
pub const MAEHWASUP_URL: &str = "https://maehwasup.com/";
pub const SKYDEMON_URL: &str =
    "https://skydemonorder.com/projects/3801994495-return-of-the-mount-hua-sect";

/// Where each site lives and how patiently to talk to it
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub blogspot_url: String,
    pub maehwasup_url: String,
    pub skydemon_url: String,
    pub direct_timeout: Duration,
    pub bypass_timeout: Duration,
    pub content_bypass_timeout: Duration,
    pub page_delay: Duration,
    pub max_pages: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            blogspot_url: BLOGSPOT_URL.to_string(),
            maehwasup_url: MAEHWASUP_URL.to_string(),
            skydemon_url: SKYDEMON_URL.to_string(),
            direct_timeout: Duration::from_secs(30),
            bypass_timeout: Duration::from_secs(90),
            content_bypass_timeout: Duration::from_secs(60),
            page_delay: Duration::from_secs(1),
            max_pages: 50,
        }
    }
}

/// Registers every known site. Within a language, registration order is the
/// order candidates reach the unifier.
pub fn build_sources(fetcher: Arc<dyn Fetcher>, settings: &SourceSettings) -> Result<SourceBus> {
    let mut bus = SourceBus::new();

    bus.insert(Arc::new(Blogspot::new(fetcher.clone(), settings)?));
    bus.insert(Arc::new(Maehwasup::new(fetcher.clone(), settings)?));
    bus.insert(Arc::new(Skydemon::new(fetcher, settings)?));

    Ok(bus)
}
