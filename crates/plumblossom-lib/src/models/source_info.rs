use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Language;
use crate::error::Error;

/// Tag naming the site a chapter was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Blogspot,
    Maehwasup,
    Skydemon,
}

impl SourceId {
    pub const ALL: [SourceId; 3] = [SourceId::Blogspot, SourceId::Maehwasup, SourceId::Skydemon];

    pub fn name(&self) -> &'static str {
        match self {
            SourceId::Blogspot => "blogspot",
            SourceId::Maehwasup => "maehwasup",
            SourceId::Skydemon => "skydemon",
        }
    }

    pub fn language(&self) -> Language {
        match self {
            SourceId::Blogspot => Language::Es,
            SourceId::Maehwasup | SourceId::Skydemon => Language::En,
        }
    }

    /// Origins sitting behind a bot challenge and reachable only through the resolver
    pub fn requires_bypass(&self) -> bool {
        matches!(self, SourceId::Skydemon)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| Error::InvalidSource(s.to_string()))
    }
}

/// A type represent a configured source
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    pub url: String,
    pub language: Language,
}
