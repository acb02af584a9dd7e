use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External source family. Determines which fetcher handles the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    NewsApi,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Rss => "rss",
            SourceKind::NewsApi => "newsapi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rss" => Some(SourceKind::Rss),
            "newsapi" => Some(SourceKind::NewsApi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub region_code: String,
    pub endpoint: String,
    pub name: String,
    pub kind: SourceKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSource {
    pub region_code: String,
    pub endpoint: String,
    pub name: String,
    pub kind: SourceKind,
}

/// Source joined with its region, for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct SourceWithRegion {
    pub id: i64,
    pub region_code: String,
    pub region_name: String,
    pub flag: Option<String>,
    pub endpoint: String,
    pub name: String,
    pub kind: SourceKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
