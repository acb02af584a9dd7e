use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored article, joined with its source name where the source still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub source_id: Option<i64>,
    pub region_code: String,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub source_name: Option<String>,
}

/// Canonical article produced by the normalizer, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub source_id: Option<i64>,
    pub region_code: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
}

/// The one item shape every fetcher produces, regardless of source family.
/// All fields are optional; the normalizer applies the fallback policy.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
}
