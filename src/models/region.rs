use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the fixed geographic scopes articles are grouped by.
/// Seeded at bootstrap and effectively immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub flag: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionWithCount {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub flag: Option<String>,
    pub article_count: i64,
}
