use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{
    Article, NewArticle, NewSource, Region, RegionWithCount, Source, SourceKind, SourceWithRegion,
};

use super::schema::SCHEMA;
use super::seed;

/// Maximum rows returned for a region's news feed.
const REGION_FEED_LIMIT: i64 = 50;

pub struct Repository {
    conn: Connection,
}

/// Outcome of one article batch. `attempted` counts every row handed in,
/// `inserted` only the net-new rows; the difference that is not `failed`
/// was absorbed by the link uniqueness constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub attempted: usize,
    pub inserted: usize,
    pub failed: usize,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path.to_owned()).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            for &(name, code, flag) in seed::REGIONS {
                conn.execute(
                    "INSERT OR IGNORE INTO regions (name, code, flag) VALUES (?1, ?2, ?3)",
                    params![name, code, flag],
                )?;
            }
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Region operations

    pub async fn regions(&self) -> Result<Vec<Region>> {
        let regions = self
            .conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare("SELECT id, name, code, flag, created_at FROM regions ORDER BY name")?;
                let regions = stmt
                    .query_map([], |row| Ok(region_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(regions)
            })
            .await?;
        Ok(regions)
    }

    pub async fn regions_with_counts(&self) -> Result<Vec<RegionWithCount>> {
        let regions = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT r.id, r.name, r.code, r.flag, COUNT(a.id) as article_count
                       FROM regions r
                       LEFT JOIN articles a ON r.code = a.region_code
                       GROUP BY r.id
                       ORDER BY r.name"#,
                )?;
                let regions = stmt
                    .query_map([], |row| {
                        Ok(RegionWithCount {
                            id: row.get(0).unwrap(),
                            name: row.get(1).unwrap(),
                            code: row.get(2).unwrap(),
                            flag: row.get(3).unwrap(),
                            article_count: row.get(4).unwrap(),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(regions)
            })
            .await?;
        Ok(regions)
    }

    pub async fn region_exists(&self, code: &str) -> Result<bool> {
        let code = code.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM regions WHERE code = ?1",
                    params![code],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    // Source operations

    /// Idempotent insert: a duplicate region+endpoint pair is a no-op and
    /// returns None.
    pub async fn insert_source(&self, source: NewSource) -> Result<Option<i64>> {
        let id = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "INSERT OR IGNORE INTO sources (region_code, endpoint, name, kind) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        source.region_code,
                        source.endpoint,
                        source.name,
                        source.kind.as_str()
                    ],
                )?;
                if changed > 0 {
                    Ok(Some(conn.last_insert_rowid()))
                } else {
                    Ok(None)
                }
            })
            .await?;
        Ok(id)
    }

    pub async fn active_sources(&self) -> Result<Vec<Source>> {
        let sources = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, region_code, endpoint, name, kind, is_active, created_at
                     FROM sources WHERE is_active = 1 ORDER BY id",
                )?;
                let sources = stmt
                    .query_map([], |row| Ok(source_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(sources)
            })
            .await?;
        Ok(sources)
    }

    pub async fn all_sources(&self) -> Result<Vec<SourceWithRegion>> {
        let sources = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT s.id, s.region_code, r.name as region_name, r.flag,
                              s.endpoint, s.name, s.kind, s.is_active, s.created_at
                       FROM sources s
                       JOIN regions r ON s.region_code = r.code
                       ORDER BY r.name, s.name"#,
                )?;
                let sources = stmt
                    .query_map([], |row| {
                        Ok(SourceWithRegion {
                            id: row.get(0).unwrap(),
                            region_code: row.get(1).unwrap(),
                            region_name: row.get(2).unwrap(),
                            flag: row.get(3).unwrap(),
                            endpoint: row.get(4).unwrap(),
                            name: row.get(5).unwrap(),
                            kind: kind_from_column(row, 6),
                            is_active: row.get::<_, i64>(7).unwrap() != 0,
                            created_at: datetime_from_column(row, 8),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(sources)
            })
            .await?;
        Ok(sources)
    }

    pub async fn delete_source(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM sources WHERE id = ?1", params![id])?;
                Ok(changed > 0)
            })
            .await?;
        Ok(deleted)
    }

    // Article operations

    /// Insert a batch with insert-or-ignore semantics. A link-uniqueness
    /// conflict is treated as already present and skipped; any other row
    /// error is counted and does not abort the batch.
    pub async fn insert_articles(&self, articles: Vec<NewArticle>) -> Result<InsertReport> {
        if articles.is_empty() {
            return Ok(InsertReport::default());
        }

        let report = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(
                    "INSERT OR IGNORE INTO articles
                     (source_id, region_code, title, description, link, published_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;

                let mut report = InsertReport {
                    attempted: articles.len(),
                    ..InsertReport::default()
                };

                for article in &articles {
                    match stmt.execute(params![
                        article.source_id,
                        article.region_code,
                        article.title,
                        article.description,
                        article.link,
                        article.published_at.to_rfc3339(),
                    ]) {
                        Ok(changed) => report.inserted += changed,
                        Err(e) => {
                            tracing::debug!("Failed to save article {}: {}", article.link, e);
                            report.failed += 1;
                        }
                    }
                }

                Ok(report)
            })
            .await?;

        if report.failed > 0 {
            tracing::warn!("{} articles had errors saving", report.failed);
        }

        Ok(report)
    }

    /// Newest-first feed for one region, capped at 50 rows.
    pub async fn articles_for_region(&self, code: &str) -> Result<Vec<Article>> {
        let code = code.to_string();
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT a.id, a.source_id, a.region_code, a.title, a.description,
                              a.link, a.published_at, a.created_at, s.name as source_name
                       FROM articles a
                       LEFT JOIN sources s ON a.source_id = s.id
                       WHERE a.region_code = ?1
                       ORDER BY a.published_at DESC
                       LIMIT ?2"#,
                )?;
                let articles = stmt
                    .query_map(params![code, REGION_FEED_LIMIT], |row| {
                        Ok(article_from_row(row))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn datetime_from_column(row: &Row, idx: usize) -> DateTime<Utc> {
    row.get::<_, String>(idx)
        .ok()
        .and_then(|s| parse_datetime(&s))
        .unwrap_or_else(Utc::now)
}

fn kind_from_column(row: &Row, idx: usize) -> SourceKind {
    row.get::<_, String>(idx)
        .ok()
        .and_then(|s| SourceKind::parse(&s))
        .unwrap_or(SourceKind::Rss)
}

fn region_from_row(row: &Row) -> Region {
    Region {
        id: row.get(0).unwrap(),
        name: row.get(1).unwrap(),
        code: row.get(2).unwrap(),
        flag: row.get(3).unwrap(),
        created_at: datetime_from_column(row, 4),
    }
}

fn source_from_row(row: &Row) -> Source {
    Source {
        id: row.get(0).unwrap(),
        region_code: row.get(1).unwrap(),
        endpoint: row.get(2).unwrap(),
        name: row.get(3).unwrap(),
        kind: kind_from_column(row, 4),
        is_active: row.get::<_, i64>(5).unwrap() != 0,
        created_at: datetime_from_column(row, 6),
    }
}

fn article_from_row(row: &Row) -> Article {
    Article {
        id: row.get(0).unwrap(),
        source_id: row.get(1).unwrap(),
        region_code: row.get(2).unwrap(),
        title: row.get(3).unwrap(),
        description: row.get(4).unwrap(),
        link: row.get(5).unwrap(),
        published_at: row
            .get::<_, Option<String>>(6)
            .unwrap()
            .and_then(|s| parse_datetime(&s)),
        created_at: datetime_from_column(row, 7),
        source_name: row.get(8).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn open_repo(dir: &TempDir) -> Repository {
        let path = dir.path().join("news.db");
        Repository::new(path.to_str().unwrap()).await.unwrap()
    }

    fn article(region: &str, link: &str) -> NewArticle {
        NewArticle {
            source_id: None,
            region_code: region.to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            link: link.to_string(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn bootstrap_seeds_regions() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let regions = repo.regions().await.unwrap();
            assert_eq!(regions.len(), 5);
            assert!(regions.iter().any(|r| r.code == "kenya"));

            // Reopening must not duplicate the seed rows
            drop(repo);
            let repo = open_repo(&dir).await;
            assert_eq!(repo.regions().await.unwrap().len(), 5);
        });
    }

    #[test]
    fn insert_articles_is_idempotent_on_link() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let batch = vec![
                article("kenya", "https://example.com/a1"),
                article("kenya", "https://example.com/a2"),
            ];

            let first = repo.insert_articles(batch.clone()).await.unwrap();
            assert_eq!(first.attempted, 2);
            assert_eq!(first.inserted, 2);
            assert_eq!(first.failed, 0);

            // Same set again: attempted counts stay, nothing new lands
            let second = repo.insert_articles(batch).await.unwrap();
            assert_eq!(second.attempted, 2);
            assert_eq!(second.inserted, 0);
            assert_eq!(second.failed, 0);

            let stored = repo.articles_for_region("kenya").await.unwrap();
            assert_eq!(stored.len(), 2);
        });
    }

    #[test]
    fn empty_batch_returns_immediately() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let report = repo.insert_articles(Vec::new()).await.unwrap();
            assert_eq!(report, InsertReport::default());
        });
    }

    #[test]
    fn empty_links_collapse_to_first_row() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let mut first = article("sudan", "");
            first.title = "First".to_string();
            let mut second = article("sudan", "");
            second.title = "Second".to_string();

            let report = repo.insert_articles(vec![first, second]).await.unwrap();
            assert_eq!(report.inserted, 1);

            let stored = repo.articles_for_region("sudan").await.unwrap();
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].title, "First");
        });
    }

    #[test]
    fn source_insert_is_idempotent_and_delete_reports_missing() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let source = NewSource {
                region_code: "egypt".to_string(),
                endpoint: "https://example.com/feed".to_string(),
                name: "Example".to_string(),
                kind: SourceKind::Rss,
            };

            let id = repo.insert_source(source.clone()).await.unwrap();
            assert!(id.is_some());
            assert!(repo.insert_source(source).await.unwrap().is_none());

            assert!(repo.delete_source(id.unwrap()).await.unwrap());
            assert!(!repo.delete_source(id.unwrap()).await.unwrap());
        });
    }

    #[test]
    fn region_feed_joins_source_name() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let repo = open_repo(&dir).await;

            let source_id = repo
                .insert_source(NewSource {
                    region_code: "kenya".to_string(),
                    endpoint: "https://example.com/feed".to_string(),
                    name: "Example Feed".to_string(),
                    kind: SourceKind::Rss,
                })
                .await
                .unwrap()
                .unwrap();

            let mut item = article("kenya", "https://example.com/a1");
            item.source_id = Some(source_id);
            repo.insert_articles(vec![item]).await.unwrap();

            let stored = repo.articles_for_region("kenya").await.unwrap();
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].source_name.as_deref(), Some("Example Feed"));
        });
    }
}
