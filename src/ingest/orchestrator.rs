use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::Repository;
use crate::error::Result;
use crate::feed::FetchItems;
use crate::models::Source;

use super::normalizer;

/// Totals for one refresh run. `processed` counts every article attempted
/// for persistence (duplicates included, matching the number reported to
/// clients); `inserted` counts the rows that actually landed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub inserted: usize,
}

/// Drives one refresh: snapshot the active sources, then sequentially
/// fetch, normalize and persist each one. A failing source is logged and
/// skipped; its siblings still run.
pub struct Ingestor<F> {
    repo: Arc<Repository>,
    fetcher: F,
    in_flight: Mutex<()>,
}

impl<F: FetchItems> Ingestor<F> {
    pub fn new(repo: Arc<Repository>, fetcher: F) -> Self {
        Self {
            repo,
            fetcher,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one refresh, unless another is already in flight. A concurrent
    /// request is skipped, not queued, and reported as None.
    pub async fn refresh(&self) -> Result<Option<RunSummary>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Ok(None);
        };

        self.run_once().await.map(Some)
    }

    async fn run_once(&self) -> Result<RunSummary> {
        let sources = self.repo.active_sources().await?;
        tracing::info!("Starting news fetch from {} sources", sources.len());

        let mut summary = RunSummary::default();

        for source in &sources {
            match self.refresh_source(source).await {
                Ok(report) => {
                    summary.processed += report.attempted;
                    summary.inserted += report.inserted;
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch from {} ({}): {}", source.name, source.region_code, e);
                }
            }
        }

        tracing::info!(
            "News fetch completed: {} articles processed, {} new",
            summary.processed,
            summary.inserted
        );

        Ok(summary)
    }

    async fn refresh_source(&self, source: &Source) -> Result<crate::db::InsertReport> {
        let items = self.fetcher.fetch_items(source).await?;
        tracing::debug!("Found {} items from {}", items.len(), source.name);

        let articles = items
            .into_iter()
            .map(|item| normalizer::normalize(item, source))
            .collect();

        self.repo.insert_articles(articles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::ingest::normalizer::TITLE_FALLBACK;
    use crate::models::{NewArticle, NewSource, RawItem, SourceKind};
    use chrono::Utc;

    /// Scripted fetcher keyed on the source endpoint.
    struct StubFetcher;

    impl FetchItems for StubFetcher {
        async fn fetch_items(&self, source: &Source) -> Result<Vec<RawItem>> {
            match source.endpoint.as_str() {
                "stub://kenya" => Ok(vec![
                    RawItem {
                        title: Some("Fresh headline".to_string()),
                        link: Some("https://example.com/fresh".to_string()),
                        description: Some("New story".to_string()),
                        ..RawItem::default()
                    },
                    RawItem {
                        // No title at all
                        link: Some("https://example.com/untitled".to_string()),
                        description: Some("Still a story".to_string()),
                        ..RawItem::default()
                    },
                    RawItem {
                        title: Some("Already stored".to_string()),
                        link: Some("https://example.com/dup".to_string()),
                        ..RawItem::default()
                    },
                ]),
                "stub://egypt" => Ok(vec![RawItem {
                    title: Some("Cairo update".to_string()),
                    link: Some("https://example.com/cairo".to_string()),
                    ..RawItem::default()
                }]),
                _ => Err(AppError::SourceUnavailable(format!(
                    "{}: connection refused",
                    source.endpoint
                ))),
            }
        }
    }

    async fn repo_with_source(dir: &tempfile::TempDir, region: &str, endpoint: &str) -> Arc<Repository> {
        let path = dir.path().join("news.db");
        let repo = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());
        repo.insert_source(NewSource {
            region_code: region.to_string(),
            endpoint: endpoint.to_string(),
            name: format!("{} stub", region),
            kind: SourceKind::Rss,
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn duplicate_and_untitled_items_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_with_source(&dir, "kenya", "stub://kenya").await;

        // One of the three fetched links is already stored
        repo.insert_articles(vec![NewArticle {
            source_id: None,
            region_code: "kenya".to_string(),
            title: "Already stored".to_string(),
            description: "Old copy".to_string(),
            link: "https://example.com/dup".to_string(),
            published_at: Utc::now(),
        }])
        .await
        .unwrap();

        let ingestor = Ingestor::new(repo.clone(), StubFetcher);
        let summary = ingestor.refresh().await.unwrap().unwrap();

        // All three are processed, but the duplicate is absorbed
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.inserted, 2);

        let stored = repo.articles_for_region("kenya").await.unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().any(|a| a.title == TITLE_FALLBACK));
    }

    #[tokio::test]
    async fn one_failing_source_does_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_with_source(&dir, "somalia", "stub://down").await;
        repo.insert_source(NewSource {
            region_code: "egypt".to_string(),
            endpoint: "stub://egypt".to_string(),
            name: "egypt stub".to_string(),
            kind: SourceKind::Rss,
        })
        .await
        .unwrap();

        let ingestor = Ingestor::new(repo.clone(), StubFetcher);
        let summary = ingestor.refresh().await.unwrap().unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.inserted, 1);
        assert_eq!(repo.articles_for_region("egypt").await.unwrap().len(), 1);
        assert!(repo.articles_for_region("somalia").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_refresh_is_skipped_while_one_runs() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_with_source(&dir, "egypt", "stub://egypt").await;

        let ingestor = Ingestor::new(repo, StubFetcher);
        let guard = ingestor.in_flight.lock().await;
        assert!(ingestor.refresh().await.unwrap().is_none());
        drop(guard);
        assert!(ingestor.refresh().await.unwrap().is_some());
    }
}
