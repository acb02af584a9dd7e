use std::sync::Arc;
use std::time::Duration;

use crate::feed::FetchItems;
use crate::notify::Notifier;

use super::Ingestor;

/// Periodic refresh driver: one delayed initial run after startup, then a
/// fixed-interval loop. Completed runs are broadcast to subscribers; a
/// failed run is skipped and the timer simply continues.
pub struct Scheduler<F> {
    ingestor: Arc<Ingestor<F>>,
    notifier: Notifier,
    interval: Duration,
    initial_delay: Duration,
}

impl<F: FetchItems> Scheduler<F> {
    pub fn new(
        ingestor: Arc<Ingestor<F>>,
        notifier: Notifier,
        interval: Duration,
        initial_delay: Duration,
    ) -> Self {
        Self {
            ingestor,
            notifier,
            interval,
            initial_delay,
        }
    }

    pub async fn run(self) {
        tokio::time::sleep(self.initial_delay).await;
        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn tick(&self) {
        tracing::info!("Auto-refreshing news");
        match self.ingestor.refresh().await {
            Ok(Some(summary)) => {
                self.notifier.notify_refreshed(&summary);
                tracing::info!("Auto-refresh completed: {} articles", summary.processed);
            }
            Ok(None) => {
                tracing::warn!("Previous refresh still running, skipping this tick");
            }
            Err(e) => {
                tracing::error!("Auto-refresh failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Repository;
    use crate::error::Result;
    use crate::models::{RawItem, Source};

    struct EmptyFetcher;

    impl FetchItems for EmptyFetcher {
        async fn fetch_items(&self, _source: &Source) -> Result<Vec<RawItem>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn every_tick_publishes_one_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.db");
        let repo = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());

        let notifier = Notifier::new();
        let mut notices = notifier.subscribe();

        let scheduler = Scheduler::new(
            Arc::new(Ingestor::new(repo, EmptyFetcher)),
            notifier,
            Duration::from_secs(600),
            Duration::from_secs(0),
        );

        scheduler.tick().await;
        scheduler.tick().await;

        let first = notices.recv().await.unwrap();
        let second = notices.recv().await.unwrap();
        assert_eq!(first.count, 0);
        assert_eq!(second.count, 0);
        assert!(!first.message.is_empty());
        assert!(second.timestamp >= first.timestamp);
    }
}
