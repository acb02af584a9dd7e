use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::ingest::RunSummary;

const CHANNEL_CAPACITY: usize = 16;

/// Event pushed to every connected subscriber after a scheduled refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshNotice {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub count: usize,
    pub inserted: usize,
}

/// Fan-out handle over a broadcast channel. Cloned freely; subscribers
/// that lag or disconnect never block the publisher.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<RefreshNotice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshNotice> {
        self.tx.subscribe()
    }

    /// Publish a refresh notice. Having no subscribers is not an error.
    pub fn notify_refreshed(&self, summary: &RunSummary) {
        let notice = RefreshNotice {
            timestamp: Utc::now(),
            message: format!(
                "Auto-refresh: {} articles processed, {} new",
                summary.processed, summary.inserted
            ),
            count: summary.processed,
            inserted: summary.inserted,
        };
        let _ = self.tx.send(notice);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
