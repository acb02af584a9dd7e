mod newsapi;
mod rss;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{RawItem, Source, SourceKind};

/// Capability interface for pulling raw items out of one external source.
/// Every implementation produces the same `RawItem` shape, so the
/// normalizer never sees adapter-specific fields.
pub trait FetchItems: Send + Sync {
    fn fetch_items(&self, source: &Source) -> impl Future<Output = Result<Vec<RawItem>>> + Send;
}

/// Production fetcher: dispatches on the source family.
pub struct FetchAdapter {
    client: Client,
    newsapi_key: Option<String>,
}

impl FetchAdapter {
    pub fn new(fetch_timeout: Duration, newsapi_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .user_agent("targeted-news/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            newsapi_key,
        }
    }
}

impl FetchItems for FetchAdapter {
    async fn fetch_items(&self, source: &Source) -> Result<Vec<RawItem>> {
        match source.kind {
            SourceKind::Rss => rss::fetch(&self.client, source).await,
            SourceKind::NewsApi => {
                newsapi::fetch(&self.client, source, self.newsapi_key.as_deref()).await
            }
        }
    }
}
