use feed_rs::parser;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{RawItem, Source};

/// Fetch an RSS/Atom feed and flatten its entries into raw items.
/// Network errors, non-success statuses and unparseable bodies all
/// surface as `SourceUnavailable`.
pub async fn fetch(client: &Client, source: &Source) -> Result<Vec<RawItem>> {
    let response = client
        .get(&source.endpoint)
        .send()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", source.endpoint, e)))?;

    if !response.status().is_success() {
        return Err(AppError::SourceUnavailable(format!(
            "{}: HTTP {}",
            source.endpoint,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", source.endpoint, e)))?;

    let feed = parser::parse(&bytes[..])
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", source.endpoint, e)))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| RawItem {
            title: entry.title.map(|t| t.content),
            link: entry.links.first().map(|l| l.href.clone()),
            description: entry.summary.map(|s| s.content),
            content: entry.content.and_then(|c| c.body),
            published: entry.published.or(entry.updated),
        })
        .collect();

    Ok(items)
}
