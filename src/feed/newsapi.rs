use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{RawItem, Source};

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    articles: Option<Vec<NewsApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

/// Fetch headlines from a NewsAPI-style endpoint. The configured endpoint
/// carries the full query; authentication goes in the X-Api-Key header.
pub async fn fetch(client: &Client, source: &Source, api_key: Option<&str>) -> Result<Vec<RawItem>> {
    let Some(api_key) = api_key else {
        return Err(AppError::SourceUnavailable(format!(
            "{}: no NewsAPI key configured",
            source.endpoint
        )));
    };

    let response = client
        .get(&source.endpoint)
        .header("X-Api-Key", api_key)
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

    let payload: NewsApiResponse = response
        .json()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", source.endpoint, e)))?;

    if payload.status != "ok" {
        return Err(AppError::SourceUnavailable(format!(
            "{}: {} ({})",
            source.endpoint,
            payload.message.unwrap_or_else(|| "unknown error".to_string()),
            payload.code.unwrap_or_else(|| "no code".to_string()),
        )));
    }

    let items = payload
        .articles
        .unwrap_or_default()
        .into_iter()
        .map(|article| RawItem {
            title: article.title,
            link: article.url,
            description: article.description,
            content: article.content,
            published: article.published_at.as_deref().and_then(parse_timestamp),
        })
        .collect();

    Ok(items)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_decodes_with_camel_case_fields() {
        let json = r#"{
            "source": {"id": null, "name": "Nation Africa"},
            "author": "Jane Doe",
            "title": "Headline",
            "description": "A short description",
            "url": "https://example.com/story",
            "publishedAt": "2024-01-15T10:00:00Z",
            "content": "Full content here"
        }"#;

        let article: NewsApiArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.title.as_deref(), Some("Headline"));
        assert_eq!(
            parse_timestamp(article.published_at.as_deref().unwrap())
                .unwrap()
                .to_rfc3339(),
            "2024-01-15T10:00:00+00:00"
        );
    }

    #[test]
    fn error_payload_decodes_without_articles() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "bad key"}"#;
        let payload: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.status, "error");
        assert!(payload.articles.is_none());
    }
}
