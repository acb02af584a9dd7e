use chrono::Utc;

use crate::models::{NewArticle, RawItem, Source};

pub const TITLE_FALLBACK: &str = "No title available";
pub const DESCRIPTION_FALLBACK: &str = "No description available";

pub const TITLE_MAX_CHARS: usize = 500;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Map one raw item into a store-ready article.
///
/// Fallbacks, in priority order: missing or empty titles get a literal
/// placeholder; descriptions fall back to the item's content body, then a
/// placeholder; a missing link becomes the empty string (and collides
/// under the store's uniqueness key, first one wins); a missing
/// publication time becomes the current wall-clock time. Title and
/// description are then truncated, never rejected.
pub fn normalize(item: RawItem, source: &Source) -> NewArticle {
    let title = item
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_FALLBACK.to_string());

    let description = item
        .description
        .filter(|d| !d.is_empty())
        .or(item.content.filter(|c| !c.is_empty()))
        .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string());

    NewArticle {
        source_id: Some(source.id),
        region_code: source.region_code.clone(),
        title: truncate_chars(title, TITLE_MAX_CHARS),
        description: truncate_chars(description, DESCRIPTION_MAX_CHARS),
        link: item.link.unwrap_or_default(),
        published_at: item.published.unwrap_or_else(Utc::now),
    }
}

fn truncate_chars(value: String, max: usize) -> String {
    if value.chars().count() <= max {
        value
    } else {
        value.chars().take(max).collect()
    }
}
