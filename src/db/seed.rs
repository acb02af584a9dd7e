use crate::error::Result;
use crate::models::{NewSource, SourceKind};

use super::Repository;

/// Tracked regions, inserted at every bootstrap with INSERT OR IGNORE.
pub const REGIONS: &[(&str, &str, &str)] = &[
    ("Eritrea", "eritrea", "\u{1F1EA}\u{1F1F7}"),
    ("Somalia", "somalia", "\u{1F1F8}\u{1F1F4}"),
    ("Sudan", "sudan", "\u{1F1F8}\u{1F1E9}"),
    ("Kenya", "kenya", "\u{1F1F0}\u{1F1EA}"),
    ("Egypt", "egypt", "\u{1F1EA}\u{1F1EC}"),
];

/// Curated starter feeds, applied only on request (`--seed-sources`).
pub const DEFAULT_SOURCES: &[(&str, &str, &str)] = &[
    (
        "eritrea",
        "http://www.shabait.com/feed",
        "Shabait Eritrea",
    ),
    (
        "eritrea",
        "https://allafrica.com/tools/headlines/rdf/eritrea/headlines.rdf",
        "AllAfrica Eritrea",
    ),
    (
        "somalia",
        "https://allafrica.com/tools/headlines/rdf/somalia/headlines.rdf",
        "AllAfrica Somalia",
    ),
    (
        "sudan",
        "https://allafrica.com/tools/headlines/rdf/sudan/headlines.rdf",
        "AllAfrica Sudan",
    ),
    (
        "sudan",
        "https://sudanow-magazine.net/feed",
        "Sudanow Magazine",
    ),
    (
        "kenya",
        "https://allafrica.com/tools/headlines/rdf/kenya/headlines.rdf",
        "AllAfrica Kenya",
    ),
    ("kenya", "https://www.the-star.co.ke/rss", "The Star Kenya"),
    (
        "egypt",
        "https://allafrica.com/tools/headlines/rdf/egypt/headlines.rdf",
        "AllAfrica Egypt",
    ),
    (
        "egypt",
        "https://www.dailynewsegypt.com/feed/",
        "Daily News Egypt",
    ),
];

/// Register the curated feeds. Returns how many were actually added;
/// already-registered endpoints are skipped.
pub async fn seed_default_sources(repo: &Repository) -> Result<usize> {
    let mut added = 0;

    for &(region_code, endpoint, name) in DEFAULT_SOURCES {
        let source = NewSource {
            region_code: region_code.to_string(),
            endpoint: endpoint.to_string(),
            name: name.to_string(),
            kind: SourceKind::Rss,
        };

        if repo.insert_source(source).await?.is_some() {
            tracing::info!("Added source {} for {}", name, region_code);
            added += 1;
        }
    }

    Ok(added)
}
