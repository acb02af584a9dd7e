pub const SCHEMA: &str = r#"
-- regions table
CREATE TABLE IF NOT EXISTS regions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    flag TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- sources table
CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    region_code TEXT NOT NULL REFERENCES regions(code),
    endpoint TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL DEFAULT 'rss',
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(region_code, endpoint)
);

CREATE INDEX IF NOT EXISTS idx_sources_region_code ON sources(region_code);

-- articles table
-- source_id is a weak reference: articles outlive their source
-- link UNIQUE is the sole deduplication key
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER,
    region_code TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    link TEXT UNIQUE,
    published_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_articles_region_code ON articles(region_code);
CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at DESC);
"#;
