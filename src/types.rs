use serde::{Deserialize, Serialize};

use crate::locale;

/// Publisher descriptor carried on every record, taken from the feed item's
/// `<source url="...">` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub title: String,
}

/// One raw feed listing as returned by the aggregation endpoint, before
/// exclusion filtering and URL resolution. Never stored.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub title: String,
    pub link: Option<String>,
    pub description: String,
    pub published: String,
    pub source: Option<Publisher>,
}

impl From<rss::Item> for RawListing {
    fn from(item: rss::Item) -> Self {
        let source = item.source().map(|s| Publisher {
            href: s.url().to_string(),
            title: s.title().unwrap_or_default().to_string(),
        });
        Self {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().map(|l| l.to_string()),
            description: item.description().unwrap_or_default().to_string(),
            published: item.pub_date().unwrap_or_default().to_string(),
            source,
        }
    }
}

/// A normalized, deduplicated listing. The `url` is canonical (post
/// redirect-resolution) and serves as the record's identity everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_date: String,
    pub url: String,
    #[serde(default)]
    pub publisher: Publisher,
}

/// A result enriched with extracted body text and its derived word count.
/// Any persisted line carrying at least a `url` field deserializes into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_date: String,
    pub url: String,
    #[serde(default)]
    pub publisher: Publisher,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub word_count: usize,
}

impl NewsArticle {
    /// Promote a result to an article with the given body text.
    pub fn from_result(result: NewsResult, text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            title: result.title,
            description: result.description,
            published_date: result.published_date,
            url: result.url,
            publisher: result.publisher,
            text,
            word_count,
        }
    }
}

/// A cache slot: either a listing that still awaits its full-text build, or
/// an already-built article. Serialized untagged so both shapes persist as
/// flat JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CacheEntry {
    Result(NewsResult),
    Article(NewsArticle),
}

impl CacheEntry {
    pub fn url(&self) -> &str {
        match self {
            CacheEntry::Result(r) => &r.url,
            CacheEntry::Article(a) => &a.url,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CacheEntry::Result(r) => &r.title,
            CacheEntry::Article(a) => &a.title,
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self, CacheEntry::Article(_))
    }
}

/// Feed client configuration.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Language name or code; normalized through the locale table.
    pub language: String,
    /// Country name or code; normalized through the locale table.
    pub country: String,
    /// Cap on entries taken from one feed response. Must be positive.
    pub max_results: usize,
    /// Recency period rider for search feeds, e.g. "7d" or "30d".
    pub period: Option<String>,
    /// Publisher hostnames to drop, e.g. "cnn.com".
    pub exclude_websites: Vec<String>,
    /// Proxy address routed through for every request, e.g. "http://host:3128".
    pub proxy: Option<String>,
    /// Feed endpoint root. Overridden in tests to point at a local server.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "US".to_string(),
            max_results: 20,
            period: Some("30d".to_string()),
            exclude_websites: Vec::new(),
            proxy: None,
            base_url: locale::DEFAULT_BASE_URL.to_string(),
            user_agent: locale::DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cache file does not exist: {0}")]
    MissingCache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
