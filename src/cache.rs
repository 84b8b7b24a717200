//! Accumulating result cache: groups result records under the query, topic
//! or feed label that produced them, while a global seen-URL set guarantees
//! every URL is recorded at most once across all labels.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::article::ArticleBuilder;
use crate::types::{AggregatorError, CacheEntry, NewsArticle, NewsResult, Result};

/// Label under which records reloaded from a persisted file are grouped.
pub const CACHED_LABEL: &str = "cached";

/// Entries whose built body falls below this many words are dropped by
/// `build_all` unless configured otherwise.
pub const DEFAULT_MIN_WORD_COUNT: usize = 350;

pub struct NewsCache {
    /// Labels in first-insertion order; flattening follows this.
    order: Vec<String>,
    entries: HashMap<String, Vec<CacheEntry>>,
    seen_urls: HashSet<String>,
    min_word_count: usize,
}

impl Default for NewsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsCache {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            seen_urls: HashSet::new(),
            min_word_count: DEFAULT_MIN_WORD_COUNT,
        }
    }

    pub fn with_min_word_count(mut self, min_word_count: usize) -> Self {
        self.min_word_count = min_word_count;
        self
    }

    pub fn seen_urls(&self) -> &HashSet<String> {
        &self.seen_urls
    }

    pub fn labels(&self) -> &[String] {
        &self.order
    }

    pub fn entries(&self, label: &str) -> Option<&[CacheEntry]> {
        self.entries.get(label).map(|list| list.as_slice())
    }

    fn slot(&mut self, label: &str) -> &mut Vec<CacheEntry> {
        if !self.entries.contains_key(label) {
            self.order.push(label.to_string());
        }
        self.entries.entry(label.to_string()).or_default()
    }

    /// Merge records into a label's list, skipping every URL already seen.
    /// URLs enter the seen-set as records are appended, so a duplicate within
    /// one batch is recorded once. The label is registered even when nothing
    /// survives. Returns how many records were appended.
    pub fn add_results<I>(&mut self, label: &str, results: I) -> usize
    where
        I: IntoIterator<Item = NewsResult>,
    {
        let mut fresh = Vec::new();
        for result in results {
            if self.seen_urls.contains(&result.url) {
                continue;
            }
            self.seen_urls.insert(result.url.clone());
            fresh.push(CacheEntry::Result(result));
        }
        let appended = fresh.len();
        self.slot(label).extend(fresh);
        appended
    }

    /// Build every not-yet-built entry into an article, then drop everything
    /// below the word-count minimum. Already-built entries pass through to
    /// the filter untouched. A failing build drops that entry only.
    pub async fn build_all(&mut self, builder: &dyn ArticleBuilder) {
        let labels = self.order.clone();
        for label in labels {
            let items = match self.entries.get_mut(&label) {
                Some(items) => std::mem::take(items),
                None => continue,
            };
            info!("building {} entries for label {:?}", items.len(), label);
            let mut kept = Vec::new();
            for entry in items {
                let article = match entry {
                    CacheEntry::Article(article) => article,
                    CacheEntry::Result(result) => {
                        let url = result.url.clone();
                        match builder.build(&url).await {
                            Ok(body) => NewsArticle::from_result(result, body.text),
                            Err(e) => {
                                warn!("dropping {}: build failed: {}", url, e);
                                continue;
                            }
                        }
                    }
                };
                if article.word_count >= self.min_word_count {
                    kept.push(CacheEntry::Article(article));
                }
            }
            info!("completed {} entries for label {:?}", kept.len(), label);
            self.entries.insert(label, kept);
        }
    }

    /// All entries whose label passes the filter, in label-insertion order
    /// then within-label order. `None` or an empty filter selects everything.
    pub fn flattened(&self, labels: Option<&[String]>) -> Vec<&CacheEntry> {
        let filter = labels.filter(|l| !l.is_empty());
        let mut flat = Vec::new();
        for label in &self.order {
            if let Some(filter) = filter {
                if !filter.iter().any(|wanted| wanted == label) {
                    continue;
                }
            }
            if let Some(items) = self.entries.get(label) {
                flat.extend(items.iter());
            }
        }
        flat
    }

    /// Build everything, then serialize the (filtered) flattened records one
    /// JSON object per line, optionally restricted to the given fields, with
    /// a trailing newline.
    pub async fn dump_as_text(
        &mut self,
        builder: &dyn ArticleBuilder,
        labels: Option<&[String]>,
        fields: Option<&[String]>,
    ) -> Result<String> {
        self.build_all(builder).await;
        let mut lines = Vec::new();
        for entry in self.flattened(labels) {
            let mut value = serde_json::to_value(entry)?;
            if let (Some(fields), serde_json::Value::Object(map)) = (fields, &mut value) {
                map.retain(|key, _| fields.iter().any(|wanted| wanted == key));
            }
            lines.push(value.to_string());
        }
        Ok(format!("{}\n", lines.join("\n")))
    }

    /// Append the dump to a file, creating it if needed. Never overwrites.
    pub async fn save_to(
        &mut self,
        path: &Path,
        builder: &dyn ArticleBuilder,
        labels: Option<&[String]>,
        fields: Option<&[String]>,
    ) -> Result<()> {
        let text = self.dump_as_text(builder, labels, fields).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .await?;
        file.write_all(text.as_bytes()).await?;
        info!("saved results to {}", path.display());
        Ok(())
    }

    /// Reload a persisted line-delimited file: every line becomes an article
    /// under the reserved `"cached"` label and its URL enters the seen-set.
    ///
    /// This deliberately bypasses `add_results`, so duplicate lines within
    /// the file are all appended. A missing file is a caller error.
    pub fn load_from_cache(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(AggregatorError::MissingCache(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut articles = Vec::new();
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            let article: NewsArticle = serde_json::from_str(line)?;
            self.seen_urls.insert(article.url.clone());
            articles.push(CacheEntry::Article(article));
        }
        let loaded = articles.len();
        let slot = self.slot(CACHED_LABEL);
        slot.extend(articles);
        info!("loaded {} cached records, cache size now {}", loaded, slot.len());
        Ok(loaded)
    }

    /// Pre-seed the seen-set from a persisted file without materializing any
    /// records. Returns the seen-set size afterwards.
    pub fn load_urls_from_cache(&mut self, path: &Path) -> Result<usize> {
        let contents = std::fs::read_to_string(path)?;
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            let value: serde_json::Value = serde_json::from_str(line)?;
            if let Some(url) = value.get("url").and_then(|url| url.as_str()) {
                self.seen_urls.insert(url.to_string());
            }
        }
        info!("total url cache: {}", self.seen_urls.len());
        Ok(self.seen_urls.len())
    }
}
