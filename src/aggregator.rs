//! Fetch-and-cache coordination. The aggregator owns the feed client and a
//! shared cache handle; every cache mutation goes through one lock so
//! concurrent fetches cannot race the seen-URL set.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use crate::article::ArticleBuilder;
use crate::cache::NewsCache;
use crate::client::NewsClient;
use crate::types::{CacheEntry, NewsConfig, NewsResult, Result};

/// Label under which front-page results are grouped.
pub const TOP_NEWS_LABEL: &str = "top_news";

pub struct NewsAggregator {
    client: NewsClient,
    cache: Arc<Mutex<NewsCache>>,
}

impl NewsAggregator {
    pub fn new(client: NewsClient, cache: NewsCache) -> Self {
        Self {
            client,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn from_config(config: NewsConfig) -> Result<Self> {
        Ok(Self::new(NewsClient::new(config)?, NewsCache::new()))
    }

    pub fn client(&self) -> &NewsClient {
        &self.client
    }

    /// Shared handle to the cache; clones see the same state.
    pub fn cache_handle(&self) -> Arc<Mutex<NewsCache>> {
        self.cache.clone()
    }

    /// Fetch a keyword search and merge the results under the query string.
    /// Fetch failures are logged and cache nothing, so callers observe the
    /// same empty outcome as a query with no hits.
    pub async fn cache_query(&self, query: &str) -> usize {
        let results = self.fetch_or_empty(self.client.news_by_query(query).await, query);
        self.merge(query, results).await
    }

    /// Fetch a topic section and merge under the topic name.
    pub async fn cache_topic(&self, topic: &str) -> usize {
        let results = self.fetch_or_empty(self.client.news_by_topic(topic).await, topic);
        self.merge(topic, results).await
    }

    /// Fetch the front page and merge under the reserved top-news label.
    pub async fn cache_top_news(&self) -> usize {
        let results = self.fetch_or_empty(self.client.top_news().await, TOP_NEWS_LABEL);
        self.merge(TOP_NEWS_LABEL, results).await
    }

    /// Fetch a geographic feed and merge under the location string.
    pub async fn cache_location(&self, location: &str) -> usize {
        let results = self.fetch_or_empty(self.client.news_by_location(location).await, location);
        self.merge(location, results).await
    }

    fn fetch_or_empty(&self, fetched: Result<Vec<NewsResult>>, label: &str) -> Vec<NewsResult> {
        match fetched {
            Ok(results) => results,
            Err(e) => {
                error!("fetch for {:?} failed: {}", label, e);
                Vec::new()
            }
        }
    }

    async fn merge(&self, label: &str, results: Vec<NewsResult>) -> usize {
        // An empty fetch does not register the label.
        if results.is_empty() {
            return 0;
        }
        self.cache.lock().await.add_results(label, results)
    }

    /// Build every cached result into an article and apply the word-count
    /// filter.
    pub async fn build_all(&self, builder: &dyn ArticleBuilder) {
        self.cache.lock().await.build_all(builder).await;
    }

    /// Build, then append the serialized records to `path`.
    pub async fn save(
        &self,
        path: &Path,
        builder: &dyn ArticleBuilder,
        labels: Option<&[String]>,
        fields: Option<&[String]>,
    ) -> Result<()> {
        self.cache
            .lock()
            .await
            .save_to(path, builder, labels, fields)
            .await
    }

    /// Snapshot of the flattened cache contents for the given labels.
    pub async fn results(&self, labels: Option<&[String]>) -> Vec<CacheEntry> {
        self.cache
            .lock()
            .await
            .flattened(labels)
            .into_iter()
            .cloned()
            .collect()
    }
}
