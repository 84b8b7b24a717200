//! Blocking execution mode: the same client surface with every fetch driven
//! to completion on an owned single-thread runtime, for callers without an
//! async context. URL construction and result shaping are the async client's
//! code, unchanged.

use tokio::runtime::{Builder, Runtime};

use crate::types::{NewsConfig, NewsResult, Result};

pub struct NewsClient {
    inner: crate::client::NewsClient,
    runtime: Runtime,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: crate::client::NewsClient::new(config)?,
            runtime,
        })
    }

    pub fn config(&self) -> &NewsConfig {
        self.inner.config()
    }

    pub fn news_by_query(&self, query: &str) -> Result<Vec<NewsResult>> {
        self.runtime.block_on(self.inner.news_by_query(query))
    }

    pub fn top_news(&self) -> Result<Vec<NewsResult>> {
        self.runtime.block_on(self.inner.top_news())
    }

    pub fn news_by_topic(&self, topic: &str) -> Result<Vec<NewsResult>> {
        self.runtime.block_on(self.inner.news_by_topic(topic))
    }

    pub fn news_by_location(&self, location: &str) -> Result<Vec<NewsResult>> {
        self.runtime.block_on(self.inner.news_by_location(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_short_circuit_without_io() {
        let client = NewsClient::new(NewsConfig::default()).unwrap();
        assert!(client.news_by_query("   ").unwrap().is_empty());
        assert!(client.news_by_topic("astrology").unwrap().is_empty());
        assert!(client.news_by_location("").unwrap().is_empty());
    }
}
