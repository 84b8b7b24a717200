//! The build gateway: the seam through which cached results are enriched
//! into full articles. Real readability-grade extraction lives behind the
//! trait; the shipped implementation just collects a page's visible text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::types::{AggregatorError, NewsConfig, Result};

/// Extracted article body, as produced by a builder.
#[derive(Debug, Clone)]
pub struct ArticleBody {
    pub text: String,
}

/// Produces a full article body for a URL. May fail per URL; the cache drops
/// failing entries without aborting the batch.
#[async_trait]
pub trait ArticleBuilder: Send + Sync {
    async fn build(&self, url: &str) -> Result<ArticleBody>;
}

/// Plain page-text builder: GET the article page and keep the body's visible
/// text, whitespace-collapsed. No extraction heuristics.
pub struct HttpArticleBuilder {
    http: Client,
}

impl HttpArticleBuilder {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .brotli(true);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy)
                    .map_err(|e| AggregatorError::Config(format!("invalid proxy address: {e}")))?,
            );
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl ArticleBuilder for HttpArticleBuilder {
    async fn build(&self, url: &str) -> Result<ArticleBody> {
        debug!("building article from {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let html = response.text().await?;
        Ok(ArticleBody {
            text: page_text(&html),
        })
    }
}

fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body").expect("static selector");
    let text: String = match document.select(&selector).next() {
        Some(body) => body.text().collect(),
        None => document.root_element().text().collect(),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
