//! Feed client: builds query URLs for the aggregation endpoint, fetches and
//! parses the listing feed, and shapes entries into result records.

use std::time::Duration;

use reqwest::{redirect::Policy, Client};
use rss::Channel;
use tracing::{debug, info, warn};
use url::Url;

use crate::locale;
use crate::normalize;
use crate::resolver;
use crate::types::{AggregatorError, NewsConfig, NewsResult, RawListing, Result};

pub struct NewsClient {
    config: NewsConfig,
    feed_host: String,
    http: Client,
    head: Client,
}

impl NewsClient {
    /// Build a client from configuration. Language and country are normalized
    /// through the locale tables once, here.
    pub fn new(mut config: NewsConfig) -> Result<Self> {
        if config.max_results == 0 {
            return Err(AggregatorError::Config(
                "max_results must be positive".to_string(),
            ));
        }
        config.language = locale::language_code(&config.language);
        config.country = locale::country_code(&config.country);

        let feed_host = Url::parse(&config.base_url)?
            .host_str()
            .ok_or_else(|| {
                AggregatorError::Config(format!("base_url has no host: {}", config.base_url))
            })?
            .to_string();

        let http = build_client(&config, Policy::default())?;
        // Redirects are the payload for resolution, so this client must not
        // follow them.
        let head = build_client(&config, Policy::none())?;

        Ok(Self {
            config,
            feed_host,
            http,
            head,
        })
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// Client used for the one-hop redirect resolution; shared with anything
    /// else that needs a non-following transport.
    pub fn head_client(&self) -> &Client {
        &self.head
    }

    /// Search feed for a keyword query. An empty or whitespace-only query
    /// issues no request.
    pub async fn news_by_query(&self, query: &str) -> Result<Vec<NewsResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.search_url(query);
        self.fetch_feed(&url).await
    }

    /// The endpoint's front-page feed.
    pub async fn top_news(&self) -> Result<Vec<NewsResult>> {
        let url = format!("{}?{}", self.config.base_url, self.scope_params());
        self.fetch_feed(&url).await
    }

    /// Topic section feed. An unknown topic logs the valid set and yields an
    /// empty sequence rather than an error.
    pub async fn news_by_topic(&self, topic: &str) -> Result<Vec<NewsResult>> {
        let section = match locale::canonical_topic(topic) {
            Some(section) => section,
            None => {
                warn!(
                    "invalid topic {:?}; available topics are: {}",
                    topic,
                    locale::TOPICS.join(", ")
                );
                return Ok(Vec::new());
            }
        };
        let url = format!(
            "{}/headlines/section/topic/{}?{}",
            self.config.base_url,
            section,
            self.scope_params()
        );
        self.fetch_feed(&url).await
    }

    /// Geographic feed for a city, state or country. An empty location yields
    /// an empty sequence with a warning.
    pub async fn news_by_location(&self, location: &str) -> Result<Vec<NewsResult>> {
        let location = location.trim();
        if location.is_empty() {
            warn!("enter a valid location");
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/headlines/section/geo/{}?{}",
            self.config.base_url,
            urlencoding::encode(location),
            self.scope_params()
        );
        self.fetch_feed(&url).await
    }

    fn search_url(&self, query: &str) -> String {
        let mut q = urlencoding::encode(query).into_owned();
        if let Some(period) = &self.config.period {
            // Recency is a query operator on search feeds: "q when:30d".
            q.push_str("%20when%3A");
            q.push_str(period);
        }
        format!("{}/search?q={}&{}", self.config.base_url, q, self.scope_params())
    }

    fn scope_params(&self) -> String {
        let NewsConfig {
            language, country, ..
        } = &self.config;
        format!("ceid={country}:{language}&hl={language}&gl={country}")
    }

    /// Fetch and parse one listing feed, then run every entry through
    /// resolution and normalization in feed order.
    async fn fetch_feed(&self, url: &str) -> Result<Vec<NewsResult>> {
        debug!("fetching feed: {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        let channel = Channel::read_from(&bytes[..])
            .map_err(|e| AggregatorError::Parse(format!("failed to parse feed: {e}")))?;

        let mut results = Vec::new();
        for item in channel
            .into_items()
            .into_iter()
            .take(self.config.max_results)
        {
            let listing = RawListing::from(item);
            if let Some(resolved) = resolver::resolve(
                &self.head,
                &self.feed_host,
                &listing,
                &self.config.exclude_websites,
            )
            .await?
            {
                results.push(normalize::to_result(listing, resolved));
            }
        }
        info!("feed yielded {} results: {}", results.len(), url);
        Ok(results)
    }
}

fn build_client(config: &NewsConfig, redirect: Policy) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .redirect(redirect);
    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(
            reqwest::Proxy::all(proxy)
                .map_err(|e| AggregatorError::Config(format!("invalid proxy address: {e}")))?,
        );
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: NewsConfig) -> NewsClient {
        NewsClient::new(config).unwrap()
    }

    #[test]
    fn rejects_zero_max_results() {
        let config = NewsConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(matches!(
            NewsClient::new(config),
            Err(AggregatorError::Config(_))
        ));
    }

    #[test]
    fn search_url_carries_query_period_and_scope() {
        let config = NewsConfig {
            language: "english".to_string(),
            country: "United Kingdom".to_string(),
            period: Some("7d".to_string()),
            ..Default::default()
        };
        let url = client(config).search_url("rust language");
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=rust%20language%20when%3A7d&ceid=GB:en&hl=en&gl=GB"
        );
    }

    #[test]
    fn search_url_omits_period_when_unset() {
        let config = NewsConfig {
            period: None,
            ..Default::default()
        };
        let url = client(config).search_url("rust");
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=rust&ceid=US:en&hl=en&gl=US"
        );
    }
}
