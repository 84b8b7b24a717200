//! Listing resolution: decides whether a raw listing survives the publisher
//! exclusion list and, for aggregator tracking links, chases the single
//! redirect hop to the article's real URL.

use reqwest::header::LOCATION;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::types::{RawListing, Result};

/// True when the publisher href's hostname falls under one of the excluded
/// hostnames. Matching is case-insensitive, ignores a leading `www.`, and
/// treats the exclusion as a prefix of the hostname, so "cnn.com" drops
/// `http://www.cnn.com/rss` but keeps `http://notcnn.com`.
pub fn is_excluded(publisher_href: &str, exclusions: &[String]) -> bool {
    if exclusions.is_empty() {
        return false;
    }
    let host = match Url::parse(publisher_href) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_lowercase(),
            None => return false,
        },
        Err(_) => return false,
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    exclusions
        .iter()
        .any(|excluded| host.starts_with(&excluded.to_lowercase()))
}

/// True when a listing link is one of the aggregator's redirecting tracking
/// links: hosted on the feed endpoint itself, under an articles path.
pub fn is_aggregator_link(link: &str, feed_host: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => url.host_str() == Some(feed_host) && url.path().contains("/articles/"),
        Err(_) => false,
    }
}

/// Resolve a raw listing to its canonical URL, or `None` when the listing is
/// excluded or carries no link.
///
/// Tracking links get one HEAD request; the `location` response header wins,
/// and a response without one falls back to the original link. A HEAD
/// transport failure propagates so the whole fetch surfaces as failed.
pub async fn resolve(
    head_client: &Client,
    feed_host: &str,
    listing: &RawListing,
    exclusions: &[String],
) -> Result<Option<String>> {
    if let Some(publisher) = &listing.source {
        if is_excluded(&publisher.href, exclusions) {
            debug!("dropping listing from excluded publisher: {}", publisher.href);
            return Ok(None);
        }
    }

    let link = match &listing.link {
        Some(link) => link,
        None => {
            debug!("dropping listing without a link: {}", listing.title);
            return Ok(None);
        }
    };

    if is_aggregator_link(link, feed_host) {
        let response = head_client.head(link).send().await?;
        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
        {
            return Ok(Some(location.to_string()));
        }
        // No location header: keep the tracking link as-is.
    }

    Ok(Some(link.clone()))
}
