use news_aggregator::{blocking, NewsAggregator, NewsClient, NewsConfig};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A three-item feed in the aggregation endpoint's shape: one tracking link
/// that needs a redirect hop, one item from an excluded publisher, and one
/// direct link.
fn feed_xml(base: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>test feed</title><link>{base}</link><description>listing</description>
<item>
  <title>Tracked story</title>
  <link>{base}/articles/abc123?oc=5</link>
  <description>&lt;a href="https://paper.example.com/1"&gt;Tracked story&lt;/a&gt;&amp;nbsp;Example Paper</description>
  <pubDate>Tue, 04 Aug 2026 10:00:00 GMT</pubDate>
  <source url="https://paper.example.com">Example Paper</source>
</item>
<item>
  <title>Excluded story</title>
  <link>https://www.cnn.com/story</link>
  <description>from an excluded publisher</description>
  <pubDate>Tue, 04 Aug 2026 11:00:00 GMT</pubDate>
  <source url="http://www.cnn.com/rss">CNN</source>
</item>
<item>
  <title>Direct story</title>
  <link>https://direct.example.com/story</link>
  <description>no tracking involved</description>
  <pubDate>Tue, 04 Aug 2026 12:00:00 GMT</pubDate>
  <source url="https://direct.example.com">Direct</source>
</item>
</channel></rss>"#
    )
}

fn config_for(server: &MockServer) -> NewsConfig {
    NewsConfig {
        base_url: format!("{}/rss", server.uri()),
        exclude_websites: vec!["cnn.com".to_string()],
        ..Default::default()
    }
}

async fn mount_search_feed(server: &MockServer) {
    let base = format!("{}/rss", server.uri());
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed_xml(&base))
                .insert_header("content-type", "application/rss+xml"),
        )
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/rss/articles/abc123"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://paper.example.com/real"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn search_resolves_excludes_and_normalizes() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let server = MockServer::start().await;
    mount_search_feed(&server).await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    let results = client.news_by_query("rust lang").await.unwrap();

    assert_eq!(results.len(), 2);

    // Tracking link replaced by the HEAD response's location header.
    assert_eq!(results[0].title, "Tracked story");
    assert_eq!(results[0].url, "https://paper.example.com/real");
    assert_eq!(results[0].description, "Tracked story Example Paper");
    assert_eq!(results[0].publisher.href, "https://paper.example.com");
    assert_eq!(results[0].publisher.title, "Example Paper");
    assert_eq!(results[0].published_date, "Tue, 04 Aug 2026 10:00:00 GMT");

    // The excluded publisher's entry is gone; the direct link is untouched.
    assert_eq!(results[1].title, "Direct story");
    assert_eq!(results[1].url, "https://direct.example.com/story");
}

#[tokio::test]
async fn search_url_carries_scoping_parameters() {
    let server = MockServer::start().await;
    let base = format!("{}/rss", server.uri());
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .and(query_param("q", "rust when:30d"))
        .and(query_param("hl", "en"))
        .and(query_param("gl", "US"))
        .and(query_param("ceid", "US:en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&base)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    client.news_by_query("rust").await.unwrap();
}

#[tokio::test]
async fn missing_location_header_keeps_original_link() {
    let server = MockServer::start().await;
    let base = format!("{}/rss", server.uri());
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&base)))
        .mount(&server)
        .await;
    // HEAD answers without a location header.
    Mock::given(method("HEAD"))
        .and(path("/rss/articles/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    let results = client.news_by_query("rust").await.unwrap();
    assert_eq!(results[0].url, format!("{base}/articles/abc123?oc=5"));
}

#[tokio::test]
async fn max_results_caps_entries_before_filtering() {
    let server = MockServer::start().await;
    mount_search_feed(&server).await;

    let config = NewsConfig {
        max_results: 2,
        ..config_for(&server)
    };
    let client = NewsClient::new(config).unwrap();
    let results = client.news_by_query("rust").await.unwrap();

    // The cap keeps the first two feed entries; the excluded one then drops.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Tracked story");
}

#[tokio::test]
async fn empty_query_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    assert!(client.news_by_query("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_topic_is_empty_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    assert!(client.news_by_topic("nonexistent").await.unwrap().is_empty());
}

#[tokio::test]
async fn known_topic_hits_its_uppercased_section() {
    let server = MockServer::start().await;
    let base = format!("{}/rss", server.uri());
    Mock::given(method("GET"))
        .and(path("/rss/headlines/section/topic/TECHNOLOGY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&base)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    let results = client.news_by_topic("technology").await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn location_feed_and_empty_location() {
    let server = MockServer::start().await;
    let base = format!("{}/rss", server.uri());
    Mock::given(method("GET"))
        .and(path("/rss/headlines/section/geo/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&base)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    assert_eq!(client.news_by_location("Berlin").await.unwrap().len(), 2);
    assert!(client.news_by_location("  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn transport_failure_surfaces_as_error_and_caches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    assert!(client.news_by_query("rust").await.is_err());

    // The aggregator downgrades the failure to an empty merge.
    let client = NewsClient::new(config_for(&server)).unwrap();
    let aggregator = NewsAggregator::new(client, news_aggregator::NewsCache::new());
    assert_eq!(aggregator.cache_query("rust").await, 0);
    assert!(aggregator.cache_handle().lock().await.labels().is_empty());
}

#[tokio::test]
async fn aggregator_dedupes_repeated_fetches() {
    let server = MockServer::start().await;
    mount_search_feed(&server).await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    let aggregator = NewsAggregator::new(client, news_aggregator::NewsCache::new());

    assert_eq!(aggregator.cache_query("rust").await, 2);
    assert_eq!(aggregator.cache_query("rust").await, 0);
    // Same URLs under a different label are already claimed.
    assert_eq!(aggregator.cache_query("rust news").await, 0);

    let entries = aggregator.results(None).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].url(), "https://paper.example.com/real");
}

#[tokio::test]
async fn concurrent_fetches_keep_urls_unique() {
    let server = MockServer::start().await;
    mount_search_feed(&server).await;

    let client = NewsClient::new(config_for(&server)).unwrap();
    let aggregator = NewsAggregator::new(client, news_aggregator::NewsCache::new());

    // Both fetches return the same URLs; the cache lock ensures only one
    // fetch claims each of them.
    let (a, b) = tokio::join!(
        aggregator.cache_query("rust"),
        aggregator.cache_query("rust lang"),
    );
    assert_eq!(a + b, 2);

    let cache = aggregator.cache_handle();
    let cache = cache.lock().await;
    assert_eq!(cache.seen_urls().len(), 2);
    assert_eq!(cache.flattened(None).len(), 2);
}

#[test]
fn blocking_client_produces_the_same_results() {
    // The mock server needs a live runtime of its own; the blocking client
    // brings one per instance.
    let server_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .unwrap();
    let server = server_rt.block_on(async {
        let server = MockServer::start().await;
        mount_search_feed(&server).await;
        server
    });

    let client = blocking::NewsClient::new(config_for(&server)).unwrap();
    let results = client.news_by_query("rust lang").unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://paper.example.com/real");
    assert_eq!(results[1].url, "https://direct.example.com/story");

    // Shut the mock server down on its own runtime.
    server_rt.block_on(async move { drop(server) });
}
