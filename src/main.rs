use std::path::PathBuf;

use clap::{Parser, Subcommand};
use news_aggregator::{
    HttpArticleBuilder, NewsAggregator, NewsCache, NewsClient, NewsConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "news-aggregator",
    about = "Fetch, deduplicate and cache news feed results"
)]
struct Cli {
    /// Feed language (name or code)
    #[arg(long, default_value = "en")]
    language: String,

    /// Feed country (name or code)
    #[arg(long, default_value = "US")]
    country: String,

    /// Maximum entries taken per feed
    #[arg(long, default_value_t = 20)]
    max_results: usize,

    /// Recency period for search feeds, e.g. 7d
    #[arg(long, default_value = "30d")]
    period: String,

    /// Publisher hostname to exclude; repeatable
    #[arg(long = "exclude", value_name = "HOST")]
    exclude: Vec<String>,

    /// Proxy address for all requests
    #[arg(long)]
    proxy: Option<String>,

    /// Pre-seed the seen-URL set from a previously saved file
    #[arg(long, value_name = "FILE")]
    seen_urls: Option<PathBuf>,

    /// Build full articles and append them to this file as JSON lines
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Minimum article word count kept when building
    #[arg(long, default_value_t = news_aggregator::DEFAULT_MIN_WORD_COUNT)]
    min_words: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Keyword search feed
    Search { query: String },
    /// Topic section feed (world, business, technology, ...)
    Topic { topic: String },
    /// Front-page top news
    Top,
    /// Geographic feed for a city, state or country
    Location { location: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = NewsConfig {
        language: cli.language,
        country: cli.country,
        max_results: cli.max_results,
        period: Some(cli.period),
        exclude_websites: cli.exclude,
        proxy: cli.proxy,
        ..Default::default()
    };

    let client = NewsClient::new(config.clone())?;
    let cache = NewsCache::new().with_min_word_count(cli.min_words);
    let aggregator = NewsAggregator::new(client, cache);

    if let Some(path) = &cli.seen_urls {
        let seeded = aggregator
            .cache_handle()
            .lock()
            .await
            .load_urls_from_cache(path)?;
        info!("seen-URL set seeded with {} urls", seeded);
    }

    let added = match &cli.command {
        Command::Search { query } => aggregator.cache_query(query).await,
        Command::Topic { topic } => aggregator.cache_topic(topic).await,
        Command::Top => aggregator.cache_top_news().await,
        Command::Location { location } => aggregator.cache_location(location).await,
    };
    info!("cached {} new results", added);

    if let Some(path) = &cli.save {
        let builder = HttpArticleBuilder::new(&config)?;
        aggregator.save(path, &builder, None, None).await?;
    } else {
        for entry in aggregator.results(None).await {
            println!("{}", serde_json::to_string(&entry)?);
        }
    }

    Ok(())
}
