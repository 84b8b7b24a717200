pub mod aggregator;
pub mod article;
pub mod blocking;
pub mod cache;
pub mod client;
pub mod locale;
pub mod normalize;
pub mod resolver;
pub mod types;

pub use aggregator::{NewsAggregator, TOP_NEWS_LABEL};
pub use article::{ArticleBody, ArticleBuilder, HttpArticleBuilder};
pub use cache::{NewsCache, CACHED_LABEL, DEFAULT_MIN_WORD_COUNT};
pub use client::NewsClient;
pub use types::*;
