use crate::config::MediumConfig;
use crate::fetcher::Fetcher;
use crate::traits::ContentSource;
use crate::types::{Article, FetchConfig, PipelineError, Result};
use async_trait::async_trait;
use chrono::Utc;
use scraper::{Html, Selector};
use tracing::{info, warn};

/// How many paragraphs of the embedded rich-content body are kept.
const MAX_BODY_PARAGRAPHS: usize = 10;

/// Extracts a user's Medium articles from their RSS feed. The feed is the
/// only reliable discovery mechanism Medium exposes without authentication.
pub struct MediumRssSource {
    username: String,
    max_articles: usize,
    fetcher: Fetcher,
}

impl MediumRssSource {
    pub fn new(config: &MediumConfig, fetch: &FetchConfig, max_articles: usize) -> Self {
        Self {
            username: config.username.clone(),
            max_articles,
            fetcher: Fetcher::new(fetch.clone()),
        }
    }

    pub fn feed_url(&self) -> String {
        format!("https://medium.com/feed/@{}", self.username)
    }

    /// Maps a fetched feed document to articles. Separated from the fetch so
    /// fixture documents can drive it directly.
    pub fn parse_feed(&self, content: &str) -> Result<Vec<Article>> {
        let feed = feed_rs::parser::parse(content.as_bytes())
            .map_err(|e| PipelineError::Parse(format!("failed to parse feed: {e}")))?;

        let mut articles = Vec::new();

        for (index, entry) in feed.entries.into_iter().enumerate() {
            if articles.len() >= self.max_articles {
                break;
            }

            let title = entry
                .title
                .map(|t| t.content)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Medium Article {}", index + 1));

            // No link means no identity; the item is dropped, not the batch.
            let url = match entry.links.first() {
                Some(link) => link.href.clone(),
                None => {
                    warn!("skipping feed item without a link: {title}");
                    continue;
                }
            };

            let scraped_at = Utc::now();
            let published_date = entry.published.map(|dt| dt.with_timezone(&Utc));

            let content = entry
                .content
                .and_then(|c| c.body)
                .map(|body| clean_rss_body(&body))
                .unwrap_or_default();

            let tags = entry
                .categories
                .into_iter()
                .map(|c| c.term)
                .collect();

            articles.push(Article {
                title,
                url,
                platform: "medium".to_string(),
                content: Some(content),
                summary: None,
                published_date: Some(published_date.unwrap_or(scraped_at)),
                author: self.username.clone(),
                tags,
                // Not available over RSS.
                engagement_metrics: Some(serde_json::json!({})),
                additional_data: None,
                scraped_at,
            });
        }

        Ok(articles)
    }
}

/// Strips the embedded HTML body down to plain text: images discarded,
/// first `MAX_BODY_PARAGRAPHS` paragraphs joined.
fn clean_rss_body(body: &str) -> String {
    let fragment = Html::parse_fragment(body);
    let paragraphs = Selector::parse("p").unwrap();

    fragment
        .select(&paragraphs)
        .take(MAX_BODY_PARAGRAPHS)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl ContentSource for MediumRssSource {
    fn platform(&self) -> &'static str {
        "medium"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        let url = self.feed_url();
        info!("fetching Medium feed: {url}");

        let content = self.fetcher.fetch_feed(&url).await?;
        let articles = self.parse_feed(&content)?;

        info!(
            "extracted {} Medium articles for @{}",
            articles.len(),
            self.username
        );
        Ok(articles)
    }
}
