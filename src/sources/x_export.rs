use crate::config::XConfig;
use crate::timestamp;
use crate::traits::ContentSource;
use crate::types::{Article, Result};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// One element of the export array; the payload sits under an `item`-typed
/// wrapper field.
#[derive(Debug, Deserialize)]
struct TweetEntry {
    #[serde(default)]
    tweet: Tweet,
}

#[derive(Debug, Default, Deserialize)]
struct Tweet {
    #[serde(default)]
    id_str: String,
    #[serde(default)]
    full_text: String,
    #[serde(default)]
    created_at: String,
    /// Counters arrive as decimal strings in the export; tolerate bare
    /// numbers too.
    #[serde(default)]
    favorite_count: serde_json::Value,
    #[serde(default)]
    retweet_count: serde_json::Value,
    #[serde(default)]
    entities: Entities,
    in_reply_to_status_id_str: Option<String>,
    in_reply_to_screen_name: Option<String>,
    #[serde(default)]
    retweeted: bool,
    #[serde(default)]
    source: String,
    #[serde(default)]
    lang: String,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Entities {
    #[serde(default)]
    hashtags: Vec<Hashtag>,
    #[serde(default)]
    user_mentions: Vec<UserMention>,
    #[serde(default)]
    urls: Vec<EntityUrl>,
}

#[derive(Debug, Deserialize)]
struct Hashtag {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UserMention {
    #[serde(default)]
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct EntityUrl {
    expanded_url: Option<String>,
    #[serde(default)]
    url: String,
}

/// Extracts tweets from an X data export. The export ships a JavaScript
/// assignment, not a JSON document; the array literal is cut out of the
/// file before parsing.
pub struct XExportSource {
    data_path: PathBuf,
    handle: String,
    author: String,
    max_tweets: usize,
}

impl XExportSource {
    pub fn new(config: &XConfig, max_tweets: usize) -> Self {
        Self {
            data_path: config.data_path.clone(),
            handle: config.handle.clone(),
            author: config.author.clone(),
            max_tweets,
        }
    }

    /// Extracts articles from the raw `tweets.js` content. Separated from
    /// the file read so fixtures can drive it directly.
    pub fn parse_export(&self, content: &str) -> Vec<Article> {
        let assignment = Regex::new(r"(?s)window\.YTD\.tweets\.part0\s*=\s*(\[.*\])").unwrap();
        let json_data = match assignment.captures(content) {
            Some(captures) => captures.get(1).map(|m| m.as_str()).unwrap_or_default(),
            None => {
                error!("could not extract JSON data from tweets.js file");
                return Vec::new();
            }
        };

        let entries: Vec<TweetEntry> = match serde_json::from_str(json_data) {
            Ok(entries) => entries,
            Err(e) => {
                error!("failed to parse tweet export JSON: {e}");
                return Vec::new();
            }
        };

        info!("found {} tweets in the export file", entries.len());

        let mut articles = Vec::new();
        for entry in entries {
            if articles.len() >= self.max_tweets {
                break;
            }
            if let Some(article) = self.extract_tweet(entry.tweet) {
                articles.push(article);
            }
        }

        articles
    }

    fn extract_tweet(&self, tweet: Tweet) -> Option<Article> {
        // Identifier and body are both required; anything else degrades.
        if tweet.id_str.is_empty() || tweet.full_text.is_empty() {
            debug!("dropping export entry without id or text");
            return None;
        }

        let published_date = timestamp::parse_export_timestamp(&tweet.created_at);

        let likes = coerce_count(&tweet.favorite_count);
        let retweets = coerce_count(&tweet.retweet_count);

        let hashtags: Vec<String> = tweet.entities.hashtags.into_iter().map(|h| h.text).collect();
        let mentions: Vec<String> = tweet
            .entities
            .user_mentions
            .into_iter()
            .map(|m| m.screen_name)
            .collect();
        let urls: Vec<String> = tweet
            .entities
            .urls
            .into_iter()
            .map(|u| u.expanded_url.unwrap_or(u.url))
            .collect();

        let is_reply = tweet.in_reply_to_status_id_str.is_some();
        let is_retweet = tweet.retweeted;

        let mut tags = vec!["x".to_string(), "twitter".to_string()];
        if is_reply {
            tags.push("reply".to_string());
        }
        if is_retweet {
            tags.push("retweet".to_string());
        }
        tags.extend(hashtags.iter().take(3).map(|tag| format!("#{tag}")));

        let url = format!("https://x.com/{}/status/{}", self.handle, tweet.id_str);

        let title = if tweet.full_text.chars().count() > 50 {
            let prefix: String = tweet.full_text.chars().take(50).collect();
            format!("{prefix}...")
        } else {
            tweet.full_text.clone()
        };

        Some(Article {
            title,
            url,
            platform: "x".to_string(),
            content: Some(tweet.full_text),
            summary: None,
            published_date: Some(published_date),
            author: self.author.clone(),
            tags,
            engagement_metrics: Some(serde_json::json!({
                "likes": likes,
                "retweets": retweets,
                // Not present in the export format.
                "replies": 0,
            })),
            additional_data: Some(serde_json::json!({
                "tweet_id": tweet.id_str,
                "is_reply": is_reply,
                "is_retweet": is_retweet,
                "reply_to_status_id": tweet.in_reply_to_status_id_str,
                "reply_to_user": tweet.in_reply_to_screen_name,
                "hashtags": hashtags,
                "user_mentions": mentions,
                "urls": urls,
                "source": tweet.source,
                "lang": tweet.lang,
                "truncated": tweet.truncated,
            })),
            scraped_at: Utc::now(),
        })
    }
}

fn coerce_count(value: &serde_json::Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

#[async_trait]
impl ContentSource for XExportSource {
    fn platform(&self) -> &'static str {
        "x"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        let tweets_file = self.data_path.join("tweets.js");
        if !tweets_file.exists() {
            warn!("X tweets file does not exist: {}", tweets_file.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&tweets_file)?;
        let articles = self.parse_export(&content);

        info!("successfully processed {} X tweets", articles.len());
        Ok(articles)
    }
}
