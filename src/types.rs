use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical normalized representation of one ingested item (article, post,
/// tweet, activity record). Immutable once built by an extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Identity key: globally unique across the collection. Synthesized for
    /// sources without a natural URL (see `identity::synthesized_url`).
    pub url: String,
    /// One of: "medium", "facebook", "x", "npblog".
    pub platform: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub author: String,
    /// Insertion order matters: the first tag signals the record subtype.
    pub tags: Vec<String>,
    /// Likes/retweets/replies-style counters.
    pub engagement_metrics: Option<serde_json::Value>,
    /// Free-form source-specific metadata (links, hashtags, reply flags).
    pub additional_data: Option<serde_json::Value>,
    pub scraped_at: DateTime<Utc>,
}

impl Article {
    /// Timestamp used for ordering: the published date when known, else the
    /// ingestion time. Never absent.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.published_date.unwrap_or(self.scraped_at)
    }
}

/// Counters for one storage run. Ephemeral: reported, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    pub total_articles: usize,
    pub stored_articles: usize,
    /// Defined for report parity with older tooling; no code path performs
    /// in-place updates, so this stays zero.
    pub updated_articles: usize,
    pub duplicate_articles: usize,
    pub errors: usize,
}

impl StorageStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_articles == 0 {
            return 0.0;
        }
        (self.stored_articles + self.updated_articles) as f64 / self.total_articles as f64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("URL already stored: {url}")]
    DuplicateUrl { url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// HTTP client settings shared by the fetching extractors.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Browser-identity header; feed hosts reject unidentified clients.
    pub user_agent: String,
    /// Applied to blog page fetches only. Feed fetches run without an
    /// explicit deadline.
    pub page_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            page_timeout_seconds: 10,
            max_retries: 2,
            retry_delay_seconds: 1,
        }
    }
}
