pub mod memory;
pub mod postgres;

pub use memory::MemoryArticleStore;
pub use postgres::PgArticleStore;

use crate::types::{Article, PipelineError, Result, StorageStats};
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Projection of a stored record used by the duplicate auditor; returned in
/// collection order so "first encountered" is well defined.
#[derive(Debug, Clone)]
pub struct AuditDocument {
    pub url: String,
    pub title: String,
    pub platform: String,
    pub content: Option<String>,
}

/// The four capabilities the pipeline needs from its document collection:
/// point lookup by the `url` key, insert with the uniqueness violation
/// surfaced as its own error, bulk deletion, and grouping/counting.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>>;

    /// Inserts one record. `PipelineError::DuplicateUrl` when the `url`
    /// uniqueness constraint rejects it.
    async fn insert(&self, article: &Article) -> Result<()>;

    async fn count(&self, platform: Option<&str>) -> Result<u64>;

    async fn delete_by_urls(&self, urls: &[String]) -> Result<u64>;

    async fn delete_by_platform(&self, platform: &str) -> Result<u64>;

    /// Deletes records of `platform` carrying `tag` anywhere in their tag
    /// sequence. Used by the archive maintenance commands.
    async fn delete_by_tag(&self, platform: &str, tag: &str) -> Result<u64>;

    async fn delete_all(&self) -> Result<u64>;

    async fn audit_documents(&self) -> Result<Vec<AuditDocument>>;

    /// Migration-time cleanup: for every group of records sharing a `url`,
    /// keeps the first-encountered one and deletes the rest. A no-op on
    /// collections where the uniqueness constraint has always held.
    async fn remove_url_duplicates(&self) -> Result<u64>;
}

/// Upserts a batch, classifying every record as stored, duplicate or error.
/// One bad record never sinks the batch; only losing the store itself does,
/// in which case the remaining records are all counted as errors.
pub async fn store_articles(store: &dyn ArticleStore, articles: &[Article]) -> StorageStats {
    let mut stats = StorageStats {
        total_articles: articles.len(),
        ..StorageStats::default()
    };

    for (index, article) in articles.iter().enumerate() {
        let existing = match store.find_by_url(&article.url).await {
            Ok(existing) => existing,
            Err(e) => {
                // The collection itself is gone; everything still queued
                // counts as an error and the stage stops.
                error!("storage unreachable, aborting batch: {e}");
                stats.errors += articles.len() - index;
                break;
            }
        };

        if existing.is_some() {
            stats.duplicate_articles += 1;
            continue;
        }

        match store.insert(article).await {
            Ok(()) => stats.stored_articles += 1,
            Err(PipelineError::DuplicateUrl { url }) => {
                // Lost a race with a concurrent run between the lookup and
                // the insert; the constraint is the authority.
                warn!(
                    "insert rejected by uniqueness constraint for '{}' (URL: {url})",
                    title_prefix(&article.title)
                );
                stats.errors += 1;
            }
            Err(e) => {
                error!(
                    "error inserting article '{}' (URL: {}): {e}",
                    title_prefix(&article.title),
                    article.url
                );
                stats.errors += 1;
            }
        }
    }

    info!(
        "storage run: {} total, {} stored, {} duplicates, {} errors",
        stats.total_articles, stats.stored_articles, stats.duplicate_articles, stats.errors
    );
    stats
}

fn title_prefix(title: &str) -> String {
    title.chars().take(50).collect()
}
