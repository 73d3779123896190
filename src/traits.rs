use crate::types::{Article, Result};
use async_trait::async_trait;

/// Seam every extractor implements. A source returns the whole batch it
/// could extract; item-level failures are handled inside the source and
/// never cross this boundary.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Platform identifier stamped on every record this source produces.
    fn platform(&self) -> &'static str;

    /// Extracts and normalizes records from the source. An `Err` here means
    /// the source itself was unreachable; the pipeline degrades it to an
    /// empty batch.
    async fn pull(&self) -> Result<Vec<Article>>;
}
