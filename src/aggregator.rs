use crate::types::Article;
use tracing::info;

/// Merges per-source batches into the single sequence destined for storage.
/// Each batch is truncated to the per-source cap first; source order is
/// preserved, so a stable source ordering gives a stable combined sequence.
pub fn combine_articles(batches: Vec<Vec<Article>>, max_per_source: usize) -> Vec<Article> {
    let mut combined = Vec::new();

    for mut batch in batches {
        batch.truncate(max_per_source);
        combined.append(&mut batch);
    }

    info!("combined {} articles from all sources", combined.len());
    combined
}
