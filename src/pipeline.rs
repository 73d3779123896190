use crate::aggregator::combine_articles;
use crate::config::PipelineConfig;
use crate::sources::{BlogScraperSource, FacebookArchiveSource, MediumRssSource, XExportSource};
use crate::storage::{store_articles, ArticleStore};
use crate::traits::ContentSource;
use crate::types::{PipelineError, Result, StorageStats};
use tracing::{error, info};

/// Outcome of one pipeline run: the storage counters plus the collection
/// state afterwards.
#[derive(Debug)]
pub struct PipelineSummary {
    pub stats: StorageStats,
    pub platform_counts: Vec<(String, u64)>,
    pub total_count: u64,
}

/// Runs the enabled extractors in a fixed order, aggregates their batches
/// and hands the result to the storage layer. Strictly sequential: one
/// source completes before the next starts.
pub struct PublicationsPipeline {
    config: PipelineConfig,
}

impl PublicationsPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    fn build_sources(&self) -> Vec<Box<dyn ContentSource>> {
        let mut sources: Vec<Box<dyn ContentSource>> = Vec::new();
        let max = self.config.max_articles_per_platform;

        if let Some(medium) = &self.config.medium {
            sources.push(Box::new(MediumRssSource::new(medium, &self.config.fetch, max)));
        }
        if let Some(facebook) = &self.config.facebook {
            sources.push(Box::new(FacebookArchiveSource::new(facebook, max)));
        }
        if let Some(npblog) = &self.config.npblog {
            sources.push(Box::new(BlogScraperSource::new(npblog, &self.config.fetch, max)));
        }
        if let Some(x) = &self.config.x {
            sources.push(Box::new(XExportSource::new(x, max)));
        }

        sources
    }

    pub async fn run(&self, store: &dyn ArticleStore) -> Result<PipelineSummary> {
        let sources = self.build_sources();
        if sources.is_empty() {
            return Err(PipelineError::General(
                "at least one data source must be enabled".to_string(),
            ));
        }

        let mut batches = Vec::new();
        for source in &sources {
            // A failing source degrades to an empty batch; it never takes
            // the rest of the run down with it.
            let batch = match source.pull().await {
                Ok(batch) => {
                    info!("pulled {} items from {}", batch.len(), source.platform());
                    batch
                }
                Err(e) => {
                    error!("source {} failed: {e}", source.platform());
                    Vec::new()
                }
            };
            batches.push(batch);
        }

        let combined = combine_articles(batches, self.config.max_articles_per_platform);
        let stats = store_articles(store, &combined).await;

        let mut platform_counts = Vec::new();
        for platform in ["medium", "facebook", "npblog", "x"] {
            platform_counts.push((platform.to_string(), store.count(Some(platform)).await?));
        }
        let total_count = store.count(None).await?;

        log_summary(&stats, &platform_counts, total_count);

        Ok(PipelineSummary {
            stats,
            platform_counts,
            total_count,
        })
    }
}

fn log_summary(stats: &StorageStats, platform_counts: &[(String, u64)], total_count: u64) {
    info!("processing summary");
    info!("  total articles processed: {}", stats.total_articles);
    info!("  new articles stored: {}", stats.stored_articles);
    info!("  articles updated: {}", stats.updated_articles);
    info!("  duplicate articles skipped: {}", stats.duplicate_articles);
    info!("  errors encountered: {}", stats.errors);
    info!("  success rate: {:.1}%", stats.success_rate() * 100.0);
    info!("current database statistics:");
    for (platform, count) in platform_counts {
        info!("  {platform}: {count} items");
    }
    info!("  all: {total_count} total items");
}
