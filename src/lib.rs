pub mod aggregator;
pub mod audit;
pub mod config;
pub mod fetcher;
pub mod identity;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use audit::{DuplicateAuditor, DuplicateReport};
pub use config::{FacebookConfig, MediumConfig, NpblogConfig, PipelineConfig, XConfig};
pub use pipeline::{PipelineSummary, PublicationsPipeline};
pub use storage::{ArticleStore, MemoryArticleStore, PgArticleStore};
pub use types::{Article, FetchConfig, PipelineError, Result, StorageStats};
