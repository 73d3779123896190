#![allow(dead_code)]

use chrono::Utc;
use publications_pipeline::types::Article;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Minimal valid record for storage and audit tests.
pub fn article(url: &str, platform: &str, title: &str) -> Article {
    Article {
        title: title.to_string(),
        url: url.to_string(),
        platform: platform.to_string(),
        content: None,
        summary: None,
        published_date: Some(Utc::now()),
        author: "test".to_string(),
        tags: vec![platform.to_string()],
        engagement_metrics: None,
        additional_data: None,
        scraped_at: Utc::now(),
    }
}

pub fn article_with_content(url: &str, platform: &str, title: &str, content: &str) -> Article {
    Article {
        content: Some(content.to_string()),
        ..article(url, platform, title)
    }
}
