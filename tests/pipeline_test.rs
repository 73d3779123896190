mod common;

use publications_pipeline::config::{FacebookConfig, PipelineConfig, XConfig};
use publications_pipeline::storage::MemoryArticleStore;
use publications_pipeline::types::FetchConfig;
use publications_pipeline::PublicationsPipeline;
use std::fs;
use std::path::Path;

const ARCHIVE_FIXTURE: &str = r#"<html><body>
<section class="_a6-g">
  <h2>You shared a photo</h2>
  <div class="_a6-p">Holiday in Madeira with friends</div>
  <footer><div class="_a72d">Jun 03, 2025 10:53:49 da tarde</div></footer>
</section>
</body></html>
"#;

const TWEETS_FIXTURE: &str = r#"window.YTD.tweets.part0 = [
  {
    "tweet": {
      "id_str": "2001",
      "full_text": "First tweet in the archive",
      "created_at": "Fri Aug 15 16:57:44 +0000 2025"
    }
  },
  {
    "tweet": {
      "id_str": "2002",
      "full_text": "Second tweet in the archive",
      "created_at": "Sat Aug 16 09:00:00 +0000 2025"
    }
  }
];
"#;

fn write_fixtures(root: &Path) -> (FacebookConfig, XConfig) {
    let facebook_dir = root.join("facebook");
    let posts = facebook_dir.join("your_facebook_activity").join("posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join("your_photos.html"), ARCHIVE_FIXTURE).unwrap();

    let x_dir = root.join("x");
    fs::create_dir_all(&x_dir).unwrap();
    fs::write(x_dir.join("tweets.js"), TWEETS_FIXTURE).unwrap();

    (
        FacebookConfig {
            data_path: facebook_dir,
            author: "Export Owner".to_string(),
        },
        XConfig {
            data_path: x_dir,
            handle: "tester".to_string(),
            author: "Export Owner".to_string(),
        },
    )
}

fn offline_config(facebook: FacebookConfig, x: XConfig) -> PipelineConfig {
    PipelineConfig {
        medium: None,
        facebook: Some(facebook),
        npblog: None,
        x: Some(x),
        max_articles_per_platform: 100,
        fetch: FetchConfig::default(),
    }
}

#[tokio::test]
async fn pipeline_run_stores_all_sources() {
    common::init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let (facebook, x) = write_fixtures(dir.path());

    let pipeline = PublicationsPipeline::new(offline_config(facebook, x));
    let store = MemoryArticleStore::new();

    let summary = pipeline.run(&store).await.unwrap();

    assert_eq!(summary.stats.total_articles, 3);
    assert_eq!(summary.stats.stored_articles, 3);
    assert_eq!(summary.stats.errors, 0);
    assert_eq!(summary.total_count, 3);

    let facebook_count = summary
        .platform_counts
        .iter()
        .find(|(platform, _)| platform == "facebook")
        .map(|(_, count)| *count);
    assert_eq!(facebook_count, Some(1));

    let x_count = summary
        .platform_counts
        .iter()
        .find(|(platform, _)| platform == "x")
        .map(|(_, count)| *count);
    assert_eq!(x_count, Some(2));
}

#[tokio::test]
async fn second_run_stores_nothing_new() {
    let dir = tempfile::tempdir().unwrap();
    let (facebook, x) = write_fixtures(dir.path());

    let pipeline = PublicationsPipeline::new(offline_config(facebook, x));
    let store = MemoryArticleStore::new();

    let first = pipeline.run(&store).await.unwrap();
    assert_eq!(first.stats.stored_articles, 3);

    // Same inputs again: everything is a duplicate, the collection is
    // unchanged.
    let second = pipeline.run(&store).await.unwrap();
    assert_eq!(second.stats.stored_articles, 0);
    assert_eq!(second.stats.duplicate_articles, 3);
    assert_eq!(second.stats.updated_articles, 0);
    assert_eq!(second.total_count, 3);
}

#[tokio::test]
async fn unreachable_source_degrades_to_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let (_, x) = write_fixtures(dir.path());

    // Point the archive at a directory that does not exist; the X export
    // must still come through.
    let config = offline_config(
        FacebookConfig {
            data_path: dir.path().join("missing"),
            author: "Export Owner".to_string(),
        },
        x,
    );

    let pipeline = PublicationsPipeline::new(config);
    let store = MemoryArticleStore::new();

    let summary = pipeline.run(&store).await.unwrap();
    assert_eq!(summary.stats.stored_articles, 2);
    assert_eq!(summary.total_count, 2);
}

#[tokio::test]
async fn pipeline_requires_at_least_one_source() {
    let config = PipelineConfig {
        medium: None,
        facebook: None,
        npblog: None,
        x: None,
        max_articles_per_platform: 100,
        fetch: FetchConfig::default(),
    };

    let pipeline = PublicationsPipeline::new(config);
    let store = MemoryArticleStore::new();
    assert!(pipeline.run(&store).await.is_err());
}

#[tokio::test]
async fn per_source_cap_limits_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let (facebook, x) = write_fixtures(dir.path());

    let mut config = offline_config(facebook, x);
    config.max_articles_per_platform = 1;

    let pipeline = PublicationsPipeline::new(config);
    let store = MemoryArticleStore::new();

    let summary = pipeline.run(&store).await.unwrap();
    // One record per source survives the cap.
    assert_eq!(summary.stats.total_articles, 2);
    assert_eq!(summary.stats.stored_articles, 2);
}
