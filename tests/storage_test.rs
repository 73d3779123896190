mod common;

use common::{article, article_with_content};
use publications_pipeline::storage::{store_articles, ArticleStore, MemoryArticleStore};
use publications_pipeline::types::PipelineError;

#[tokio::test]
async fn stores_new_articles_and_reports_counts() {
    common::init_tracing();

    let store = MemoryArticleStore::new();
    let batch = vec![
        article("https://medium.com/@t/a", "medium", "A"),
        article("https://medium.com/@t/b", "medium", "B"),
        article("https://x.com/t/status/1", "x", "C"),
    ];

    let stats = store_articles(&store, &batch).await;

    assert_eq!(stats.total_articles, 3);
    assert_eq!(stats.stored_articles, 3);
    assert_eq!(stats.duplicate_articles, 0);
    assert_eq!(stats.updated_articles, 0);
    assert_eq!(stats.errors, 0);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn storing_the_same_batch_twice_is_idempotent() {
    let store = MemoryArticleStore::new();
    let batch = vec![
        article("https://medium.com/@t/a", "medium", "A"),
        article("https://medium.com/@t/b", "medium", "B"),
    ];

    let first = store_articles(&store, &batch).await;
    assert_eq!(first.stored_articles, 2);

    let second = store_articles(&store, &batch).await;
    assert_eq!(second.stored_articles, 0);
    assert_eq!(second.duplicate_articles, 2);
    assert_eq!(second.errors, 0);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn duplicate_links_within_one_batch_collapse_to_one_record() {
    // Two feed items sharing a link: the first wins, the second is a
    // duplicate, and the collection ends with a single record.
    let store = MemoryArticleStore::new();
    let batch = vec![
        article("https://medium.com/@t/same", "medium", "First occurrence"),
        article("https://medium.com/@t/same", "medium", "Second occurrence"),
    ];

    let stats = store_articles(&store, &batch).await;

    assert_eq!(stats.stored_articles, 1);
    assert_eq!(stats.duplicate_articles, 1);
    assert_eq!(store.len(), 1);
    let stored = store
        .find_by_url("https://medium.com/@t/same")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "First occurrence");
}

#[tokio::test]
async fn existing_url_is_skipped_without_a_write() {
    let store = MemoryArticleStore::new();
    store
        .insert(&article_with_content(
            "https://x.com/t/status/9",
            "x",
            "Original",
            "original body",
        ))
        .await
        .unwrap();

    let incoming = vec![article_with_content(
        "https://x.com/t/status/9",
        "x",
        "Replacement attempt",
        "new body",
    )];
    let stats = store_articles(&store, &incoming).await;

    assert_eq!(stats.duplicate_articles, 1);
    assert_eq!(stats.stored_articles, 0);

    // No write happened: the stored record is untouched.
    let stored = store
        .find_by_url("https://x.com/t/status/9")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Original");
    assert_eq!(stored.content.as_deref(), Some("original body"));
}

#[tokio::test]
async fn insert_surfaces_unique_violation_as_duplicate_url() {
    let store = MemoryArticleStore::new();
    let record = article("https://medium.com/@t/a", "medium", "A");

    store.insert(&record).await.unwrap();
    let error = store.insert(&record).await.unwrap_err();

    assert!(matches!(error, PipelineError::DuplicateUrl { url } if url == record.url));
}

#[tokio::test]
async fn counts_by_platform() {
    let store = MemoryArticleStore::new();
    store.insert(&article("u1", "medium", "A")).await.unwrap();
    store.insert(&article("u2", "medium", "B")).await.unwrap();
    store.insert(&article("u3", "x", "C")).await.unwrap();

    assert_eq!(store.count(Some("medium")).await.unwrap(), 2);
    assert_eq!(store.count(Some("x")).await.unwrap(), 1);
    assert_eq!(store.count(Some("npblog")).await.unwrap(), 0);
    assert_eq!(store.count(None).await.unwrap(), 3);
}

#[tokio::test]
async fn bulk_deletes() {
    let store = MemoryArticleStore::new();
    store.insert(&article("u1", "medium", "A")).await.unwrap();
    store.insert(&article("u2", "x", "B")).await.unwrap();

    let mut tagged = article("u3", "facebook", "C");
    tagged.tags = vec!["facebook_comment".to_string(), "facebook".to_string()];
    store.insert(&tagged).await.unwrap();
    let mut kept = article("u4", "facebook", "D");
    kept.tags = vec!["facebook_post".to_string(), "facebook".to_string()];
    store.insert(&kept).await.unwrap();

    // Legacy category cleanup: only the tagged record goes.
    let removed = store
        .delete_by_tag("facebook", "facebook_comment")
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.count(Some("facebook")).await.unwrap(), 1);

    let removed = store.delete_by_urls(&["u1".to_string()]).await.unwrap();
    assert_eq!(removed, 1);

    let removed = store.delete_by_platform("x").await.unwrap();
    assert_eq!(removed, 1);

    let removed = store.delete_all().await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.is_empty());
}
