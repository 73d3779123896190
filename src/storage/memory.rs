use crate::storage::{ArticleStore, AuditDocument};
use crate::types::{Article, PipelineError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Insertion-ordered in-memory collection, mirroring the PostgreSQL store's
/// contract. Backs the tests; nothing about the dedup logic depends on
/// which implementation sits behind the trait.
#[derive(Default)]
pub struct MemoryArticleStore {
    articles: Mutex<Vec<Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.articles.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bypasses the uniqueness check, recreating the state of a collection
    /// that predates the constraint. Test-fixture escape hatch.
    pub fn insert_unchecked(&self, article: Article) {
        self.articles.lock().unwrap().push(article);
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles.iter().find(|a| a.url == url).cloned())
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        let mut articles = self.articles.lock().unwrap();
        if articles.iter().any(|a| a.url == article.url) {
            return Err(PipelineError::DuplicateUrl {
                url: article.url.clone(),
            });
        }
        articles.push(article.clone());
        Ok(())
    }

    async fn count(&self, platform: Option<&str>) -> Result<u64> {
        let articles = self.articles.lock().unwrap();
        let count = match platform {
            Some(platform) => articles.iter().filter(|a| a.platform == platform).count(),
            None => articles.len(),
        };
        Ok(count as u64)
    }

    async fn delete_by_urls(&self, urls: &[String]) -> Result<u64> {
        let targets: HashSet<&String> = urls.iter().collect();
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| !targets.contains(&a.url));
        Ok((before - articles.len()) as u64)
    }

    async fn delete_by_platform(&self, platform: &str) -> Result<u64> {
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.platform != platform);
        Ok((before - articles.len()) as u64)
    }

    async fn delete_by_tag(&self, platform: &str, tag: &str) -> Result<u64> {
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| !(a.platform == platform && a.tags.iter().any(|t| t == tag)));
        Ok((before - articles.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut articles = self.articles.lock().unwrap();
        let removed = articles.len();
        articles.clear();
        Ok(removed as u64)
    }

    async fn audit_documents(&self) -> Result<Vec<AuditDocument>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles
            .iter()
            .map(|a| AuditDocument {
                url: a.url.clone(),
                title: a.title.clone(),
                platform: a.platform.clone(),
                content: a.content.clone(),
            })
            .collect())
    }

    async fn remove_url_duplicates(&self) -> Result<u64> {
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        let mut seen: HashSet<String> = HashSet::new();
        articles.retain(|a| seen.insert(a.url.clone()));
        Ok((before - articles.len()) as u64)
    }
}
