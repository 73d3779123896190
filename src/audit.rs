//! Offline duplicate analysis over the stored collection.
//!
//! Four independent passes: exact url, exact title-within-platform, exact
//! content, and near-duplicate titles. Only exact-url groups are ever
//! cleaned up automatically; the fuzzy passes surface ambiguity for a human
//! instead of guessing.

use crate::storage::{ArticleStore, AuditDocument};
use crate::types::Result;
use std::collections::{HashMap, HashSet};

/// Word-overlap ratio above which two same-length titles are flagged,
/// relative to the smaller title's token set.
const NEAR_DUPLICATE_THRESHOLD: f64 = 0.7;

#[derive(Debug)]
pub struct UrlDuplicateGroup {
    pub url: String,
    pub documents: Vec<AuditDocument>,
}

#[derive(Debug)]
pub struct TitleDuplicateGroup {
    pub title: String,
    pub platform: String,
    pub documents: Vec<AuditDocument>,
}

#[derive(Debug)]
pub struct ContentDuplicateGroup {
    pub content: String,
    pub documents: Vec<AuditDocument>,
}

#[derive(Debug)]
pub struct NearDuplicatePair {
    pub first: AuditDocument,
    pub second: AuditDocument,
    pub shared_words: usize,
}

#[derive(Debug, Default)]
pub struct DuplicateReport {
    pub total_documents: usize,
    pub url_duplicates: Vec<UrlDuplicateGroup>,
    pub title_duplicates: Vec<TitleDuplicateGroup>,
    pub content_duplicates: Vec<ContentDuplicateGroup>,
    pub near_duplicate_titles: Vec<NearDuplicatePair>,
    /// (platform, document count), largest first.
    pub platform_distribution: Vec<(String, usize)>,
}

impl DuplicateReport {
    pub fn is_clean(&self) -> bool {
        self.url_duplicates.is_empty()
            && self.title_duplicates.is_empty()
            && self.content_duplicates.is_empty()
            && self.near_duplicate_titles.is_empty()
    }

    /// How many documents an exact-url cleanup would remove.
    pub fn removable_url_duplicates(&self) -> usize {
        self.url_duplicates
            .iter()
            .map(|group| group.documents.len() - 1)
            .sum()
    }
}

/// Runs the audit passes against a store.
pub struct DuplicateAuditor<'a> {
    store: &'a dyn ArticleStore,
}

impl<'a> DuplicateAuditor<'a> {
    pub fn new(store: &'a dyn ArticleStore) -> Self {
        Self { store }
    }

    pub async fn report(&self) -> Result<DuplicateReport> {
        let documents = self.store.audit_documents().await?;
        Ok(build_report(&documents))
    }

    /// Removes all but the first-encountered document of every exact-url
    /// group. Title, content and near-duplicate groups are report-only.
    pub async fn remove_url_duplicates(&self) -> Result<u64> {
        self.store.remove_url_duplicates().await
    }
}

/// Pure classification over an audit projection, independent of any store.
pub fn build_report(documents: &[AuditDocument]) -> DuplicateReport {
    DuplicateReport {
        total_documents: documents.len(),
        url_duplicates: find_url_duplicates(documents),
        title_duplicates: find_title_duplicates(documents),
        content_duplicates: find_content_duplicates(documents),
        near_duplicate_titles: find_near_duplicate_titles(documents),
        platform_distribution: platform_distribution(documents),
    }
}

fn find_url_duplicates(documents: &[AuditDocument]) -> Vec<UrlDuplicateGroup> {
    let mut groups: HashMap<&str, Vec<&AuditDocument>> = HashMap::new();
    for doc in documents {
        groups.entry(&doc.url).or_default().push(doc);
    }

    let mut duplicates: Vec<UrlDuplicateGroup> = groups
        .into_iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|(url, docs)| UrlDuplicateGroup {
            url: url.to_string(),
            documents: docs.into_iter().cloned().collect(),
        })
        .collect();
    duplicates.sort_by(|a, b| b.documents.len().cmp(&a.documents.len()));
    duplicates
}

fn find_title_duplicates(documents: &[AuditDocument]) -> Vec<TitleDuplicateGroup> {
    let mut groups: HashMap<(&str, &str), Vec<&AuditDocument>> = HashMap::new();
    for doc in documents {
        groups
            .entry((doc.title.as_str(), doc.platform.as_str()))
            .or_default()
            .push(doc);
    }

    let mut duplicates: Vec<TitleDuplicateGroup> = groups
        .into_iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|((title, platform), docs)| TitleDuplicateGroup {
            title: title.to_string(),
            platform: platform.to_string(),
            documents: docs.into_iter().cloned().collect(),
        })
        .collect();
    duplicates.sort_by(|a, b| b.documents.len().cmp(&a.documents.len()));
    duplicates
}

fn find_content_duplicates(documents: &[AuditDocument]) -> Vec<ContentDuplicateGroup> {
    let mut groups: HashMap<&str, Vec<&AuditDocument>> = HashMap::new();
    for doc in documents {
        // Empty content would cluster every contentless record together.
        if let Some(content) = doc.content.as_deref() {
            if !content.is_empty() {
                groups.entry(content).or_default().push(doc);
            }
        }
    }

    let mut duplicates: Vec<ContentDuplicateGroup> = groups
        .into_iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|(content, docs)| ContentDuplicateGroup {
            content: content.to_string(),
            documents: docs.into_iter().cloned().collect(),
        })
        .collect();
    duplicates.sort_by(|a, b| b.documents.len().cmp(&a.documents.len()));
    duplicates
}

/// Titles are bucketed by character length, so only same-length titles are
/// ever compared; the per-bucket comparison is quadratic but buckets stay
/// small for realistic title-length distributions.
fn find_near_duplicate_titles(documents: &[AuditDocument]) -> Vec<NearDuplicatePair> {
    let mut buckets: HashMap<usize, Vec<&AuditDocument>> = HashMap::new();
    for doc in documents {
        buckets.entry(doc.title.chars().count()).or_default().push(doc);
    }

    let mut pairs = Vec::new();
    for docs in buckets.values() {
        if docs.len() < 2 {
            continue;
        }
        for (i, first) in docs.iter().enumerate() {
            for second in &docs[i + 1..] {
                if let Some(shared) = near_duplicate_overlap(&first.title, &second.title) {
                    pairs.push(NearDuplicatePair {
                        first: (*first).clone(),
                        second: (*second).clone(),
                        shared_words: shared,
                    });
                }
            }
        }
    }
    pairs
}

/// Shared-word count when two titles exceed the overlap threshold, measured
/// against the smaller token set so the test is symmetric.
fn near_duplicate_overlap(first: &str, second: &str) -> Option<usize> {
    let first_words: HashSet<String> = tokenize(first);
    let second_words: HashSet<String> = tokenize(second);
    if first_words.is_empty() || second_words.is_empty() {
        return None;
    }

    let shared = first_words.intersection(&second_words).count();
    let smaller = first_words.len().min(second_words.len());

    (shared as f64 > smaller as f64 * NEAR_DUPLICATE_THRESHOLD).then_some(shared)
}

fn tokenize(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn platform_distribution(documents: &[AuditDocument]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        *counts.entry(&doc.platform).or_default() += 1;
    }

    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(platform, count)| (platform.to_string(), count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}
