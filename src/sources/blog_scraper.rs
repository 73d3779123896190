use crate::config::NpblogConfig;
use crate::fetcher::Fetcher;
use crate::timestamp;
use crate::traits::ContentSource;
use crate::types::{Article, FetchConfig, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const MAX_PAGES: usize = 10;

/// Cool-down between page fetches; the blog host is not ours to hammer.
const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Container patterns tried in priority order before the class-name
/// heuristic kicks in.
const POST_SELECTORS: [&str; 8] = [
    "article",
    ".post",
    ".blog-post",
    ".entry",
    "[class*='post-']",
    ".jet-listing-item",
    ".elementor-post",
    ".wp-block-post",
];

const TITLE_SELECTORS: [&str; 7] = [
    "h1",
    "h2",
    "h3",
    ".title",
    ".post-title",
    ".entry-title",
    "[class*='title']",
];

const DATE_SELECTORS: [&str; 6] = [
    ".date",
    ".published",
    ".post-date",
    ".entry-date",
    "time",
    "[class*='date']",
];

const CONTENT_SELECTORS: [&str; 6] = [
    ".excerpt",
    ".summary",
    ".content",
    ".entry-content",
    ".post-content",
    "p",
];

const AUTHOR_SELECTORS: [&str; 4] = [".author", ".by-author", ".post-author", "[class*='author']"];

const CATEGORY_SELECTORS: [&str; 5] = [
    ".category",
    ".categories",
    ".tags",
    ".post-category",
    "[class*='categor']",
];

const MAX_EXCERPT_CHARS: usize = 500;

/// Scrapes posts off a paginated HTML blog with no feed and no API. Every
/// field comes from an ordered selector chain with a documented default.
pub struct BlogScraperSource {
    base_url: String,
    site_author: String,
    max_articles: usize,
    fetcher: Fetcher,
}

impl BlogScraperSource {
    pub fn new(config: &NpblogConfig, fetch: &FetchConfig, max_articles: usize) -> Self {
        Self {
            base_url: config.base_url.clone(),
            site_author: config.site_author.clone(),
            max_articles,
            fetcher: Fetcher::new(fetch.clone()),
        }
    }

    /// Pagination URL candidates for one page, tried in order until one
    /// yields a post we have not seen.
    fn page_url_candidates(&self, page: usize) -> Vec<String> {
        let trimmed = self.base_url.trim_end_matches('/');
        let mut candidates = vec![
            format!("{trimmed}/?paged={page}"),
            format!("{trimmed}/page/{page}/"),
            format!("{}?page={page}", self.base_url),
        ];
        if page == 1 {
            candidates.push(self.base_url.clone());
        }
        candidates
    }

    /// Extracts every candidate post element from one page document.
    /// Separated from the fetch loop so fixture pages can drive it.
    pub fn extract_posts(&self, html: &str) -> Vec<Article> {
        let document = Html::parse_document(html);

        let mut posts: Vec<ElementRef<'_>> = Vec::new();
        for pattern in POST_SELECTORS {
            let selector = Selector::parse(pattern).unwrap();
            let found: Vec<ElementRef<'_>> = document.select(&selector).collect();
            if !found.is_empty() {
                posts = found;
                break;
            }
        }

        if posts.is_empty() {
            // Structured selectors found nothing; fall back to any div or
            // article whose class name merely smells like a post container.
            let blog_class = Regex::new(r"(?i)(post|article|blog|entry)").unwrap();
            let any_container = Selector::parse("div, article").unwrap();
            posts = document
                .select(&any_container)
                .filter(|el| {
                    el.value()
                        .attr("class")
                        .is_some_and(|class| blog_class.is_match(class))
                })
                .collect();
        }

        posts
            .into_iter()
            .filter_map(|post| self.extract_single_post(post))
            .collect()
    }

    fn extract_single_post(&self, post: ElementRef<'_>) -> Option<Article> {
        // No title, no record.
        let title = select_first_text(post, &TITLE_SELECTORS)?;

        let url = self
            .extract_post_url(post)
            .unwrap_or_else(|| self.slug_url(&title));

        let published_date = self.extract_post_date(post);

        let content = select_first_text(post, &CONTENT_SELECTORS)
            .map(|text| text.chars().take(MAX_EXCERPT_CHARS).collect::<String>())
            .unwrap_or_default();

        let author =
            select_first_text(post, &AUTHOR_SELECTORS).unwrap_or_else(|| self.site_author.clone());

        let mut tags = vec!["npblog".to_string()];
        for pattern in CATEGORY_SELECTORS {
            let selector = Selector::parse(pattern).unwrap();
            for element in post.select(&selector) {
                let tag = element.text().collect::<String>().trim().to_lowercase();
                if !tag.is_empty() && !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        Some(Article {
            title,
            url,
            platform: "npblog".to_string(),
            content: Some(content),
            summary: None,
            published_date: Some(published_date),
            author,
            tags,
            engagement_metrics: None,
            additional_data: Some(serde_json::json!({
                "source_url": self.base_url,
            })),
            scraped_at: Utc::now(),
        })
    }

    fn extract_post_url(&self, post: ElementRef<'_>) -> Option<String> {
        let anchor = Selector::parse("a[href]").unwrap();
        let href = post
            .select(&anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty())?;

        if href.starts_with("http") {
            return Some(href.to_string());
        }

        // Relative href: resolve against the blog URL itself, which puts
        // root-relative paths on the site origin.
        Url::parse(&self.base_url)
            .and_then(|base| base.join(href))
            .map(|resolved| resolved.to_string())
            .ok()
    }

    /// Synthesizes a stable URL from the title when a post card carries no
    /// link at all.
    fn slug_url(&self, title: &str) -> String {
        let slug = title.to_lowercase().replace(' ', "-");
        format!("{}/{}", self.base_url.trim_end_matches('/'), slug)
    }

    fn extract_post_date(&self, post: ElementRef<'_>) -> DateTime<Utc> {
        for pattern in DATE_SELECTORS {
            let selector = Selector::parse(pattern).unwrap();
            if let Some(element) = post.select(&selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if let Some(parsed) = timestamp::parse_flexible(&text) {
                    return parsed;
                }
            }
        }
        Utc::now()
    }
}

/// First non-empty text produced by the ordered selector chain.
fn select_first_text(element: ElementRef<'_>, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        let selector = Selector::parse(pattern).unwrap();
        if let Some(found) = element.select(&selector).next() {
            let text = found.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[async_trait]
impl ContentSource for BlogScraperSource {
    fn platform(&self) -> &'static str {
        "npblog"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1;

        while articles.len() < self.max_articles && page <= MAX_PAGES {
            let mut page_articles_found = false;

            for candidate in self.page_url_candidates(page) {
                info!("fetching page {page}: {candidate}");
                let html = match self.fetcher.fetch_page(&candidate).await {
                    Ok(html) => html,
                    Err(e) => {
                        warn!("error fetching {candidate}: {e}");
                        continue;
                    }
                };

                let new_articles: Vec<Article> = self
                    .extract_posts(&html)
                    .into_iter()
                    .filter(|article| seen.insert(article.url.clone()))
                    .collect();

                if !new_articles.is_empty() {
                    info!("found {} new articles on page {page}", new_articles.len());
                    articles.extend(new_articles);
                    page_articles_found = true;
                    break;
                }
            }

            if !page_articles_found {
                info!("no new articles found on page {page}, stopping pagination");
                break;
            }

            page += 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        articles.truncate(self.max_articles);
        info!("scraped {} blog articles", articles.len());
        Ok(articles)
    }
}
