use crate::config::FacebookConfig;
use crate::identity;
use crate::timestamp;
use crate::traits::ContentSource;
use crate::types::{Article, Result};
use async_trait::async_trait;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Candidate files inside the posts category. Which of these exist varies
/// with the export date and version; missing ones are skipped silently.
const POST_FILES: [&str; 12] = [
    "your_posts__check_ins__photos_and_videos_1.html",
    "posts_on_other_pages_and_profiles.html",
    "your_photos.html",
    "your_videos.html",
    "archive.html",
    "your_uncategorized_photos.html",
    "birthday_media.html",
    "media_used_for_memories.html",
    "places_you_have_been_tagged_in.html",
    "edits_you_made_to_posts.html",
    "content_sharing_links_you_have_created.html",
    "album/0.html",
];

/// Extracts activity records from a Facebook HTML data export. Only the
/// posts category is processed; the export's other categories (comments,
/// reactions, ads, security) are out of scope for the archive.
pub struct FacebookArchiveSource {
    data_path: PathBuf,
    author: String,
    max_items: usize,
}

impl FacebookArchiveSource {
    pub fn new(config: &FacebookConfig, max_items: usize) -> Self {
        Self {
            data_path: config.data_path.clone(),
            author: config.author.clone(),
            max_items,
        }
    }

    fn process_posts(&self, posts_path: &Path) -> Vec<Article> {
        let mut articles = Vec::new();

        for file_name in POST_FILES {
            if articles.len() >= self.max_items {
                break;
            }

            let path = posts_path.join(file_name);
            if !path.exists() {
                continue;
            }

            let html = match std::fs::read_to_string(&path) {
                Ok(html) => html,
                Err(e) => {
                    error!("error reading {}: {e}", path.display());
                    continue;
                }
            };

            let before = articles.len();
            self.extract_sections(&html, &mut articles);
            let extracted = articles.len() - before;
            if extracted > 0 {
                info!("processed {extracted} posts from {file_name}");
            }
        }

        articles
    }

    fn extract_sections(&self, html: &str, articles: &mut Vec<Article>) {
        let document = Html::parse_document(html);
        let sections = Selector::parse("section._a6-g").unwrap();

        for section in document.select(&sections) {
            if articles.len() >= self.max_items {
                break;
            }
            if let Some(article) = self.extract_activity(section, "facebook_post") {
                articles.push(article);
            }
        }
    }

    /// Builds one record from an activity block. Returns `None` when the
    /// block cannot be extracted; the surrounding loop carries on.
    fn extract_activity(&self, section: ElementRef<'_>, category: &str) -> Option<Article> {
        let heading = Selector::parse("h2").unwrap();
        let content_div = Selector::parse("div._a6-p").unwrap();
        let footer = Selector::parse("footer").unwrap();
        let footer_time = Selector::parse("div._a72d").unwrap();
        let anchors = Selector::parse("a").unwrap();

        let title = section
            .select(&heading)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Facebook Activity".to_string());

        let content = section
            .select(&content_div)
            .next()
            .map(|d| d.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let published_date = section
            .select(&footer)
            .next()
            .and_then(|f| f.select(&footer_time).next())
            .map(|t| t.text().collect::<String>().trim().to_string())
            .map(|raw| timestamp::parse_archive_timestamp(&raw))
            .unwrap_or_else(Utc::now);

        // Outbound links only; in-page fragment anchors carry no identity.
        let links: Vec<String> = section
            .select(&anchors)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty() && !href.starts_with('#'))
            .map(str::to_string)
            .collect();

        let url = identity::synthesized_url(category, &title, &content);

        let mut tags = vec![category.to_string(), "facebook".to_string()];
        tags.extend(identity::title_keyword_tags(&title));

        Some(Article {
            title,
            url,
            platform: "facebook".to_string(),
            content: Some(content),
            summary: None,
            published_date: Some(published_date),
            author: self.author.clone(),
            tags,
            engagement_metrics: None,
            additional_data: Some(serde_json::json!({
                "content_type": category,
                "links": links,
                "raw_html_length": section.html().len(),
            })),
            scraped_at: Utc::now(),
        })
    }
}

#[async_trait]
impl ContentSource for FacebookArchiveSource {
    fn platform(&self) -> &'static str {
        "facebook"
    }

    async fn pull(&self) -> Result<Vec<Article>> {
        if !self.data_path.exists() {
            warn!(
                "Facebook data path does not exist: {}",
                self.data_path.display()
            );
            return Ok(Vec::new());
        }

        let posts_path = self.data_path.join("your_facebook_activity").join("posts");
        let mut articles = Vec::new();

        if posts_path.exists() {
            articles = self.process_posts(&posts_path);
        }

        articles.truncate(self.max_items);
        info!("scraped {} Facebook activity items", articles.len());
        Ok(articles)
    }
}
