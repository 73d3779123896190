use crate::storage::{ArticleStore, AuditDocument};
use crate::types::{Article, PipelineError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::info;

/// PostgreSQL-backed article collection. The `url` primary key is the
/// authoritative uniqueness guard; everything else is plain columns plus
/// JSONB for the free-form maps.
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Creates the collection if it does not exist. The uniqueness
    /// constraint is part of the schema from day one.
    pub async fn setup_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                platform TEXT NOT NULL,
                content TEXT,
                summary TEXT,
                published_date TIMESTAMPTZ,
                author TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{}',
                engagement_metrics JSONB,
                additional_data JSONB,
                scraped_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_article(row: &sqlx::postgres::PgRow) -> Result<Article> {
        Ok(Article {
            url: row.try_get("url")?,
            title: row.try_get("title")?,
            platform: row.try_get("platform")?,
            content: row.try_get("content")?,
            summary: row.try_get("summary")?,
            published_date: row.try_get::<Option<DateTime<Utc>>, _>("published_date")?,
            author: row.try_get("author")?,
            tags: row.try_get("tags")?,
            engagement_metrics: row.try_get("engagement_metrics")?,
            additional_data: row.try_get("additional_data")?,
            scraped_at: row.try_get("scraped_at")?,
        })
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE url = $1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_article(&row)).transpose()
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO articles
                (url, title, platform, content, summary, published_date,
                 author, tags, engagement_metrics, additional_data, scraped_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.platform)
        .bind(&article.content)
        .bind(&article.summary)
        .bind(article.published_date)
        .bind(&article.author)
        .bind(&article.tags)
        .bind(&article.engagement_metrics)
        .bind(&article.additional_data)
        .bind(article.scraped_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PipelineError::DuplicateUrl {
                    url: article.url.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self, platform: Option<&str>) -> Result<u64> {
        let count: i64 = match platform {
            Some(platform) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE platform = $1")
                    .bind(platform)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM articles")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }

    async fn delete_by_urls(&self, urls: &[String]) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE url = ANY($1)")
            .bind(urls)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_platform(&self, platform: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE platform = $1")
            .bind(platform)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_tag(&self, platform: &str, tag: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE platform = $1 AND $2 = ANY(tags)")
            .bind(platform)
            .bind(tag)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn audit_documents(&self) -> Result<Vec<AuditDocument>> {
        let rows =
            sqlx::query("SELECT url, title, platform, content FROM articles ORDER BY scraped_at")
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|row| {
                Ok(AuditDocument {
                    url: row.try_get("url")?,
                    title: row.try_get("title")?,
                    platform: row.try_get("platform")?,
                    content: row.try_get("content")?,
                })
            })
            .collect()
    }

    async fn remove_url_duplicates(&self) -> Result<u64> {
        // Keeps the physically first row per url. Can only match rows in a
        // table that predates the primary-key constraint.
        let result = sqlx::query(
            r#"
            DELETE FROM articles a
            USING articles b
            WHERE a.url = b.url AND a.ctid > b.ctid
            "#,
        )
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            info!("removed {removed} url duplicates");
        }
        Ok(removed)
    }
}
