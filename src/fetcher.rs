use crate::types::{FetchConfig, PipelineError, Result};
use backoff::backoff::Backoff;
use backoff::exponential::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client for the fetching extractors.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetches a syndication feed, retrying transient failures with
    /// exponential backoff. No explicit deadline: feed hosts are trusted
    /// not to hang, matching the batch-level contract that a feed failure
    /// surfaces as an error rather than a partial result.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            multiplier: 2.0,
            ..Default::default()
        };

        let mut last_error = PipelineError::General(format!("no fetch attempted for {url}"));

        for attempt in 0..=self.config.max_retries {
            match self.try_fetch(url, Some("application/rss+xml, application/xml, text/xml")).await {
                Ok(body) => {
                    debug!("fetched feed {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    last_error = e;
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!("attempt {} failed for {url}, retrying in {delay:?}", attempt + 1);
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        Err(last_error)
    }

    /// Fetches one HTML page with an explicit per-request deadline. Single
    /// attempt: the blog extractor tries alternative pagination templates
    /// itself, so retrying here would just multiply the wait.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.page_timeout_seconds))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::General(format!(
                "HTTP {} fetching {url}",
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }

    async fn try_fetch(&self, url: &str, accept: Option<&str>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header("Accept", accept);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::General(format!(
                "HTTP {} fetching {url}",
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }
}
