use crate::types::FetchConfig;
use std::path::PathBuf;

/// Medium RSS source settings.
#[derive(Debug, Clone)]
pub struct MediumConfig {
    /// Medium username, without the leading `@`.
    pub username: String,
}

/// Facebook HTML-export source settings.
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    /// Root of the unpacked export (the directory containing
    /// `your_facebook_activity/`).
    pub data_path: PathBuf,
    /// Export owner, recorded as the author on every extracted item.
    pub author: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/facebook"),
            author: "Facebook Export".to_string(),
        }
    }
}

/// X (Twitter) archive source settings.
#[derive(Debug, Clone)]
pub struct XConfig {
    /// Directory containing `tweets.js`.
    pub data_path: PathBuf,
    /// Handle used to reconstruct status URLs.
    pub handle: String,
    pub author: String,
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/x"),
            handle: "user".to_string(),
            author: "X Export".to_string(),
        }
    }
}

/// Generic blog source settings.
#[derive(Debug, Clone)]
pub struct NpblogConfig {
    pub base_url: String,
    /// Fallback author when no author element is found on a post.
    pub site_author: String,
}

impl Default for NpblogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nearpartner.com/blog/".to_string(),
            site_author: "NearPartner".to_string(),
        }
    }
}

/// Full pipeline configuration, passed in at construction. A source is
/// enabled by being present; there is no ambient global state to toggle.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub medium: Option<MediumConfig>,
    pub facebook: Option<FacebookConfig>,
    pub npblog: Option<NpblogConfig>,
    pub x: Option<XConfig>,
    pub max_articles_per_platform: usize,
    pub fetch: FetchConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            medium: None,
            facebook: Some(FacebookConfig::default()),
            npblog: None,
            x: Some(XConfig::default()),
            max_articles_per_platform: 10_000,
            fetch: FetchConfig::default(),
        }
    }
}
