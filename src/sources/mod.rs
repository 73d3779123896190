pub mod blog_scraper;
pub mod facebook_archive;
pub mod rss_feed;
pub mod x_export;

pub use blog_scraper::BlogScraperSource;
pub use facebook_archive::FacebookArchiveSource;
pub use rss_feed::MediumRssSource;
pub use x_export::XExportSource;
