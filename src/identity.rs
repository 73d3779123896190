//! Record identity and tagging for sources without a natural URL.

use sha2::{Digest, Sha256};

/// SHA-256 over the concatenated title and content, hex-encoded. Identical
/// `(title, content)` always yields the same digest; the input is hashed
/// raw, so any single-character change moves it.
pub fn content_hash(title: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Deterministic placeholder identity for items with no natural URL:
/// `facebook://<category>/<content_hash>`.
pub fn synthesized_url(category: &str, title: &str, content: &str) -> String {
    format!("facebook://{}/{}", category, content_hash(title, content))
}

/// Heuristic subtype tags scanned from an activity title.
pub fn title_keyword_tags(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    ["photo", "comment", "message"]
        .into_iter()
        .filter(|keyword| lowered.contains(keyword))
        .map(str::to_string)
        .collect()
}
