//! Timestamp normalization for the source-specific date grammars.
//!
//! Every entry point degrades to the current instant instead of failing: a
//! malformed timestamp on one record must never abort ingestion of a batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

/// Period-of-day markers the Facebook export emits in Portuguese.
const PERIOD_MARKERS: [(&str, &str); 3] = [
    (" da tarde", " PM"),
    (" da manhã", " AM"),
    (" da madrugada", " AM"),
];

/// Month abbreviations that differ from the English 3-letter forms; the
/// remaining months (Jan, Mar, Jun, Jul, Nov) already match.
const MONTH_MARKERS: [(&str, &str); 7] = [
    ("Fev", "Feb"),
    ("Abr", "Apr"),
    ("Mai", "May"),
    ("Ago", "Aug"),
    ("Set", "Sep"),
    ("Out", "Oct"),
    ("Dez", "Dec"),
];

/// Fixed patterns for the archive grammar, most specific first:
/// with-seconds before without-seconds.
const ARCHIVE_FORMATS: [&str; 3] = [
    "%b %d, %Y %I:%M:%S %p",
    "%d %b %Y %I:%M:%S %p",
    "%b %d, %Y %I:%M %p",
];

/// Parses a Facebook-export timestamp such as
/// `"Jun 03, 2025 10:53:49 da tarde"`. Locale markers are mapped to
/// AM/PM and English month abbreviations before any parse attempt.
pub fn parse_archive_timestamp(raw: &str) -> DateTime<Utc> {
    if raw.trim().is_empty() {
        return Utc::now();
    }

    let mut text = raw.to_string();
    for (pt, en) in PERIOD_MARKERS {
        text = text.replace(pt, en);
    }
    for (pt, en) in MONTH_MARKERS {
        text = text.replace(pt, en);
    }

    for format in ARCHIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
            return DateTime::from_naive_utc_and_offset(naive, Utc);
        }
    }

    debug!("could not parse archive timestamp: {raw}");
    Utc::now()
}

/// Parses an X-export timestamp, e.g. `"Fri Aug 15 16:57:44 +0000 2025"`,
/// falling back to the same grammar without the offset field.
pub fn parse_export_timestamp(raw: &str) -> DateTime<Utc> {
    if raw.trim().is_empty() {
        return Utc::now();
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return dt.with_timezone(&Utc);
    }

    let without_offset = raw.replace(" +0000", "");
    if let Ok(naive) = NaiveDateTime::parse_from_str(&without_offset, "%a %b %d %H:%M:%S %Y") {
        return DateTime::from_naive_utc_and_offset(naive, Utc);
    }

    debug!("could not parse export timestamp: {raw}");
    Utc::now()
}

/// Permissive parser for dates scraped off arbitrary blog markup. Returns
/// `None` on failure so callers can try their next selector before
/// defaulting to ingestion time.
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%B %d, %Y %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    const DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%B %d, %Y",
        "%b %d, %Y",
    ];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
            }
        }
    }

    debug!("could not parse date: {raw}");
    None
}
