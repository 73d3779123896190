use chrono::{TimeZone, Utc};
use publications_pipeline::timestamp::{
    parse_archive_timestamp, parse_export_timestamp, parse_flexible,
};

#[test]
fn archive_timestamp_with_portuguese_period_marker() {
    let parsed = parse_archive_timestamp("Jun 03, 2025 10:53:49 da tarde");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 22, 53, 49).unwrap());
}

#[test]
fn archive_timestamp_noon_stays_noon() {
    let parsed = parse_archive_timestamp("Nov 16, 2024 12:44:41 da tarde");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 11, 16, 12, 44, 41).unwrap());
}

#[test]
fn archive_timestamp_with_portuguese_month() {
    let parsed = parse_archive_timestamp("Fev 10, 2024 09:15:00 da manhã");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 10, 9, 15, 0).unwrap());
}

#[test]
fn archive_timestamp_without_seconds() {
    let parsed = parse_archive_timestamp("Jun 03, 2025 10:53 da tarde");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 22, 53, 0).unwrap());
}

#[test]
fn archive_timestamp_day_first_variant() {
    let parsed = parse_archive_timestamp("03 Jun 2025 10:53:49 PM");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 22, 53, 49).unwrap());
}

#[test]
fn archive_timestamp_never_fails() {
    for raw in ["", "   ", "not a date", "32 Xyz 20!! 99:99"] {
        let before = Utc::now();
        let parsed = parse_archive_timestamp(raw);
        let after = Utc::now();
        assert!(parsed >= before && parsed <= after, "input: {raw:?}");
    }
}

#[test]
fn export_timestamp_with_offset() {
    let parsed = parse_export_timestamp("Fri Aug 15 16:57:44 +0000 2025");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 15, 16, 57, 44).unwrap());
}

#[test]
fn export_timestamp_without_offset() {
    let parsed = parse_export_timestamp("Fri Aug 15 16:57:44 2025");
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 15, 16, 57, 44).unwrap());
}

#[test]
fn export_timestamp_never_fails() {
    let before = Utc::now();
    let parsed = parse_export_timestamp("garbage");
    let after = Utc::now();
    assert!(parsed >= before && parsed <= after);
}

#[test]
fn flexible_parses_common_formats() {
    assert_eq!(
        parse_flexible("2024-03-05"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
    );
    assert_eq!(
        parse_flexible("March 5, 2024"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
    );
    assert_eq!(
        parse_flexible("05/03/2024"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
    );
    assert_eq!(
        parse_flexible("Tue, 05 Mar 2024 10:00:00 GMT"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap())
    );
    assert_eq!(
        parse_flexible("2024-03-05T10:30:00Z"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap())
    );
}

#[test]
fn flexible_rejects_garbage() {
    assert_eq!(parse_flexible(""), None);
    assert_eq!(parse_flexible("yesterday-ish"), None);
    assert_eq!(parse_flexible("Read more"), None);
}
