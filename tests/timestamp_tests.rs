// tests/timestamp_tests.rs
use chrono::{TimeZone, Utc};
use pqtttr::legacy::parse_file_time;
use pqtttr::*;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn single_datetime_template() -> TagSequence {
    vec![
        TagRecord::new("File_CreatingTime", -1, TagValue::DateTime(OleDate(0.0))),
        TagRecord::new(HEADER_END, -1, TagValue::Empty),
    ]
    .into()
}

fn written_date(overrides: &HeaderOverrides) -> OleDate {
    let bytes = encode_tag_stream(&single_datetime_template(), overrides).unwrap();
    match read_tag_stream(&bytes).unwrap().records()[0].value {
        TagValue::DateTime(d) => d,
        ref other => panic!("Expected DateTime, got {:?}", other),
    }
}

#[test]
fn test_ole_epoch_is_unix_epoch() {
    assert_eq!(OleDate::from_system_time(UNIX_EPOCH), OleDate(25569.0));
    assert_eq!(OleDate(25569.0).to_system_time(), Some(UNIX_EPOCH));
}

#[test]
fn test_ole_day_fraction() {
    // 1.5 days after the Unix epoch
    let time = UNIX_EPOCH + Duration::from_secs(129600);
    assert_eq!(OleDate::from_system_time(time), OleDate(25570.5));
}

#[test]
fn test_ole_before_unix_epoch() {
    let time = UNIX_EPOCH - Duration::from_secs(86400);
    assert_eq!(OleDate::from_system_time(time), OleDate(25568.0));
    assert_eq!(OleDate(25568.0).to_system_time(), Some(time));
}

#[test]
fn test_ole_reverse_conversion_precision() {
    let time = Utc.with_ymd_and_hms(2023, 4, 8, 14, 5, 31).unwrap();
    let ole = OleDate::from_datetime(&time);
    let back = ole.to_datetime().unwrap();
    let drift = (back - time).num_microseconds().unwrap().abs();
    assert!(drift < 100, "drift {}us", drift);
}

#[test]
fn test_unrepresentable_dates_are_none() {
    for day in [f64::NAN, f64::NEG_INFINITY, 1e300] {
        assert_eq!(OleDate(day).to_system_time(), None);
        assert_eq!(OleDate(day).to_datetime(), None);
    }
}

#[test]
fn test_legacy_time_is_utc() {
    let time = parse_file_time("08/04/23 14:05:31").unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2023, 4, 8, 14, 5, 31).unwrap());
    // day/month order: 08/04 is the 8th of April
    assert_eq!(parse_file_time("31/12/99 23:59:59").unwrap().timestamp(), 946684799);
    assert!(parse_file_time("12/31/99 23:59:59").is_err());
}

#[test]
fn test_creation_override_written_exactly() {
    let time = Utc.with_ymd_and_hms(2023, 4, 8, 14, 5, 31).unwrap();
    let written = written_date(&HeaderOverrides::new().creation_time(time));
    assert_eq!(written, OleDate::from_datetime(&time));
    assert_eq!(written.to_datetime().unwrap().timestamp(), time.timestamp());
}

#[test]
fn test_missing_creation_time_uses_now() {
    let before = OleDate::now();
    let written = written_date(&HeaderOverrides::new());
    let after = OleDate::now();

    assert!(written >= before && written <= after);
    let age = SystemTime::now().duration_since(written.to_system_time().unwrap()).unwrap_or_default();
    assert!(age < Duration::from_secs(5));
}

#[test]
fn test_all_datetime_tags_share_one_value() {
    let tags: TagSequence = vec![
        TagRecord::new("File_CreatingTime", -1, TagValue::DateTime(OleDate(1.0))),
        TagRecord::new("HW_CalibrationDate", -1, TagValue::DateTime(OleDate(2.0))),
        TagRecord::new(HEADER_END, -1, TagValue::Empty),
    ]
    .into();
    let read = read_tag_stream(&encode_tag_stream(&tags, &HeaderOverrides::new()).unwrap()).unwrap();
    assert_eq!(read.records()[0].value, read.records()[1].value);
}
