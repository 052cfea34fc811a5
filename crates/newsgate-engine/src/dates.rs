//! Publication-date parsing for near-duplicate grouping.
//!
//! Feeds disagree on date formats, so several are tried in turn. Records
//! whose date parses nowhere are never grouped with anything.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Parse a raw `published` value, keeping the offset it was written in.
///
/// Values without an offset are read as UTC. Comparisons between the
/// returned timestamps order by instant; [`DateTime::date_naive`] gives the
/// calendar day the source reported, not the UTC day.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

/// Calendar day used to bucket records for near-duplicate comparison.
#[must_use]
pub fn day_key(published: Option<&str>) -> Option<NaiveDate> {
    published.and_then(parse_published).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_rfc2822_feed_dates() {
        assert_eq!(
            day_key(Some("Tue, 03 Oct 2023 07:00:00 GMT")),
            Some(day(2023, 10, 3))
        );
    }

    #[test]
    fn rfc3339_keeps_source_offset_day() {
        // 23:30 at -05:00 is already the next day in UTC.
        assert_eq!(
            day_key(Some("2024-03-01T23:30:00-05:00")),
            Some(day(2024, 3, 1))
        );
    }

    #[test]
    fn parses_naive_formats() {
        assert_eq!(day_key(Some("2024-03-01 10:15:00")), Some(day(2024, 3, 1)));
        assert_eq!(day_key(Some("2024-03-01T10:15:00")), Some(day(2024, 3, 1)));
        assert_eq!(
            day_key(Some("03/01/2024 10:15:00 PM")),
            Some(day(2024, 3, 1))
        );
        assert_eq!(day_key(Some("2024-03-01")), Some(day(2024, 3, 1)));
    }

    #[test]
    fn ordering_within_a_day_is_preserved() {
        let early = parse_published("2024-03-01 08:00:00").unwrap();
        let late = parse_published("2024-03-01 17:45:00").unwrap();
        assert!(early < late);
    }

    #[test]
    fn mixed_offsets_order_by_instant() {
        // 10:00 at -05:00 is 15:00Z, after 12:00Z.
        let eastern = parse_published("Fri, 01 Mar 2024 10:00:00 -0500").unwrap();
        let utc = parse_published("Fri, 01 Mar 2024 12:00:00 +0000").unwrap();
        assert!(utc < eastern);
        assert_eq!(eastern.date_naive(), utc.date_naive());
    }

    #[test]
    fn naive_values_are_read_as_utc() {
        let naive = parse_published("2024-03-01 12:00:00").unwrap();
        let explicit = parse_published("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(naive, explicit);
        assert_eq!(naive.offset().local_minus_utc(), 0);
    }

    #[test]
    fn unparsable_or_missing_dates_have_no_day() {
        assert_eq!(day_key(Some("yesterday")), None);
        assert_eq!(day_key(Some("   ")), None);
        assert_eq!(day_key(None), None);
    }
}
