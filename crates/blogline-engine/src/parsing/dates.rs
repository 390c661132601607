use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Milliseconds in one day; undated entries step back by this much per
/// corpus position.
pub const DAY_MS: i64 = 86_400_000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

/// Parses an author-supplied date into epoch milliseconds.
///
/// Values without an offset are read as UTC.
pub fn parse_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }

    None
}

/// Timestamp for an entry without a usable date: one day older than the
/// entry before it in corpus order.
pub fn derived_timestamp(reference_now: i64, index: usize) -> i64 {
    reference_now.saturating_sub((index as i64).saturating_mul(DAY_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // 2024-01-05T00:00:00Z
    const JAN_5_2024: i64 = 1_704_412_800_000;

    #[rstest]
    #[case("2024-01-05")]
    #[case("2024/01/05")]
    #[case("January 5, 2024")]
    #[case("Jan 5, 2024")]
    #[case("5 January 2024")]
    #[case("2024-01-05T00:00:00Z")]
    #[case("2024-01-05 00:00")]
    #[case("  2024-01-05  ")]
    fn parses_supported_formats(#[case] raw: &str) {
        assert_eq!(parse_date(raw), Some(JAN_5_2024));
    }

    #[test]
    fn keeps_time_of_day() {
        assert_eq!(
            parse_date("2024-01-05T12:30:00"),
            Some(JAN_5_2024 + 12 * 3_600_000 + 30 * 60_000)
        );
    }

    #[test]
    fn honours_offsets() {
        assert_eq!(
            parse_date("2024-01-05T02:00:00+02:00"),
            Some(JAN_5_2024)
        );
    }

    #[rstest]
    #[case("")]
    #[case("someday")]
    #[case("2024-13-01")]
    #[case("31/31/2024")]
    fn rejects_unparseable_dates(#[case] raw: &str) {
        assert_eq!(parse_date(raw), None);
    }

    #[test]
    fn derived_timestamps_step_back_one_day() {
        assert_eq!(derived_timestamp(10 * DAY_MS, 0), 10 * DAY_MS);
        assert_eq!(derived_timestamp(10 * DAY_MS, 3), 7 * DAY_MS);
    }
}
