//! Date normalization for heterogeneous source formats.
//!
//! Absolute dates (RFC 3339, RFC 2822, ISO dates, "March 1, 2024" and
//! friends) are tried first. Review sites report relative phrases such as
//! "3 years ago"; those are resolved against a caller-supplied `now` so runs
//! stay reproducible.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// chrono accepts both short and long month names for %b and %B when parsing.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelativeUnit {
    Year,
    Month,
    Week,
    Day,
}

// Checked in this order; the first unit word found in the phrase wins.
const RELATIVE_UNITS: [(&str, RelativeUnit); 4] = [
    ("year", RelativeUnit::Year),
    ("month", RelativeUnit::Month),
    ("week", RelativeUnit::Week),
    ("day", RelativeUnit::Day),
];

/// Convert a raw date string into a UTC timestamp.
///
/// Returns `None` when the string is neither an absolute date nor a
/// recognizable relative phrase.
pub fn normalize_date(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_absolute(raw).or_else(|| parse_relative(raw, now))
}

pub fn parse_absolute(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_rfc2822_lenient(raw) {
        return Some(dt);
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    let without_weekday = strip_weekday(raw);
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(without_weekday, format)
            .ok()
            .map(midnight_utc)
    })
}

/// Resolve phrases like "2 years ago" or "a week ago".
///
/// Year and month offsets move calendar fields and land on midnight UTC
/// (days past the end of the target month clamp to its last day). Week and
/// day offsets subtract whole days and keep the time of day.
pub fn parse_relative(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = raw.trim().to_lowercase();

    let unit = RELATIVE_UNITS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, unit)| *unit)?;
    let count = leading_count(&lower)?;

    match unit {
        RelativeUnit::Year => now
            .date_naive()
            .checked_sub_months(Months::new(count.checked_mul(12)?))
            .map(midnight_utc),
        RelativeUnit::Month => now
            .date_naive()
            .checked_sub_months(Months::new(count))
            .map(midnight_utc),
        RelativeUnit::Week => now.checked_sub_signed(Duration::days(i64::from(count) * 7)),
        RelativeUnit::Day => now.checked_sub_signed(Duration::days(i64::from(count))),
    }
}

/// Leading integer of a phrase; "a"/"an" count as one.
fn leading_count(phrase: &str) -> Option<u32> {
    let digits: String = phrase.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        return digits.parse().ok();
    }

    match phrase.split_whitespace().next() {
        Some("a") | Some("an") => Some(1),
        _ => None,
    }
}

/// RFC 2822 as feeds actually write it: a wrong weekday or a `UTC` zone are
/// tolerated.
fn parse_rfc2822_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let parse = |text: &str| {
        DateTime::parse_from_rfc2822(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    };

    let zoned = match raw.strip_suffix(" UTC") {
        Some(head) => format!("{} +0000", head),
        None => raw.to_string(),
    };

    parse(&zoned).or_else(|| parse(strip_weekday(&zoned)))
}

/// Drop a leading "Monday, " / "Mon, " prefix.
fn strip_weekday(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((head, rest)) if head.trim().parse::<Weekday>().is_ok() => rest.trim(),
        _ => raw,
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            normalize_date("2024-03-01T00:00:00Z", now()),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            normalize_date("2024-03-01T02:00:00+02:00", now()),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            normalize_date("Fri, 01 Mar 2024 00:00:00 GMT", now()),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_rfc2822_lenient() {
        assert_eq!(
            normalize_date("Sat, 01 Mar 2024 00:00:00 GMT", now()),
            Some(ymd(2024, 3, 1))
        );
        assert_eq!(
            normalize_date("Fri, 01 Mar 2024 00:00:00 UTC", now()),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_plain_dates() {
        assert_eq!(normalize_date("2024-03-01", now()), Some(ymd(2024, 3, 1)));
        assert_eq!(normalize_date("2024/03/01", now()), Some(ymd(2024, 3, 1)));
        assert_eq!(normalize_date("March 1, 2024", now()), Some(ymd(2024, 3, 1)));
        assert_eq!(normalize_date("Mar 1, 2024", now()), Some(ymd(2024, 3, 1)));
        assert_eq!(normalize_date("1 March 2024", now()), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_weekday_prefix() {
        assert_eq!(
            normalize_date("Friday, March 1, 2024", now()),
            Some(ymd(2024, 3, 1))
        );
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        assert_eq!(
            normalize_date("2024-03-01T10:15:00", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_years_ago() {
        let fixed = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(normalize_date("2 years ago", fixed), Some(ymd(2023, 1, 15)));
        // Time of day is dropped for calendar arithmetic
        assert_eq!(normalize_date("2 years ago", now()), Some(ymd(2023, 1, 15)));
    }

    #[test]
    fn test_months_ago() {
        assert_eq!(normalize_date("3 months ago", now()), Some(ymd(2024, 10, 15)));
    }

    #[test]
    fn test_month_end_clamps() {
        let may_31 = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        assert_eq!(normalize_date("3 months ago", may_31), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn test_weeks_and_days_keep_time() {
        assert_eq!(
            normalize_date("2 weeks ago", now()),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(
            normalize_date("5 days ago", now()),
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_article_counts_as_one() {
        assert_eq!(normalize_date("a year ago", now()), Some(ymd(2024, 1, 15)));
        assert_eq!(
            normalize_date("a day ago", now()),
            Some(Utc.with_ymd_and_hms(2025, 1, 14, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_year_wins_over_other_units() {
        assert_eq!(
            normalize_date("1 year and 2 months ago", now()),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(normalize_date("", now()), None);
        assert_eq!(normalize_date("soon", now()), None);
        assert_eq!(normalize_date("yesterday", now()), None);
        assert_eq!(normalize_date("some days ago", now()), None);
    }
}
