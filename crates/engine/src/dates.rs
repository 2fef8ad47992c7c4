use chrono::{Days, NaiveDate};

/// Staleness reported for a missing or unreadable contact date.
pub const NEVER_CONTACTED_DAYS: i64 = 999;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Lenient date parse for imported text. Accepts ISO dates, US slash dates,
/// and ISO timestamps (the time part is ignored).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Absolute whole days between `today` and `date`.
///
/// `None` or unparsable input yields [`NEVER_CONTACTED_DAYS`].
pub fn days_since(date: Option<&str>, today: NaiveDate) -> i64 {
    match date.and_then(parse_date) {
        Some(d) => (today - d).num_days().abs(),
        None => NEVER_CONTACTED_DAYS,
    }
}

/// ISO `YYYY-MM-DD` text, the form stored on records.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `date + days`, saturating at the calendar limit.
pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_supported_forms() {
        assert_eq!(parse_date("2026-03-04"), Some(d("2026-03-04")));
        assert_eq!(parse_date("3/4/2026"), Some(d("2026-03-04")));
        assert_eq!(parse_date("2026/03/04"), Some(d("2026-03-04")));
        assert_eq!(parse_date("2026-03-04T15:30:00Z"), Some(d("2026-03-04")));
        assert_eq!(parse_date(" 2026-03-04 "), Some(d("2026-03-04")));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("2026-13-40"), None);
    }

    #[test]
    fn days_since_is_absolute() {
        let today = d("2026-05-10");
        assert_eq!(days_since(Some("2026-05-07"), today), 3);
        assert_eq!(days_since(Some("2026-05-13"), today), 3);
        assert_eq!(days_since(Some("2026-05-10"), today), 0);
    }

    #[test]
    fn missing_or_bad_dates_are_maximally_stale() {
        let today = d("2026-05-10");
        assert_eq!(days_since(None, today), NEVER_CONTACTED_DAYS);
        assert_eq!(days_since(Some(""), today), NEVER_CONTACTED_DAYS);
        assert_eq!(days_since(Some("n/a"), today), NEVER_CONTACTED_DAYS);
    }
}
