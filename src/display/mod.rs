//! Formatting helpers shared by the derived views.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::errors::AppError;

/// Current local clock as `HH:MM`.
pub fn now_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Today's local calendar day as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Validate a `YYYY-MM-DD` day string.
pub fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid day '{}', expected YYYY-MM-DD", raw)))
}

/// Calendar day of a stored date: a bare `YYYY-MM-DD` is kept, an RFC 3339
/// timestamp becomes its local day.
pub fn local_day(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts
            .with_timezone(&Local)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string());
    }
    parse_day(raw)?;
    Ok(raw.to_string())
}

/// Render a 24-hour `HH:MM` time as `h:MM AM/PM`. Empty input stays empty.
pub fn to_display_ampm(hhmm: &str) -> String {
    if hhmm.is_empty() {
        return String::new();
    }
    let (hour, minutes) = hhmm.split_once(':').unwrap_or((hhmm, ""));
    let Ok(mut h) = hour.trim().parse::<u32>() else {
        return hhmm.to_string();
    };
    let suffix = if h >= 12 { "PM" } else { "AM" };
    if h == 0 {
        h = 12;
    } else if h > 12 {
        h -= 12;
    }
    format!("{}:{} {}", h, minutes, suffix)
}

/// Coarse relative time: `Just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        "Just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

/// Relative time for an RFC 3339 timestamp, `Recently` when it cannot be read.
pub fn time_ago_rfc3339(raw: &str, now: DateTime<Utc>) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| time_ago(t.with_timezone(&Utc), now))
        .unwrap_or_else(|_| "Recently".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_local_day_normalises_timestamps() {
        assert_eq!(local_day("2026-10-17").unwrap(), "2026-10-17");

        let ts = "2026-10-17T09:00:00.000Z";
        let expected = DateTime::parse_from_rfc3339(ts)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(local_day(ts).unwrap(), expected);

        assert_eq!(
            local_day("17/10/2026").unwrap_err().error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_ampm_boundaries() {
        assert_eq!(to_display_ampm("00:15"), "12:15 AM");
        assert_eq!(to_display_ampm("09:05"), "9:05 AM");
        assert_eq!(to_display_ampm("12:00"), "12:00 PM");
        assert_eq!(to_display_ampm("23:59"), "11:59 PM");
        assert_eq!(to_display_ampm(""), "");
    }

    #[test]
    fn test_ampm_passes_through_garbage() {
        assert_eq!(to_display_ampm("soon"), "soon");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(10), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
        assert_eq!(time_ago_rfc3339("not a time", now), "Recently");
    }

    #[test]
    fn test_parse_day() {
        assert!(parse_day("2026-10-17").is_ok());
        assert!(parse_day("17/10/2026").is_err());
    }
}
