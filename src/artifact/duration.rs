//! Human-readable duration strings such as `"1 year"`, `"2h"` or `"1.5 days"`.
//!
//! A bare number is read as milliseconds. A year is 365.25 days.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

const MAX_INPUT_LEN: usize = 100;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(-?\d*\.?\d+) *",
        r"(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m",
        r"|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    ))
    .expect("duration pattern is valid")
});

/// Parse `input` into a number of milliseconds.
///
/// Returns `None` for anything that is not a number with an optional unit.
pub fn parse_millis(input: &str) -> Option<f64> {
    if input.is_empty() || input.len() > MAX_INPUT_LEN {
        return None;
    }
    let caps = DURATION_RE.captures(input)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "ms".to_string());

    let factor = match unit.as_str() {
        "years" | "year" | "yrs" | "yr" | "y" => YEAR,
        "weeks" | "week" | "w" => WEEK,
        "days" | "day" | "d" => DAY,
        "hours" | "hour" | "hrs" | "hr" | "h" => HOUR,
        "minutes" | "minute" | "mins" | "min" | "m" => MINUTE,
        "seconds" | "second" | "secs" | "sec" | "s" => SECOND,
        "milliseconds" | "millisecond" | "msecs" | "msec" | "ms" => 1.0,
        _ => return None,
    };
    Some(amount * factor)
}

/// Parse `input` as a positive duration.
///
/// Zero and negative amounts are rejected so that values like `"0"` or
/// `"-1 day"` are left to pass through as literal header text. The `ms`
/// package accepts any non-zero result, which would turn `"-1 day"` into a
/// negative max-age. Amounts too large for a `Duration` are rejected the
/// same way.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let millis = parse_millis(input)?;
    if !millis.is_finite() || millis <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(millis / SECOND).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_millis("1 year"), Some(31_557_600_000.0));
        assert_eq!(parse_millis("2h"), Some(7_200_000.0));
        assert_eq!(parse_millis("1.5 days"), Some(129_600_000.0));
        assert_eq!(parse_millis("10 SECONDS"), Some(10_000.0));
        assert_eq!(parse_millis("3 weeks"), Some(1_814_400_000.0));
        assert_eq!(parse_millis("250"), Some(250.0));
        assert_eq!(parse_millis(".5m"), Some(30_000.0));
        assert_eq!(parse_millis("-1 min"), Some(-60_000.0));
    }

    #[test]
    fn test_rejects_header_text() {
        assert_eq!(parse_millis("no-cache"), None);
        assert_eq!(parse_millis("public, max-age=60"), None);
        assert_eq!(parse_millis("1 fortnight"), None);
        assert_eq!(parse_millis(""), None);
        assert_eq!(parse_millis(&"1".repeat(101)), None);
    }

    #[test]
    fn test_parse_duration_floors_to_seconds() {
        assert_eq!(parse_duration("1 year").unwrap().as_secs(), 31_557_600);
        assert_eq!(parse_duration("1500ms").unwrap().as_secs(), 1);
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("-5s"), None);
    }

    #[test]
    fn test_overflowing_duration_is_rejected() {
        assert!(parse_millis("1000000000000 years").is_some());
        assert_eq!(parse_duration("1000000000000 years"), None);
        assert_eq!(parse_duration(&"9".repeat(99)), None);
    }
}
