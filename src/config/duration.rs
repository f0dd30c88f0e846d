//! Human-readable duration strings (`"4 days"`, `"90m"`, `"-1h"`, `"1500"`).
//!
//! Negative values are accepted here; rejecting them is the loader's job.

use std::sync::LazyLock;

use regex::Regex;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

/// Inputs longer than this are rejected outright.
const MAX_INPUT_LEN: usize = 100;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(-?(?:\d+)?\.?\d+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    )
    .unwrap()
});

/// Parse a duration string into a signed duration.
///
/// A bare number is milliseconds. Fractional values round to the nearest
/// millisecond.
pub fn parse_duration(input: &str) -> Result<chrono::Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_INPUT_LEN {
        return Err(format!("invalid duration: {input:?}"));
    }

    let caps = DURATION_PATTERN
        .captures(trimmed)
        .ok_or_else(|| format!("invalid duration: {input:?}"))?;

    let amount: f64 = caps[1]
        .parse()
        .map_err(|e| format!("invalid duration amount in {input:?}: {e}"))?;

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
        _ => 1.0,
    };

    let millis = (amount * factor).round();
    // chrono's lower bound is -i64::MAX, so the range is symmetric.
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(format!("duration out of range: {input:?}"));
    }
    chrono::Duration::try_milliseconds(millis as i64)
        .ok_or_else(|| format!("duration out of range: {input:?}"))
}
