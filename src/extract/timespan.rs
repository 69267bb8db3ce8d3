//! Timer notation to seconds
//!
//! `pytest-durations` prints `datetime.timedelta` values (`0:00:01.250000`,
//! `1 day, 2:00:00`), while other plugins and CI summaries print unit
//! strings such as `1h30m` or `250ms`. Both convert to fractional seconds.

use crate::record::Seconds;
use regex::Regex;
use std::sync::OnceLock;

static DAY_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
static UNIT_TOKEN_RE: OnceLock<Regex> = OnceLock::new();

const SECS_PER_DAY: f64 = 86_400.0;

fn day_prefix_re() -> &'static Regex {
    DAY_PREFIX_RE.get_or_init(|| {
        // SAFETY: static pattern, exercised by the tests below.
        Regex::new(r"^(\d+(?:\.\d+)?)\s*days?,?\s*(.*)$").expect("day prefix regex is valid")
    })
}

fn unit_token_re() -> &'static Regex {
    UNIT_TOKEN_RE.get_or_init(|| {
        // Longer units first: the alternation is leftmost-first
        Regex::new(
            r"(\d+(?:\.\d+)?)\s*(ms|us|µs|ns|days?|d|hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)",
        )
        .expect("unit token regex is valid")
    })
}

/// Convert a duration cell to [`Seconds`]
///
/// # Examples
///
/// ```
/// use pytest_digest::extract::to_seconds;
/// use pytest_digest::record::Seconds;
///
/// assert_eq!(to_seconds("1h30m"), Seconds::Known(5400.0));
/// assert_eq!(to_seconds("0:00:01.2500"), Seconds::Known(1.25));
/// assert_eq!(to_seconds("soon"), Seconds::Unknown);
/// ```
pub fn to_seconds(raw: &str) -> Seconds {
    match parse_timespan(raw) {
        Some(secs) => Seconds::from_secs(secs),
        None => Seconds::Unknown,
    }
}

/// Parse timer notation into seconds, `None` when not recognized
pub fn parse_timespan(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('-') {
        return None;
    }

    let (days, rest) = match day_prefix_re().captures(text) {
        Some(caps) => {
            let days: f64 = caps.get(1)?.as_str().parse().ok()?;
            (days, caps.get(2).map_or("", |m| m.as_str()).trim())
        }
        None => (0.0, text),
    };

    let rest_secs = if rest.is_empty() {
        0.0
    } else if rest.contains(':') {
        parse_clock(rest)?
    } else {
        parse_units(rest)?
    };

    Some(days * SECS_PER_DAY + rest_secs)
}

/// `H:MM:SS[.frac]` or `MM:SS[.frac]`
fn parse_clock(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return None,
    };

    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_digits(hours) || !is_digits(minutes) {
        return None;
    }
    let secs_valid = !seconds.is_empty()
        && seconds.chars().all(|c| c.is_ascii_digit() || c == '.')
        && seconds.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !secs_valid {
        return None;
    }

    let hours: f64 = hours.parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// A run of `<number><unit>` tokens covering the whole text
fn parse_units(text: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut cursor = 0;

    for caps in unit_token_re().captures_iter(text) {
        let whole = caps.get(0)?;
        if !text[cursor..whole.start()].trim().is_empty() {
            return None;
        }
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        total += value * unit_factor(caps.get(2)?.as_str())?;
        cursor = whole.end();
    }

    if cursor == 0 || !text[cursor..].trim().is_empty() {
        return None;
    }
    Some(total)
}

fn unit_factor(unit: &str) -> Option<f64> {
    let factor = match unit {
        "d" | "day" | "days" => SECS_PER_DAY,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" => 1e-3,
        "us" | "µs" => 1e-6,
        "ns" => 1e-9,
        _ => return None,
    };
    Some(factor)
}

/// Seconds in a CI build-time string such as `1m30s` or `2h5s`
///
/// Accepts every unit [`parse_timespan`] knows, fractions included, and
/// rounds the total to whole seconds.
pub fn build_time_secs(raw: &str) -> Option<u64> {
    let secs = parse_units(raw.trim())?;
    Some(secs.round() as u64)
}
