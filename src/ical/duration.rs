//! ISO-8601 durations, as used by `DURATION` and relative `TRIGGER`s
//!
//! Durations are handled as a signed number of seconds.
//! Nominal units that have no fixed length (years, months) are not supported, RFC5545 forbids them anyway.

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;

/// Longest duration that still fits in a `chrono::Duration`
const MAX_SECONDS: f64 = (i64::MAX / 1000) as f64;

/// Format seconds as an iCal duration, e.g. `-PT2H`, `P1DT30M`, `PT0S`
pub fn format_duration(seconds: i64) -> String {
    let mut out = String::new();
    if seconds < 0 {
        out.push('-');
    }
    out.push('P');

    let total = seconds.unsigned_abs();
    let days = total / 86400;
    let hours = (total % 86400) / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours > 0 || minutes > 0 || secs > 0 || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if secs > 0 || total == 0 {
            out.push_str(&format!("{}S", secs));
        }
    }
    out
}

/// Parse an iCal duration into seconds.
///
/// Fractional values (`PT1.5H`, as some clients write) are accepted and rounded to the closest second.
/// Returns `None` for anything that is not a valid duration; the caller decides how to degrade.
pub fn parse_duration(value: &str) -> Option<i64> {
    let value = value.trim().to_uppercase();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(&value)),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut has_component = false;

    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            ',' => number.push('.'),
            'T' if !in_time && number.is_empty() => in_time = true,
            'W' | 'D' | 'H' | 'M' | 'S' => {
                let n: f64 = number.parse().ok()?;
                number.clear();
                let unit = match (c, in_time) {
                    ('W', false) => WEEK,
                    ('D', false) => DAY,
                    ('H', true) => HOUR,
                    ('M', true) => MINUTE,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                total += n * unit;
                has_component = true;
            },
            _ => return None,
        }
    }

    if !number.is_empty() || !has_component {
        return None;
    }
    if !total.is_finite() || total > MAX_SECONDS {
        log::debug!("Duration {:?} is out of range", value);
        return None;
    }

    let seconds = total.round() as i64;
    Some(if negative { -seconds } else { seconds })
}

/// Whether a value looks like a duration rather than a date-time
pub fn is_duration(value: &str) -> bool {
    let value = value.trim_start_matches(|c| c == '-' || c == '+');
    value.starts_with('P') || value.starts_with('p')
}
