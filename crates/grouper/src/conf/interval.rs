//! Interval — window width parsing and display.
//!
//! Accepts a sequence of `<decimal><unit>` terms such as `15m`, `1h30m`,
//! `1.5h` or `500ms`. Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.

use std::time::Duration;

use crate::error::ConfigError;

fn unit_nanos(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" | "μs" => Some(1e3),
        "ms" => Some(1e6),
        "s" => Some(1e9),
        "m" => Some(60e9),
        "h" => Some(3600e9),
        _ => None,
    }
}

/// Parse a window width. Zero and negative widths are rejected.
pub fn parse_interval(input: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidInterval {
        input: input.to_string(),
        reason,
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(invalid("empty interval".to_string()));
    }
    if text.starts_with('-') {
        return Err(invalid("interval must not be negative".to_string()));
    }

    let is_numeric = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = text.strip_prefix('+').unwrap_or(text);
    let mut total_nanos = 0f64;

    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !is_numeric(c)).unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid(format!("expected a number at {:?}", rest)));
        }
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail.find(is_numeric).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(invalid(format!("missing unit after {:?}", number)));
        }

        let scale = unit_nanos(unit).ok_or_else(|| invalid(format!("unknown unit {:?}", unit)))?;
        let value: f64 = number
            .parse()
            .map_err(|_| invalid(format!("bad number {:?}", number)))?;

        total_nanos += value * scale;
        rest = tail;
    }

    let total_nanos = total_nanos.round();
    if total_nanos < 1.0 {
        return Err(invalid("interval must be greater than zero".to_string()));
    }
    if total_nanos > u64::MAX as f64 {
        return Err(invalid("interval is too large".to_string()));
    }

    Ok(Duration::from_nanos(total_nanos as u64))
}

/// Render a width the way it is usually written on the command line,
/// e.g. `15m0s`, `1h30m0s`, `500ms`.
pub fn format_interval(interval: Duration) -> String {
    let nanos = interval.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        let (value, unit) = if nanos < 1_000 {
            (nanos as f64, "ns")
        } else if nanos < 1_000_000 {
            (nanos as f64 / 1e3, "µs")
        } else {
            (nanos as f64 / 1e6, "ms")
        };
        return format!("{}{}", value, unit);
    }

    let total_secs = interval.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    let seconds = match interval.subsec_nanos() {
        0 => secs.to_string(),
        frac => format!("{}.{:09}", secs, frac).trim_end_matches('0').to_string(),
    };

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
