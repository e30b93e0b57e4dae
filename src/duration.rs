/// Parsing for the `<int><unit>` expiry strings used in configuration.
///
/// Accepted units: `ms`, `s`, `m`, `h`, `d`. Anything else is rejected.

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, ConfigError};

lazy_static! {
    static ref TTL_PATTERN: Regex = Regex::new(r"^(\d+)(ms|s|m|h|d)$").unwrap();
}

pub fn parse(ttl: &str) -> Result<Duration, AppError> {
    let captures = TTL_PATTERN.captures(ttl).ok_or_else(|| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "invalid time format: {}",
            ttl
        )))
    })?;

    let value: i64 = captures[1].parse().map_err(|_| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "time value out of range: {}",
            ttl
        )))
    })?;

    let duration = match &captures[2] {
        "ms" => Duration::try_milliseconds(value),
        "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        _ => unreachable!(),
    };

    duration.ok_or_else(|| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "time value out of range: {}",
            ttl
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_unit() {
        assert_eq!(parse("250ms").unwrap(), Duration::milliseconds(250));
        assert_eq!(parse("45s").unwrap(), Duration::seconds(45));
        assert_eq!(parse("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "15", "m15", "15 m", "15w", "15M", "-3s", "1.5h"] {
            assert!(parse(bad).is_err(), "should reject {:?}", bad);
        }
    }

    #[test]
    fn rejects_values_that_overflow() {
        // Too many digits for i64
        assert!(parse("99999999999999999999999s").is_err());
        // Fits i64 but overflows a duration
        assert!(parse("999999999999999d").is_err());
    }
}
