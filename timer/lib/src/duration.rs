//! Duration flag parsing and formatting.

use std::time::Duration;

use crate::error::ParseError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;

/// Longest accepted countdown, a little over 136 years.
const MAX_TOTAL_SECS: u64 = u32::MAX as u64;

/// Parses flag-style duration text such as `-h 1 -m 30 -s 15`.
///
/// ## Supported Flags
///
/// - `-h N` - hours
/// - `-m N` - minutes
/// - `-s N` - seconds
///
/// Each flag is optional and defaults to zero. Flags may also be written with
/// two dashes (`--m 5`) or with an inline value (`-m=5`). The token after a
/// flag is always read as its value, so `-s -1` is a negative value rather
/// than a missing one. When a flag is repeated the last value wins.
///
/// An empty input parses to a zero duration; rejecting zero is up to the
/// caller.
///
/// ## Errors
///
/// Returns a [`ParseError`] when a token is not a recognised flag, a value is
/// missing or not an integer, any value is negative, or the total is longer
/// than a countdown can run.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use timer_lib::parse_duration_flags;
///
/// let duration = parse_duration_flags("-h 1 -m 2 -s 3").unwrap();
/// assert_eq!(duration, Duration::from_secs(3723));
///
/// assert!(parse_duration_flags("-s -1").is_err());
/// ```
pub fn parse_duration_flags(input: &str) -> Result<Duration, ParseError> {
    let mut hours: i64 = 0;
    let mut minutes: i64 = 0;
    let mut seconds: i64 = 0;

    let mut tokens = input.split_whitespace();
    while let Some(token) = tokens.next() {
        let Some(flag) = token.strip_prefix('-') else {
            return Err(ParseError::UnexpectedArgument(token.to_string()));
        };
        let flag = flag.strip_prefix('-').unwrap_or(flag);

        let (name, inline_value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        let slot = match name {
            "h" => &mut hours,
            "m" => &mut minutes,
            "s" => &mut seconds,
            _ => return Err(ParseError::UnknownFlag(token.to_string())),
        };

        let value = match inline_value {
            Some(value) => value,
            None => tokens
                .next()
                .ok_or_else(|| ParseError::MissingValue(name.to_string()))?,
        };

        *slot = value.parse().map_err(|_| ParseError::InvalidValue {
            flag: name.to_string(),
            value: value.to_string(),
        })?;
    }

    if hours < 0 || minutes < 0 || seconds < 0 {
        return Err(ParseError::Negative);
    }

    // Non-negative i64 always fits in u64.
    let total = (hours as u64)
        .checked_mul(SECS_PER_HOUR)
        .zip((minutes as u64).checked_mul(SECS_PER_MINUTE))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(seconds as u64))
        .filter(|&total| total <= MAX_TOTAL_SECS)
        .ok_or(ParseError::Overflow)?;

    Ok(Duration::from_secs(total))
}

/// Rounds a duration to the nearest whole second, halves rounding up.
pub fn round_to_secs(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_millis() >= 500))
}

/// Renders a duration in its canonical text form, e.g. `1h2m3s`.
///
/// Sub-second precision is rounded away. Leading zero units are omitted but
/// trailing ones are kept, so 25 minutes renders as `25m0s` and zero as `0s`.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use timer_lib::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
/// assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total = round_to_secs(duration);
    let hours = total / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sums_all_units() {
        let duration = parse_duration_flags("-h 1 -m 2 -s 3").expect("valid flags");
        assert_eq!(duration, Duration::from_secs(3723));
    }

    #[test]
    fn parse_accepts_any_flag_order() {
        let duration = parse_duration_flags("-s 30 -m 25").expect("valid flags");
        assert_eq!(duration, Duration::from_secs(25 * 60 + 30));
    }

    #[test]
    fn parse_empty_input_is_zero() {
        assert_eq!(parse_duration_flags("").expect("empty"), Duration::ZERO);
        assert_eq!(parse_duration_flags("   ").expect("blank"), Duration::ZERO);
    }

    #[test]
    fn parse_explicit_zero_is_not_an_error() {
        assert_eq!(parse_duration_flags("-s 0").expect("zero"), Duration::ZERO);
    }

    #[test]
    fn parse_accepts_double_dash_and_inline_values() {
        assert_eq!(
            parse_duration_flags("--m 5").expect("double dash"),
            Duration::from_secs(300)
        );
        assert_eq!(
            parse_duration_flags("-m=5 --s=7").expect("inline"),
            Duration::from_secs(307)
        );
    }

    #[test]
    fn parse_repeated_flag_keeps_last_value() {
        let duration = parse_duration_flags("-s 10 -s 20").expect("repeat");
        assert_eq!(duration, Duration::from_secs(20));
    }

    #[test]
    fn parse_rejects_negative_values() {
        assert_eq!(parse_duration_flags("-s -1"), Err(ParseError::Negative));
        assert_eq!(parse_duration_flags("-h -2 -m 5"), Err(ParseError::Negative));
    }

    #[test]
    fn parse_rejects_unknown_flags() {
        assert_eq!(
            parse_duration_flags("-d 1"),
            Err(ParseError::UnknownFlag("-d".to_string()))
        );
        assert!(matches!(
            parse_duration_flags("-"),
            Err(ParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_duration_flags("---s 1"),
            Err(ParseError::UnknownFlag(_))
        ));
    }

    #[test]
    fn parse_rejects_non_integer_values() {
        assert_eq!(
            parse_duration_flags("-m five"),
            Err(ParseError::InvalidValue {
                flag: "m".to_string(),
                value: "five".to_string(),
            })
        );
        assert!(parse_duration_flags("-m 1.5").is_err());
        assert!(parse_duration_flags("-m=").is_err());
    }

    #[test]
    fn parse_rejects_missing_value() {
        assert_eq!(
            parse_duration_flags("-m 5 -s"),
            Err(ParseError::MissingValue("s".to_string()))
        );
    }

    #[test]
    fn parse_does_not_interpret_bare_numbers() {
        assert_eq!(
            parse_duration_flags("25"),
            Err(ParseError::UnexpectedArgument("25".to_string()))
        );
        assert!(parse_duration_flags("-m 5 10").is_err());
    }

    #[test]
    fn parse_reports_overflow() {
        let input = format!("-h {}", i64::MAX);
        assert_eq!(parse_duration_flags(&input), Err(ParseError::Overflow));
    }

    #[test]
    fn parse_rejects_totals_longer_than_a_countdown_can_run() {
        let input = format!("-s {}", i64::MAX);
        assert_eq!(parse_duration_flags(&input), Err(ParseError::Overflow));

        let limit = format!("-s {}", u32::MAX);
        assert_eq!(
            parse_duration_flags(&limit),
            Ok(Duration::from_secs(u64::from(u32::MAX)))
        );
        let past_limit = format!("-s {}", u64::from(u32::MAX) + 1);
        assert_eq!(parse_duration_flags(&past_limit), Err(ParseError::Overflow));
    }

    #[test]
    fn format_matches_canonical_text() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(25 * 60)), "25m0s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h0m0s");
    }

    #[test]
    fn format_rounds_to_nearest_second() {
        assert_eq!(format_duration(Duration::from_millis(1499)), "1s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "2s");
    }

    #[test]
    fn round_to_secs_rounds_half_up() {
        assert_eq!(round_to_secs(Duration::from_millis(499)), 0);
        assert_eq!(round_to_secs(Duration::from_millis(500)), 1);
        assert_eq!(round_to_secs(Duration::from_millis(2_400)), 2);
        assert_eq!(round_to_secs(Duration::MAX), u64::MAX);
    }
}
