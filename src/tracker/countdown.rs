//! Deadline countdown

use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// Time left until a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Passed,
}

impl Countdown {
    /// Countdown from `now` to `deadline`
    ///
    /// Anything at or below zero milliseconds left is `Passed`.
    pub fn between(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let left_ms = (deadline - now).num_milliseconds();
        if left_ms <= 0 {
            return Countdown::Passed;
        }

        const SECOND: i64 = 1000;
        const MINUTE: i64 = 60 * SECOND;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;

        Countdown::Remaining {
            days: left_ms / DAY,
            hours: (left_ms % DAY) / HOUR,
            minutes: (left_ms % HOUR) / MINUTE,
            seconds: (left_ms % MINUTE) / SECOND,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Countdown::Passed)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{}d {}h {}m {}s left", days, hours, minutes, seconds),
            Countdown::Passed => f.write_str("deadline passed"),
        }
    }
}

/// Parse a task deadline as stored by the backend
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` and plain
/// `YYYY-MM-DD`. Forms without an offset are read as UTC; a bare date means
/// midnight.
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDeadline(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_remaining_breakdown() {
        let now = at(2025, 6, 1, 0, 0, 0);
        let deadline = now + Duration::days(2) + Duration::hours(3) + Duration::minutes(4)
            + Duration::seconds(5)
            + Duration::milliseconds(900);

        assert_eq!(
            Countdown::between(deadline, now),
            Countdown::Remaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn test_passed_at_and_after_deadline() {
        let now = at(2025, 6, 1, 12, 0, 0);
        assert!(Countdown::between(now, now).is_passed());
        assert!(Countdown::between(now - Duration::seconds(1), now).is_passed());
    }

    #[test]
    fn test_sub_second_remaining_is_not_passed() {
        let now = at(2025, 6, 1, 12, 0, 0);
        let countdown = Countdown::between(now + Duration::milliseconds(400), now);
        assert_eq!(countdown.to_string(), "0d 0h 0m 0s left");
    }

    #[test]
    fn test_display() {
        let countdown = Countdown::Remaining {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
        };
        assert_eq!(countdown.to_string(), "1d 2h 3m 4s left");
        assert_eq!(Countdown::Passed.to_string(), "deadline passed");
    }

    #[test]
    fn test_parse_deadline_formats() {
        assert_eq!(parse_deadline("2025-06-01").unwrap(), at(2025, 6, 1, 0, 0, 0));
        assert_eq!(
            parse_deadline("2025-06-01T23:59").unwrap(),
            at(2025, 6, 1, 23, 59, 0)
        );
        assert_eq!(
            parse_deadline("2025-06-01T23:59:30").unwrap(),
            at(2025, 6, 1, 23, 59, 30)
        );
        assert_eq!(
            parse_deadline("2025-06-01T10:00:00+07:00").unwrap(),
            at(2025, 6, 1, 3, 0, 0)
        );
        assert_eq!(
            parse_deadline("2025-06-01T10:00:00.000Z").unwrap(),
            at(2025, 6, 1, 10, 0, 0)
        );
    }

    #[test]
    fn test_parse_deadline_rejects_garbage() {
        assert!(matches!(
            parse_deadline("besok"),
            Err(ValidationError::InvalidDeadline(_))
        ));
        assert!(parse_deadline("2025-13-01").is_err());
    }
}
