//! Scheduled-send timing: `HH:MM` parsing and the wall-clock poll loop.

use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, Timelike};
use tokio::time::sleep;
use tracing::debug;

use crate::error::WaError;

/// Period between wall-clock checks while waiting for the target minute.
pub const POLL_PERIOD: Duration = Duration::from_secs(30);

/// A time of day at whole-minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl FromStr for TimeOfDay {
    type Err = WaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason: &str| WaError::ScheduleParse {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (hour_part, minute_part) = trimmed
            .split_once(':')
            .ok_or_else(|| parse_err("expected HH:MM"))?;
        if minute_part.contains(':') {
            return Err(parse_err("expected HH:MM"));
        }

        let hour: u32 = hour_part
            .parse()
            .map_err(|_| parse_err("hour is not a number"))?;
        let minute: u32 = minute_part
            .parse()
            .map_err(|_| parse_err("minute is not a number"))?;

        if hour > 23 {
            return Err(parse_err("hour out of range (0-23)"));
        }
        if minute > 59 {
            return Err(parse_err("minute out of range (0-59)"));
        }

        Ok(TimeOfDay { hour, minute })
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Wall-clock source, injectable so the poll loop is testable.
pub trait Clock: Send + Sync {
    /// Current local (hour, minute).
    fn now_hm(&self) -> (u32, u32);
}

/// The real local clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_hm(&self) -> (u32, u32) {
        let now = Local::now();
        (now.hour(), now.minute())
    }
}

/// Polls `clock` every [`POLL_PERIOD`] until it reads exactly `target`, then
/// returns. Exact-equality match at minute granularity: if the process is not
/// running at the target minute, this never returns (no catch-up semantics).
pub async fn wait_until(target: TimeOfDay, clock: &dyn Clock) {
    loop {
        let (hour, minute) = clock.now_hm();
        if hour == target.hour && minute == target.minute {
            return;
        }
        debug!(
            target = "wasend.schedule",
            now = %format_args!("{hour:02}:{minute:02}"),
            until = %target,
            "waiting for scheduled time"
        );
        sleep(POLL_PERIOD).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeClock;

    #[test]
    fn parses_valid_times() {
        for (input, hour, minute) in [
            ("09:05", 9, 5),
            ("00:00", 0, 0),
            ("23:59", 23, 59),
            (" 12:30 ", 12, 30),
            ("\t07:45\n", 7, 45),
        ] {
            let parsed: TimeOfDay = input.parse().unwrap();
            assert_eq!(parsed, TimeOfDay { hour, minute }, "input {input:?}");
        }
    }

    #[test]
    fn rejects_malformed_times() {
        for input in ["", "9", "09", "0905", "09:05:00", "ab:cd", "9:xx", "::"] {
            let err = input.parse::<TimeOfDay>().unwrap_err();
            assert!(
                matches!(err, WaError::ScheduleParse { .. }),
                "input {input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_times() {
        for input in ["24:00", "25:10", "12:60", "99:99"] {
            let err = input.parse::<TimeOfDay>().unwrap_err();
            assert!(err.to_string().contains("out of range"), "input {input:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_first_exact_match() {
        // Started at 09:04, 30s poll: the match lands on the second reading.
        let clock = FakeClock::new(vec![(9, 4), (9, 4), (9, 5)]);
        wait_until(TimeOfDay { hour: 9, minute: 5 }, &clock).await;
        assert_eq!(clock.consults(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_immediately_on_match() {
        let clock = FakeClock::new(vec![(18, 30)]);
        wait_until(TimeOfDay { hour: 18, minute: 30 }, &clock).await;
        assert_eq!(clock.consults(), 1);
    }
}
