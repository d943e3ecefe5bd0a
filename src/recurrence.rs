//! Recurrence encoding (`RRULE`)
//!
//! Tasks repeat "every N seconds". Calendar clients understand frequencies, so the interval is expressed in the largest unit that divides it evenly.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, Utc};

use crate::task::RepeatMode;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// `FREQ` values of an `RRULE`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Secondly => "SECONDLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Largest unit first: the first one that divides the interval wins
const UNITS: [(i64, Frequency); 4] = [
    (SECONDS_PER_WEEK, Frequency::Weekly),
    (SECONDS_PER_DAY, Frequency::Daily),
    (SECONDS_PER_HOUR, Frequency::Hourly),
    (SECONDS_PER_MINUTE, Frequency::Minutely),
];

/// Reduce a repeat interval (in seconds, > 0) to a frequency and an interval
pub fn interval_and_frequency(repeat_after: i64) -> (Frequency, i64) {
    for (unit, freq) in UNITS.iter() {
        if repeat_after % unit == 0 {
            return (*freq, repeat_after / unit);
        }
    }
    (Frequency::Secondly, repeat_after)
}

/// Build the value of the `RRULE` property, if any.
///
/// Monthly tasks are anchored on the day of month of their due date, they have no `RRULE` without one.
pub fn rrule(repeat_after: i64, mode: RepeatMode, due: Option<&DateTime<Utc>>) -> Option<String> {
    match mode {
        RepeatMode::None => None,
        RepeatMode::Monthly => match due {
            Some(due) => Some(format!("FREQ={};BYMONTHDAY={:02}", Frequency::Monthly, due.day())),
            None => {
                log::debug!("Monthly repeating task without a due date, no RRULE can be built");
                None
            },
        },
        RepeatMode::Default => {
            if repeat_after <= 0 {
                return None;
            }
            let (freq, interval) = interval_and_frequency(repeat_after);
            Some(format!("FREQ={};INTERVAL={}", freq, interval))
        },
    }
}
