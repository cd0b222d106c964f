use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{CoreError, CoreResult};

/// Number of hour rows in a day grid.
pub const SLOTS_PER_DAY: u32 = 24;

/// A time of day with minute precision, stored as minutes since midnight.
///
/// The wire and storage format is the `"HH:MM"` string produced by the
/// planner forms, so serde round-trips through that representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> CoreResult<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(CoreError::ValidationError(format!(
                "Time out of range: {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn from_minutes(minutes: u32) -> CoreResult<Self> {
        if minutes >= SLOTS_PER_DAY * 60 {
            return Err(CoreError::ValidationError(format!(
                "Time out of range: {} minutes",
                minutes
            )));
        }
        Ok(Self {
            minutes: minutes as u16,
        })
    }

    pub fn total_minutes(&self) -> u32 {
        self.minutes as u32
    }

    pub fn hour(&self) -> u32 {
        self.total_minutes() / 60
    }

    pub fn minute(&self) -> u32 {
        self.total_minutes() % 60
    }

    /// Hour slot this time falls into when used as a range start.
    pub fn start_slot(&self) -> u32 {
        self.total_minutes() / 60
    }

    /// Hour slot boundary when used as a range end, rounded up to whole hours.
    pub fn end_slot(&self) -> u32 {
        self.total_minutes().div_ceil(60)
    }

    /// 12-hour clock label, e.g. `"10:30 AM"`.
    pub fn label_12h(&self) -> String {
        let period = if self.hour() < 12 { "AM" } else { "PM" };
        let hour = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minute(), period)
    }
}

/// 12-hour label for an hour slot, e.g. slot 13 renders as `"1:00 PM"`.
pub fn slot_label(slot: u32) -> String {
    let period = if slot < 12 { "AM" } else { "PM" };
    let hour = match slot % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", hour, period)
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::ValidationError(format!("Invalid time of day: {:?}", s));
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
