use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::Deserialize;

use crate::{
    time::{Hour, Minute},
    timetable::DayType,
};

/// 12-hour wall clock, `"H:MM AM"`. Midnight and noon both read 12.
pub fn format_ampm(hour: Hour, minute: Minute) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {suffix}")
}

pub fn format_clock_time(instant: NaiveDateTime) -> String {
    instant.format("%-I:%M %p").to_string()
}

/// Heading for one hour row of a schedule grid.
pub fn format_hour_heading(hour: Hour) -> String {
    format_ampm(hour, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceDay {
    Weekday,
    Saturday,
    Sunday,
}

impl ServiceDay {
    /// The timetable to use, `None` on Sunday when no buses run.
    pub fn day_type(&self) -> Option<DayType> {
        match self {
            ServiceDay::Weekday => Some(DayType::Weekday),
            ServiceDay::Saturday => Some(DayType::Saturday),
            ServiceDay::Sunday => None,
        }
    }
}

impl fmt::Display for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceDay::Weekday => write!(f, "weekday"),
            ServiceDay::Saturday => write!(f, "Saturday"),
            ServiceDay::Sunday => write!(f, "Sunday"),
        }
    }
}

/// How the current instant maps to a service day.
///
/// The deployed site always reports Monday whatever the date, which looks
/// like a bug. Until that is settled both readings are available and
/// `FixedMonday` stays the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayClassification {
    #[default]
    FixedMonday,
    Calendar,
}

impl FromStr for DayClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed-monday" => Ok(DayClassification::FixedMonday),
            "calendar" => Ok(DayClassification::Calendar),
            other => Err(format!(
                "unknown day classification {other:?}, expected fixed-monday or calendar"
            )),
        }
    }
}

pub fn classify_day(instant: NaiveDateTime, classification: DayClassification) -> ServiceDay {
    let weekday = match classification {
        DayClassification::FixedMonday => Weekday::Mon,
        DayClassification::Calendar => instant.weekday(),
    };

    match weekday {
        Weekday::Sat => ServiceDay::Saturday,
        Weekday::Sun => ServiceDay::Sunday,
        _ => ServiceDay::Weekday,
    }
}

/// Initial timetable selection: Saturday's on Saturday, weekday's otherwise.
pub fn default_day_type(day: ServiceDay) -> DayType {
    match day {
        ServiceDay::Saturday => DayType::Saturday,
        ServiceDay::Weekday | ServiceDay::Sunday => DayType::Weekday,
    }
}
