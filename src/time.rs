use chrono::{NaiveDateTime, NaiveTime};

use crate::error::{Result, ScheduleError, TokenKind};

pub type Hour = u32;
pub type Minute = u32;

fn parse_token(raw: &str, kind: TokenKind, limit: u32) -> Result<u32> {
    let token = raw.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScheduleError::malformed(raw, kind));
    }

    match token.parse::<u32>() {
        Ok(value) if value < limit => Ok(value),
        _ => Err(ScheduleError::malformed(raw, kind)),
    }
}

/// Minute tokens in the source data carry stray whitespace (`"00 "`), so they
/// are trimmed before parsing.
pub fn normalize_minute(raw: &str) -> Result<Minute> {
    parse_token(raw, TokenKind::Minute, 60)
}

pub fn normalize_hour(raw_key: &str) -> Result<Hour> {
    parse_token(raw_key, TokenKind::Hour, 24)
}

/// A concrete departure on the calendar day of the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Departure {
    pub time: NaiveDateTime,
    pub minutes_until: i64,
}

impl Departure {
    /// `None` unless the departure is strictly after `now`.
    pub fn at(now: NaiveDateTime, hour: Hour, minute: Minute) -> Option<Self> {
        let time = departure_at(now, hour, minute)?;
        (time > now).then(|| Departure {
            time,
            minutes_until: minutes_between(now, time),
        })
    }
}

pub fn departure_at(now: NaiveDateTime, hour: Hour, minute: Minute) -> Option<NaiveDateTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).map(|time| now.date().and_time(time))
}

/// Whole minutes from `start` to `end`, rounded down.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().div_euclid(60)
}
