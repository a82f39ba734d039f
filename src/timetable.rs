use std::{collections::HashMap, fmt, fs, path::Path, str::FromStr};

use itertools::Itertools;
use serde::Deserialize;

use crate::{
    error::{Result, ScheduleError, TokenKind},
    time::{normalize_hour, normalize_minute, Hour, Minute},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DayType {
    #[serde(rename = "weekday")]
    Weekday,
    #[serde(rename = "Saturday")]
    Saturday,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Saturday];

    pub fn key(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(DayType::Weekday),
            "saturday" => Ok(DayType::Saturday),
            other => Err(format!("unknown day type {other:?}, expected weekday or saturday")),
        }
    }
}

/// Hour key (`"0".."23"`) to the minute tokens departing in that hour.
///
/// Key order carries no meaning. Minutes are expected ascending in source
/// order; [`HourTable::minute_order_violations`] reports where they are not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HourTable(pub HashMap<String, Vec<String>>);

/// One hour of a validated [`HourTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHour<'a> {
    pub hour: Hour,
    pub key: &'a str,
    pub tokens: &'a [String],
    pub minutes: Vec<Minute>,
}

fn parse_hour<'a>(key: &'a str, tokens: &'a [String]) -> Result<ParsedHour<'a>> {
    Ok(ParsedHour {
        hour: normalize_hour(key)?,
        key,
        tokens,
        minutes: tokens
            .iter()
            .map(|token| normalize_minute(token))
            .collect::<Result<Vec<_>>>()?,
    })
}

impl HourTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: impl Into<String>, minutes: Vec<String>) {
        self.0.insert(key.into(), minutes);
    }

    /// Every hour normalized and sorted numerically. Any malformed hour key or
    /// minute token fails the whole table, as do two keys naming the same hour
    /// (`"9"` and `"09"`).
    pub fn parse(&self) -> Result<Vec<ParsedHour<'_>>> {
        let mut hours = self
            .0
            .iter()
            .map(|(key, tokens)| parse_hour(key, tokens))
            .collect::<Result<Vec<_>>>()?;

        hours.sort_by(|a, b| a.hour.cmp(&b.hour).then_with(|| a.key.cmp(b.key)));
        let repeated = hours
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.hour == b.hour);
        if let Some((_, repeated)) = repeated {
            return Err(ScheduleError::malformed(repeated.key, TokenKind::Hour));
        }
        Ok(hours)
    }

    /// Hour keys in display order. String ordering would put "17" before "9".
    pub fn sorted_keys(&self) -> Result<Vec<&str>> {
        Ok(self.parse()?.into_iter().map(|hour| hour.key).collect())
    }

    /// Hours whose minute tokens are not strictly ascending in source order.
    pub fn minute_order_violations(&self) -> Result<Vec<Hour>> {
        Ok(self
            .parse()?
            .into_iter()
            .filter(|hour| !hour.minutes.iter().tuple_windows().all(|(a, b)| a < b))
            .map(|hour| hour.hour)
            .collect())
    }

    /// Total number of departures across all hours.
    pub fn departure_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl<K: Into<String>, M: Into<String>> FromIterator<(K, Vec<M>)> for HourTable {
    fn from_iter<I: IntoIterator<Item = (K, Vec<M>)>>(iter: I) -> Self {
        HourTable(
            iter.into_iter()
                .map(|(key, minutes)| (key.into(), minutes.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

pub type LineSchedule = HashMap<String, HourTable>;

pub fn line_name(number: u32) -> String {
    format!("Line {number}")
}

fn line_number(name: &str) -> Option<u32> {
    name.strip_prefix("Line ")?.trim().parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimetableDocument {
    #[serde(default)]
    pub weekday: LineSchedule,
    #[serde(default, rename = "Saturday")]
    pub saturday: LineSchedule,
}

impl TimetableDocument {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| ScheduleError::Json {
            path: path.to_owned(),
            source,
        })
    }

    pub fn lines(&self, day: DayType) -> &LineSchedule {
        match day {
            DayType::Weekday => &self.weekday,
            DayType::Saturday => &self.saturday,
        }
    }

    /// An absent day/line pair is an invalid route, distinct from a route with
    /// no departures left.
    pub fn hour_table(&self, day: DayType, line: &str) -> Result<&HourTable> {
        self.lines(day)
            .get(line)
            .ok_or_else(|| ScheduleError::InvalidRoute {
                day,
                line: line.to_owned(),
            })
    }

    /// Line names for `day`, "Line 2" before "Line 10".
    pub fn line_names(&self, day: DayType) -> Vec<&str> {
        self.lines(day)
            .keys()
            .map(String::as_str)
            .sorted_by(|a, b| {
                line_number(a)
                    .unwrap_or(u32::MAX)
                    .cmp(&line_number(b).unwrap_or(u32::MAX))
                    .then_with(|| a.cmp(b))
            })
            .collect()
    }
}
