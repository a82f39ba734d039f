use std::{fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::{
    engine::DEFAULT_UPCOMING_COUNT,
    error::{Result, ScheduleError},
    format::DayClassification,
};

const DEFAULT_TIMETABLE_PATH: &str = "timetable/timetable.json";
const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub timetable_path: PathBuf,
    pub day_classification: DayClassification,
    pub upcoming_count: usize,
    pub refresh_secs: u64,
    /// Seed for Line 3's stop selection. Unset draws a fresh one per run.
    pub route_seed: Option<u64>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            timetable_path: PathBuf::from(DEFAULT_TIMETABLE_PATH),
            day_classification: DayClassification::default(),
            upcoming_count: DEFAULT_UPCOMING_COUNT,
            refresh_secs: DEFAULT_REFRESH_SECS,
            route_seed: None,
        }
    }
}

impl ShellConfig {
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

    /// Never zero, so a watch loop cannot spin.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.timetable_path, PathBuf::from("timetable/timetable.json"));
        assert_eq!(config.day_classification, DayClassification::FixedMonday);
        assert_eq!(config.upcoming_count, 3);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ShellConfig::from_json_str(
            r#"{ "day_classification": "calendar", "route_seed": 9, "refresh_secs": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.day_classification, DayClassification::Calendar);
        assert_eq!(config.route_seed, Some(9));
        assert_eq!(config.upcoming_count, 3);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ShellConfig::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ScheduleError::Io { .. }));
    }
}
