use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::timetable::DayType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Hour,
    Minute,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Hour => write!(f, "hour"),
            TokenKind::Minute => write!(f, "minute"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Malformed {kind} token {token:?} in schedule")]
    MalformedSchedule { token: String, kind: TokenKind },

    #[error("No route {line:?} on {day} timetable")]
    InvalidRoute { day: DayType, line: String },

    #[error("Could not read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path:?} as JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ScheduleError {
    pub fn malformed(token: &str, kind: TokenKind) -> Self {
        ScheduleError::MalformedSchedule {
            token: token.to_owned(),
            kind,
        }
    }

    pub fn is_invalid_route(&self) -> bool {
        matches!(self, ScheduleError::InvalidRoute { .. })
    }
}

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
