pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod routes;
pub mod time;
pub mod timetable;
pub mod view;

pub use engine::{filter_upcoming, next_departure, next_n_departures, ScheduleEngine};
pub use error::ScheduleError;
pub use format::{classify_day, format_ampm, format_clock_time, DayClassification, ServiceDay};
pub use time::Departure;
pub use timetable::{DayType, HourTable, TimetableDocument};
