//! Plain-text renderers for the shell. They only lay out what the engine
//! returns.

use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::{
    error::Result,
    format::{format_ampm, format_clock_time, format_hour_heading},
    routes::RouteCatalog,
    time::Departure,
    timetable::{DayType, HourTable},
};

pub const NO_MORE_BUSES: &str = "No more buses today";

fn departs_in(departure: &Departure) -> String {
    format!(
        "{} (departs in {} min)",
        format_clock_time(departure.time),
        departure.minutes_until
    )
}

pub fn line_card(line: &str, next: Option<&Departure>) -> String {
    match next {
        Some(departure) => format!("{line:<8} {}", departs_in(departure)),
        None => format!("{line:<8} {NO_MORE_BUSES}"),
    }
}

pub fn route_details(catalog: &RouteCatalog, line: &str, next: &[Departure]) -> String {
    let mut lines = vec![format!("{line} Information")];
    if let Some(info) = catalog.route(line) {
        lines.push(info.description.to_owned());
    }

    lines.push("STOPS".to_owned());
    lines.push(format!("  {}", catalog.stop_names(line).iter().join(" → ")));

    lines.push("NEXT DEPARTURES".to_owned());
    if next.is_empty() {
        lines.push(format!("  {NO_MORE_BUSES}"));
    }
    lines.extend(next.iter().map(|departure| {
        format!(
            "  {:<9} in {} min",
            format_clock_time(departure.time),
            departure.minutes_until
        )
    }));
    lines.join("\n")
}

fn hour_grid(table: &HourTable) -> Result<Vec<String>> {
    Ok(table
        .parse()?
        .into_iter()
        .map(|hour| {
            let times = hour
                .minutes
                .iter()
                .map(|&minute| format_ampm(hour.hour, minute))
                .join("  ");
            format!("{:>8} | {times}", format_hour_heading(hour.hour))
        })
        .collect())
}

/// Remaining departures today, one row per hour.
pub fn line_schedule(
    line: &str,
    day: DayType,
    upcoming: &HourTable,
    now: NaiveDateTime,
) -> Result<String> {
    let mut lines = vec![
        format!("{line} ({day}) upcoming departures"),
        format!("Current time: {}", format_clock_time(now)),
    ];
    if upcoming.is_empty() {
        lines.push(format!("  {NO_MORE_BUSES}"));
    } else {
        lines.extend(hour_grid(upcoming)?);
    }
    Ok(lines.join("\n"))
}

/// The whole day's timetable of one line, past departures included.
pub fn all_timetables(line: &str, day: DayType, table: &HourTable) -> Result<String> {
    let mut lines = vec![format!("{line} ({day}) full timetable")];
    lines.extend(hour_grid(table)?);
    Ok(lines.join("\n"))
}

pub fn sunday_notice(now: NaiveDateTime) -> String {
    format!(
        "No service on Sunday. Buses run weekdays and Saturdays.\nCurrent time: {}",
        format_clock_time(now)
    )
}

pub fn invalid_line(day: DayType, line: &str) -> String {
    format!("Invalid Line: {line} does not run on the {day} timetable")
}
