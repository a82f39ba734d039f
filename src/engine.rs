use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use log::debug;

use crate::{
    error::Result,
    time::Departure,
    timetable::{DayType, HourTable, ParsedHour, TimetableDocument},
};

pub const DEFAULT_UPCOMING_COUNT: usize = 3;

fn is_upcoming(hour: &ParsedHour, minute: u32, now: NaiveDateTime) -> bool {
    hour.hour > now.hour() || (hour.hour == now.hour() && minute > now.minute())
}

/// Future departures of today in hour order, source order within an hour.
fn departures_after<'a>(
    hours: &'a [ParsedHour<'a>],
    now: NaiveDateTime,
) -> impl Iterator<Item = Departure> + 'a {
    hours
        .iter()
        .filter(move |hour| hour.hour >= now.hour())
        .flat_map(move |hour| {
            hour.minutes
                .iter()
                .filter(move |&&minute| is_upcoming(hour, minute, now))
                .filter_map(move |&minute| Departure::at(now, hour.hour, minute))
        })
}

/// The part of `table` still ahead of `now` today. Hours left without any
/// minutes are dropped; an empty result means no more departures today.
pub fn filter_upcoming(table: &HourTable, now: NaiveDateTime) -> Result<HourTable> {
    let mut upcoming = HourTable::new();

    for hour in table.parse()? {
        let minutes: Vec<String> = hour
            .tokens
            .iter()
            .zip(&hour.minutes)
            .filter(|&(_, &minute)| is_upcoming(&hour, minute, now))
            .map(|(token, _)| token.clone())
            .collect();

        if !minutes.is_empty() {
            upcoming.insert(hour.key, minutes);
        }
    }

    Ok(upcoming)
}

pub fn next_departure(table: &HourTable, now: NaiveDateTime) -> Result<Option<Departure>> {
    let hours = table.parse()?;
    let next = departures_after(&hours, now).next();
    Ok(next)
}

/// Up to `n` soonest departures after `now`, soonest first.
pub fn next_n_departures(
    table: &HourTable,
    now: NaiveDateTime,
    n: usize,
) -> Result<Vec<Departure>> {
    let hours = table.parse()?;
    let departures = departures_after(&hours, now).take(n).collect();
    Ok(departures)
}

#[derive(Debug)]
pub struct BoardEntry {
    pub line: String,
    pub next: Result<Option<Departure>>,
}

/// Route-aware entry points over a loaded document.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    pub timetable: Arc<TimetableDocument>,
}

impl ScheduleEngine {
    pub fn new(timetable: Arc<TimetableDocument>) -> Self {
        Self { timetable }
    }

    fn route(&self, day: DayType, line: &str) -> Result<&HourTable> {
        debug!("Looking up {line:?} on {day} timetable");
        self.timetable.hour_table(day, line)
    }

    pub fn upcoming(&self, day: DayType, line: &str, now: NaiveDateTime) -> Result<HourTable> {
        filter_upcoming(self.route(day, line)?, now)
    }

    pub fn next(&self, day: DayType, line: &str, now: NaiveDateTime) -> Result<Option<Departure>> {
        next_departure(self.route(day, line)?, now)
    }

    pub fn next_n(
        &self,
        day: DayType,
        line: &str,
        now: NaiveDateTime,
        n: usize,
    ) -> Result<Vec<Departure>> {
        next_n_departures(self.route(day, line)?, now, n)
    }

    /// Next departure of every line running on `day`, in line order.
    pub fn board(&self, day: DayType, now: NaiveDateTime) -> Vec<BoardEntry> {
        self.timetable
            .line_names(day)
            .into_iter()
            .map(|line| BoardEntry {
                line: line.to_owned(),
                next: self.next(day, line, now),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn table(json: &str) -> HourTable {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn keeps_later_minutes_and_hours() {
        let table = table(r#"{"9": ["15", "45"], "10": ["00"]}"#);
        let now = at(9, 30);

        let upcoming = filter_upcoming(&table, now).unwrap();
        assert_eq!(upcoming, self::table(r#"{"9": ["45"], "10": ["00"]}"#));

        let next = next_departure(&table, now).unwrap().unwrap();
        assert_eq!(next.time, at(9, 45));
        assert_eq!(next.minutes_until, 15);
    }

    #[test]
    fn nothing_left_today() {
        let table = table(r#"{"9": ["15"]}"#);
        let now = at(9, 20);

        assert!(filter_upcoming(&table, now).unwrap().is_empty());
        assert_eq!(next_departure(&table, now).unwrap(), None);
        assert!(next_n_departures(&table, now, 3).unwrap().is_empty());
    }

    #[test]
    fn departure_at_current_minute_is_gone() {
        let table = table(r#"{"9": ["30", "31"]}"#);
        let next = next_departure(&table, at(9, 30)).unwrap().unwrap();
        assert_eq!(next.time, at(9, 31));
        assert_eq!(next.minutes_until, 1);
    }

    #[test]
    fn does_not_wrap_past_midnight() {
        let table = table(r#"{"0": ["05"], "23": ["10", "50"]}"#);

        let upcoming = filter_upcoming(&table, at(23, 55)).unwrap();
        assert!(upcoming.is_empty());
        assert_eq!(next_departure(&table, at(23, 55)).unwrap(), None);

        let next = next_departure(&table, at(23, 20)).unwrap().unwrap();
        assert_eq!(next.time, at(23, 50));
    }

    #[test]
    fn early_morning_sees_whole_day() {
        let table = table(r#"{"0": ["05"], "23": ["10"]}"#);
        let departures = next_n_departures(&table, at(0, 0), 5).unwrap();
        let times: Vec<_> = departures.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![at(0, 5), at(23, 10)]);
    }

    #[test]
    fn hours_compare_numerically() {
        let table = table(r#"{"17": ["00"], "9": ["50"], "10": ["05"]}"#);
        let next = next_departure(&table, at(9, 0)).unwrap().unwrap();
        assert_eq!(next.time, at(9, 50));

        let departures = next_n_departures(&table, at(9, 0), 3).unwrap();
        let times: Vec<_> = departures.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![at(9, 50), at(10, 5), at(17, 0)]);
    }

    #[test]
    fn skips_empty_later_hours() {
        let table = table(r#"{"10": [], "11": ["20"]}"#);
        let next = next_departure(&table, at(9, 0)).unwrap().unwrap();
        assert_eq!(next.time, at(11, 20));

        let upcoming = filter_upcoming(&table, at(9, 0)).unwrap();
        assert_eq!(upcoming.sorted_keys().unwrap(), vec!["11"]);
    }

    #[test]
    fn next_n_takes_from_current_hour_first() {
        let table = table(r#"{"9": ["10", "35", "40", "55"], "10": ["00"]}"#);
        let departures = next_n_departures(&table, at(9, 30), 3).unwrap();
        let minutes: Vec<_> = departures.iter().map(|d| d.minutes_until).collect();
        assert_eq!(minutes, vec![5, 10, 25]);
    }

    #[test]
    fn next_n_of_zero_is_empty() {
        let table = table(r#"{"9": ["45"]}"#);
        assert!(next_n_departures(&table, at(9, 0), 0).unwrap().is_empty());
    }

    #[test]
    fn padded_tokens_are_kept_verbatim() {
        let table = table(r#"{"10": ["00 ", " 30"]}"#);
        let upcoming = filter_upcoming(&table, at(9, 0)).unwrap();
        assert_eq!(upcoming.get("10"), Some(&["00 ".to_owned(), " 30".to_owned()][..]));
    }

    #[test]
    fn malformed_token_is_an_error() {
        let table = table(r#"{"9": ["15"], "10": ["oops"]}"#);
        assert!(matches!(
            filter_upcoming(&table, at(8, 0)),
            Err(ScheduleError::MalformedSchedule { .. })
        ));
        assert!(next_departure(&table, at(8, 0)).is_err());
        assert!(next_n_departures(&table, at(8, 0), 3).is_err());
    }

    #[test]
    fn same_hour_under_two_keys_is_an_error() {
        let table = table(r#"{"09": ["40"], "9": ["35"], " 10 ": [" 05 "]}"#);
        let now = at(9, 30) + chrono::Duration::seconds(59);

        for result in [
            filter_upcoming(&table, now).map(|_| ()),
            next_departure(&table, now).map(|_| ()),
            next_n_departures(&table, now, 3).map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(ScheduleError::MalformedSchedule { ref token, .. }) if token == "9"
            ));
        }
    }

    #[test]
    fn zero_padded_hour_key_is_one_hour() {
        let table = table(r#"{"09": ["35", "40"], " 10 ": [" 05 "]}"#);
        let now = at(9, 30) + chrono::Duration::seconds(59);

        let departures = next_n_departures(&table, now, 3).unwrap();
        let times: Vec<_> = departures.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![at(9, 35), at(9, 40), at(10, 5)]);
        assert_eq!(next_departure(&table, now).unwrap(), departures.first().copied());
    }

    #[test]
    fn engine_separates_invalid_route_from_empty() {
        let mut document = TimetableDocument::default();
        document
            .weekday
            .insert("Line 1".to_owned(), table(r#"{"9": ["15"]}"#));
        let engine = ScheduleEngine::new(Arc::new(document));

        assert_eq!(engine.next(DayType::Weekday, "Line 1", at(9, 20)).unwrap(), None);
        assert!(engine
            .next(DayType::Saturday, "Line 1", at(9, 20))
            .unwrap_err()
            .is_invalid_route());
        assert!(engine
            .upcoming(DayType::Weekday, "Line 9", at(9, 20))
            .unwrap_err()
            .is_invalid_route());
    }

    #[test]
    fn board_lists_lines_in_order() {
        let mut document = TimetableDocument::default();
        document
            .weekday
            .insert("Line 2".to_owned(), table(r#"{"9": ["40"]}"#));
        document
            .weekday
            .insert("Line 1".to_owned(), table(r#"{"9": ["15"]}"#));
        let engine = ScheduleEngine::new(Arc::new(document));

        let board = engine.board(DayType::Weekday, at(9, 20));
        let lines: Vec<_> = board.iter().map(|entry| entry.line.as_str()).collect();
        assert_eq!(lines, vec!["Line 1", "Line 2"]);
        assert!(matches!(board[0].next, Ok(None)));
        assert_eq!(board[1].next.as_ref().unwrap().unwrap().minutes_until, 20);
    }
}
