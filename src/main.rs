use std::{error::Error, path::PathBuf, process::ExitCode, sync::Arc, thread};

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use log::{info, warn};

use shuttle_schedule::{
    config::ShellConfig,
    error::Result,
    format::{classify_day, default_day_type, DayClassification, ServiceDay},
    routes::RouteCatalog,
    timetable::{line_name, DayType, TimetableDocument},
    view, ScheduleEngine,
};

#[derive(Parser)]
#[clap(about = "Campus shuttle timetable")]
struct Args {
    /// JSON settings file; flags below take precedence.
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(long)]
    timetable: Option<PathBuf>,
    /// Show this timetable instead of the one for today.
    #[clap(long)]
    day: Option<DayType>,
    /// fixed-monday or calendar.
    #[clap(long)]
    day_classification: Option<DayClassification>,
    /// Re-render every refresh interval.
    #[clap(long)]
    watch: bool,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Command {
    /// Next departure of every line.
    Board,
    /// Remaining departures of one line today.
    Line { number: u32 },
    /// Stops and next departures of one line.
    Route { number: u32 },
    /// Full timetable of one line.
    All { number: u32 },
}

struct Shell {
    config: ShellConfig,
    catalog: RouteCatalog,
    day: Option<DayType>,
    command: Command,
}

impl Shell {
    fn render(&self, now: NaiveDateTime) -> Result<String> {
        info!("Loading timetable from {:?}", self.config.timetable_path);
        let engine = ScheduleEngine::new(Arc::new(TimetableDocument::load(
            &self.config.timetable_path,
        )?));

        let service_day = classify_day(now, self.config.day_classification);
        let day = self.day.unwrap_or_else(|| default_day_type(service_day));
        info!("Service day {service_day}, showing {day} timetable");

        let rendered = match self.command {
            Command::Board if service_day == ServiceDay::Sunday && self.day.is_none() => {
                view::sunday_notice(now)
            }
            Command::Board => engine
                .board(day, now)
                .into_iter()
                .map(|entry| match entry.next {
                    Ok(next) => view::line_card(&entry.line, next.as_ref()),
                    Err(err) => {
                        warn!("Skipping {}: {err}", entry.line);
                        format!("{:<8} schedule unavailable", entry.line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Line { number } => {
                let line = line_name(number);
                match engine.upcoming(day, &line, now) {
                    Ok(upcoming) => view::line_schedule(&line, day, &upcoming, now)?,
                    Err(err) if err.is_invalid_route() => view::invalid_line(day, &line),
                    Err(err) => return Err(err),
                }
            }
            Command::Route { number } => {
                let line = line_name(number);
                match engine.next_n(day, &line, now, self.config.upcoming_count) {
                    Ok(next) => view::route_details(&self.catalog, &line, &next),
                    Err(err) if err.is_invalid_route() => view::invalid_line(day, &line),
                    Err(err) => return Err(err),
                }
            }
            Command::All { number } => {
                let line = line_name(number);
                match engine.timetable.hour_table(day, &line) {
                    Ok(table) => view::all_timetables(&line, day, table)?,
                    Err(err) if err.is_invalid_route() => view::invalid_line(day, &line),
                    Err(err) => return Err(err),
                }
            }
        };

        Ok(rendered)
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Reading settings from {path:?}");
            ShellConfig::load(path)?
        }
        None => ShellConfig::default(),
    };
    if let Some(path) = args.timetable {
        config.timetable_path = path;
    }
    if let Some(classification) = args.day_classification {
        config.day_classification = classification;
    }

    let shell = Shell {
        catalog: RouteCatalog::new(config.route_seed),
        config,
        day: args.day,
        command: args.command.unwrap_or(Command::Board),
    };

    if !args.watch {
        println!("{}", shell.render(Local::now().naive_local())?);
        return Ok(());
    }

    let interval = shell.config.refresh_interval();
    loop {
        let now = Local::now().naive_local();
        println!("{}\n", shell.render(now)?);
        info!("Next refresh in {}s", interval.as_secs());
        thread::sleep(interval);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
