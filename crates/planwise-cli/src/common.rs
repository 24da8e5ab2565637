//! Argument parsing and output helpers shared by the CLI commands.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use planwise_core::{Config, Event, WorkingHours};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Read a JSON array of events from a file, or from stdin when `path` is `-`.
pub fn load_events(path: &Path) -> CliResult<Vec<Event>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read events from {}: {e}", path.display()))?
    };
    let events: Vec<Event> = serde_json::from_str(&content)
        .map_err(|e| format!("invalid events file {}: {e}", path.display()))?;
    tracing::debug!(count = events.len(), path = %path.display(), "events loaded");
    Ok(events)
}

/// Offset calendar days are taken in: the first event's, else the local one.
pub fn offset_for(events: &[Event]) -> FixedOffset {
    events
        .first()
        .map(|e| *e.start.offset())
        .unwrap_or_else(|| *Local::now().offset())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD").into())
}

/// Midnight at the start of `date` in `offset`.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> CliResult<DateTime<FixedOffset>> {
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| format!("no local midnight on {date}").into())
}

/// Parse an RFC 3339 instant, or a bare date meaning its midnight in `offset`.
pub fn parse_instant(value: &str, offset: FixedOffset) -> CliResult<DateTime<FixedOffset>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at);
    }
    start_of_day(parse_date(value)?, offset)
}

/// Working hours from a `HH:mm-HH:mm` override, else from the config.
pub fn working_hours(override_hours: Option<&str>, config: &Config) -> CliResult<WorkingHours> {
    match override_hours {
        Some(value) => {
            let (start, end) = value
                .split_once('-')
                .ok_or_else(|| format!("invalid working hours '{value}', expected HH:mm-HH:mm"))?;
            Ok(WorkingHours::parse(start.trim(), end.trim())?)
        }
        None => Ok(config.schedule.working_hours()?),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
