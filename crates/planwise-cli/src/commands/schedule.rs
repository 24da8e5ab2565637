use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use clap::Subcommand;
use planwise_core::{
    Config, ConflictDetector, Event, EventCategory, FreeSlotFinder, HabitStore, SlotScorer,
};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Group overlapping events into conflicts
    Conflicts {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
    },
    /// List consecutive events with too little room between them
    Tight {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
        /// Minimum gap in minutes (default: config schedule.back_to_back_buffer_minutes)
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        buffer: Option<i64>,
    },
    /// Free time inside working hours over a date range
    Slots {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, inclusive (default: same as --from)
        #[arg(long)]
        to: Option<String>,
        /// Shortest slot worth reporting, in minutes (default: config)
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        min: Option<i64>,
        /// Working hours override, e.g. "08:00-18:00"
        #[arg(long)]
        hours: Option<String>,
    },
    /// Earliest free block of a given length
    Next {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
        /// Block length in minutes (default: config schedule.default_duration_minutes)
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        duration: Option<i64>,
        /// Earliest start, RFC 3339 or YYYY-MM-DD (default: now)
        #[arg(long)]
        from: Option<String>,
        /// Working hours override, e.g. "08:00-18:00"
        #[arg(long)]
        hours: Option<String>,
    },
    /// Rank free slots for a new event using learned habits
    Suggest {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day, inclusive (default: same as --from)
        #[arg(long)]
        to: Option<String>,
        /// Block length in minutes (default: learned average for the category, else config)
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        duration: Option<i64>,
        /// Category of the new event (work, personal, social, health, learning, other)
        #[arg(long)]
        category: Option<EventCategory>,
        /// Maximum number of suggestions
        #[arg(long, default_value = "5")]
        limit: usize,
        /// Also learn from the events in the file before ranking (not saved)
        #[arg(long)]
        learn: bool,
        /// Working hours override, e.g. "08:00-18:00"
        #[arg(long)]
        hours: Option<String>,
    },
}

pub fn run(action: ScheduleAction) -> CliResult {
    let config = Config::load()?;

    match action {
        ScheduleAction::Conflicts { events } => {
            let events = common::load_events(&events)?;
            let conflicts = ConflictDetector::new().detect(&events);
            common::print_json(&conflicts)?;
        }
        ScheduleAction::Tight { events, buffer } => {
            let events = common::load_events(&events)?;
            let buffer =
                buffer.unwrap_or(i64::from(config.schedule.back_to_back_buffer_minutes));
            let pairs = ConflictDetector::new().with_buffer(buffer).back_to_back(&events);
            common::print_json(&pairs)?;
        }
        ScheduleAction::Slots {
            events,
            from,
            to,
            min,
            hours,
        } => {
            let events = common::load_events(&events)?;
            let finder = FreeSlotFinder::new(common::working_hours(hours.as_deref(), &config)?);
            let (range_start, range_end) = date_range(&events, &from, to.as_deref())?;
            let min = min.unwrap_or(i64::from(config.schedule.min_slot_minutes));

            let slots = finder.find_free_slots(&events, range_start, range_end, min);
            common::print_json(&slots)?;
        }
        ScheduleAction::Next {
            events,
            duration,
            from,
            hours,
        } => {
            let events = common::load_events(&events)?;
            let horizon = i64::from(config.schedule.search_horizon_days);
            let finder = FreeSlotFinder::new(common::working_hours(hours.as_deref(), &config)?)
                .with_horizon(horizon);
            let duration =
                duration.unwrap_or(i64::from(config.schedule.default_duration_minutes));
            let start_from = match from {
                Some(value) => common::parse_instant(&value, common::offset_for(&events))?,
                None => Local::now().fixed_offset(),
            };

            match finder.find_next_available_slot(&events, duration, start_from) {
                Some(slot) => common::print_json(&slot)?,
                None => {
                    return Err(format!(
                        "no free slot of {duration} minutes within {horizon} days"
                    )
                    .into())
                }
            }
        }
        ScheduleAction::Suggest {
            events,
            from,
            to,
            duration,
            category,
            limit,
            learn,
            hours,
        } => {
            let events = common::load_events(&events)?;
            let mut habits = HabitStore::open_default()?.load()?;
            if learn {
                habits.learn_from_events(&events);
            }

            let finder = FreeSlotFinder::new(common::working_hours(hours.as_deref(), &config)?);
            let (range_start, range_end) = date_range(&events, &from, to.as_deref())?;
            let duration = duration.unwrap_or_else(|| match category {
                Some(c) if habits.pattern(c).is_some() => habits.average_duration(c),
                _ => i64::from(config.schedule.default_duration_minutes),
            });

            let slots = finder.find_free_slots(&events, range_start, range_end, duration);
            let mut suggestions =
                SlotScorer::new().suggest_best_times(&slots, duration, &habits, category);
            suggestions.truncate(limit);
            common::print_json(&suggestions)?;
        }
    }
    Ok(())
}

/// Inclusive day range as the instants the finder expects.
fn date_range(
    events: &[Event],
    from: &str,
    to: Option<&str>,
) -> CliResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let offset = common::offset_for(events);
    let first = common::parse_date(from)?;
    let last = match to {
        Some(value) => common::parse_date(value)?,
        None => first,
    };
    if last < first {
        return Err(format!("--to {last} is before --from {first}").into());
    }
    Ok((
        common::start_of_day(first, offset)?,
        common::start_of_day(last, offset)?,
    ))
}
