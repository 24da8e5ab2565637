use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use planwise_core::{EventCategory, HabitStore};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum HabitsAction {
    /// Learn from past events and save the updated patterns
    Learn {
        /// JSON file holding an array of events ("-" for stdin)
        events: PathBuf,
    },
    /// Summaries of every learned category
    List,
    /// Full pattern for one category
    Show {
        /// Category (work, personal, social, health, learning, other)
        category: EventCategory,
    },
    /// Usual time for a category on a given day
    Suggest {
        /// Category (work, personal, social, health, learning, other)
        category: EventCategory,
        /// Day to suggest for, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Plain-text summary for an assistant prompt
    Context,
    /// Forget all learned habits
    Reset,
}

pub fn run(action: HabitsAction) -> CliResult {
    let store = HabitStore::open_default()?;

    match action {
        HabitsAction::Learn { events } => {
            let events = common::load_events(&events)?;
            let mut learner = store.load()?;
            learner.learn_from_events(&events);
            store.save(&learner)?;
            eprintln!("learned from {} events", events.len());
            common::print_json(&learner.summaries())?;
        }
        HabitsAction::List => {
            let learner = store.load()?;
            common::print_json(&learner.summaries())?;
        }
        HabitsAction::Show { category } => {
            let learner = store.load()?;
            let pattern = learner
                .pattern(category)
                .ok_or_else(|| format!("no habits learned for {category}"))?;
            common::print_json(pattern)?;
        }
        HabitsAction::Suggest { category, date } => {
            let date = match date {
                Some(value) => common::parse_date(&value)?,
                None => Local::now().date_naive(),
            };
            let learner = store.load()?;
            let time = learner
                .suggest_time(category, date)
                .ok_or_else(|| format!("no usual time for {category} on {date}"))?;
            common::print_json(&time)?;
        }
        HabitsAction::Context => {
            let learner = store.load()?;
            println!("{}", learner.render_context());
        }
        HabitsAction::Reset => {
            store.clear()?;
            println!("habits reset");
        }
    }
    Ok(())
}
