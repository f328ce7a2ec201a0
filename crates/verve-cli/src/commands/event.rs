//! Calendar event commands.

use chrono::NaiveDate;
use clap::Subcommand;
use verve_core::Event;

#[derive(Subcommand)]
pub enum EventAction {
    /// Add an event to the calendar
    Add {
        /// Event title
        title: String,
        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List events
    List {
        /// Only events on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set an event's progress (0-100, step 10)
    Progress {
        /// Event ID
        id: String,
        /// Progress value
        value: u8,
    },
    /// Mark an event completed
    Complete {
        /// Event ID
        id: String,
        /// Clear the completed flag instead
        #[arg(long)]
        undo: bool,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _config) = super::open_engine()?;
    let mut store = super::load_store_lossy(&engine);

    match action {
        EventAction::Add {
            title,
            date,
            start,
            end,
            description,
        } => {
            engine.restore_session()?;
            let event = Event::new(title, description, date, start, end)?;
            let id = event.id.clone();
            let rt = super::runtime()?;
            let report = rt.block_on(engine.add_event(&mut store, event))?;
            println!("Event added: {id}");
            super::print_report(&report);
        }
        EventAction::List { date, json } => {
            let events: Vec<&Event> = match date {
                Some(date) => store.events_on(date),
                None => store.all().iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events");
            } else {
                for event in events {
                    print_event(event);
                }
            }
        }
        EventAction::Progress { id, value } => {
            engine.restore_session()?;
            let mut event = store
                .get(&id)
                .ok_or_else(|| format!("no event with id {id}"))?
                .clone();
            event.set_progress(value)?;
            let rt = super::runtime()?;
            let report = rt.block_on(engine.update_event(&mut store, event))?;
            println!("Progress set to {value}%");
            if value == 100 {
                println!("Task completed");
            }
            super::print_report(&report);
        }
        EventAction::Complete { id, undo } => {
            engine.restore_session()?;
            let mut event = store
                .get(&id)
                .ok_or_else(|| format!("no event with id {id}"))?
                .clone();
            event.set_completed(!undo);
            let rt = super::runtime()?;
            let report = rt.block_on(engine.update_event(&mut store, event))?;
            if undo {
                println!("Completion cleared");
            } else {
                println!("Task completed");
            }
            super::print_report(&report);
        }
    }
    Ok(())
}

fn print_event(event: &Event) {
    let sync_marker = if event.is_mirrored() { "synced" } else { "local" };
    let done_marker = if event.completed { "x" } else { " " };
    println!(
        "[{}] {} {}-{} {} ({}%, {}) {}",
        done_marker,
        event.date,
        event.start_time,
        event.end_time,
        event.title,
        event.progress,
        sync_marker,
        event.id,
    );
    if let Some(description) = &event.description {
        println!("      {description}");
    }
}
