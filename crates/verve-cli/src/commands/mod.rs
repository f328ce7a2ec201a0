//! Shared command plumbing: engine construction, store loading, and
//! report printing.

pub mod auth;
pub mod config;
pub mod event;
pub mod sync;

use std::time::Duration;

use verve_core::{
    CalendarClient, Config, EventStore, FileStore, Persistence, SyncEngine, SyncReport,
};

/// Build the sync engine over the default on-disk store.
fn open_engine() -> Result<(SyncEngine<FileStore>, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let persistence = Persistence::new(FileStore::open_default()?);
    let client =
        CalendarClient::new().with_timeout(Duration::from_secs(config.sync.request_timeout_secs));
    Ok((SyncEngine::new(client, persistence), config))
}

/// Load the persisted events. Unreadable data is not fatal: warn and start
/// from an empty calendar, matching what the app does on corrupt storage.
fn load_store_lossy(engine: &SyncEngine<FileStore>) -> EventStore {
    match engine.load_store() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("warning: stored events unreadable, starting empty ({e})");
            EventStore::new()
        }
    }
}

/// Single-threaded runtime for the command's remote calls.
fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn print_report(report: &SyncReport) {
    if report.merged > 0 {
        println!("Merged {} remote event(s)", report.merged);
    }
    if report.created > 0 {
        println!("Pushed {} event(s) to Google Calendar", report.created);
    }
    if report.patched > 0 {
        println!("Updated {} event(s) on Google Calendar", report.patched);
    }
    for failure in &report.failures {
        match &failure.event_id {
            Some(id) => eprintln!("sync failure for event {id}: {}", failure.error),
            None => eprintln!("sync failure: {}", failure.error),
        }
    }
    if report.token_expired {
        eprintln!("Google session expired; run 'verve auth login' to reconnect");
    }
}
