//! Sync commands: run a full pass or inspect the current state.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Fetch-and-merge remote events, then push local-only ones
    Now,
    /// Show connection state and pending work
    Status,
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _config) = super::open_engine()?;

    match action {
        SyncAction::Now => {
            if engine.stored_token()?.is_none() {
                return Err("not connected. Run 'verve auth login' first".into());
            }
            let mut store = super::load_store_lossy(&engine);
            let rt = super::runtime()?;
            let mut report = rt.block_on(engine.resume(&mut store))?;
            let pushed = rt.block_on(engine.push_unsynced(&mut store))?;
            report.absorb(pushed);
            super::print_report(&report);
            if report.is_clean() {
                println!("Sync complete");
            }
        }
        SyncAction::Status => {
            let store = super::load_store_lossy(&engine);
            let connected = engine.stored_token()?.is_some();
            println!(
                "connection: {}",
                if connected { "connected" } else { "not connected" }
            );
            println!(
                "events: {} total, {} pending push",
                store.len(),
                store.unsynced_ids().len()
            );
        }
    }
    Ok(())
}
