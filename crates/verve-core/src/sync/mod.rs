//! Synchronization between the local event store and Google Calendar.

pub mod engine;
pub mod types;

pub use engine::{merge_remote, sync_window, SyncEngine};
pub use types::{SyncFailure, SyncReport, SyncSession, SyncState};
