//! # Verve Calendar Core Library
//!
//! Core business logic for the Verve personal calendar: the event model,
//! the in-memory event store, durable persistence over a key-value string
//! store, and the Google Calendar sync engine (OAuth token lifecycle,
//! fetch-and-merge with local precedence, sequential push of unsynced
//! events, update propagation).
//!
//! ## Key components
//!
//! - [`Event`]: the calendar event record (progress/completed invariant)
//! - [`EventStore`]: ordered in-memory event collection
//! - [`Persistence`]: write-through adapter over a [`KeyValueStore`]
//! - [`CalendarClient`]: stateless Google Calendar REST calls
//! - [`SyncEngine`]: the session state machine and sync passes
//!
//! ## Known limitations
//!
//! The merge performed on connect is one-way enrichment: local events
//! always win, and remote-side edits to an already-mirrored event are not
//! pulled back down after the first merge. There is no delete path; the
//! calendar is append-only.

pub mod error;
pub mod event;
pub mod google;
pub mod storage;
pub mod store;
pub mod sync;

pub use error::{
    ConfigError, CoreError, OAuthError, StorageError, StoreError, SyncError, ValidationError,
};
pub use event::Event;
pub use google::{CalendarClient, OAuthConfig};
pub use storage::{Config, FileStore, KeyValueStore, MemoryStore, Persistence};
pub use store::EventStore;
pub use sync::{SyncEngine, SyncFailure, SyncReport, SyncSession, SyncState};
