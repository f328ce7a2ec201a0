//! The sync engine: token lifecycle, fetch-and-merge, push-unsynced, and
//! update propagation between the local event store and Google Calendar.
//!
//! All remote work is cooperative async on a single thread; the push queue
//! is processed sequentially and guarded against overlapping passes. Local
//! state is authoritative: remote failures are reported in the returned
//! [`SyncReport`] and never roll back a local mutation.

use chrono::{DateTime, Months, Utc};

use crate::error::{CoreError, StorageError, SyncError};
use crate::event::Event;
use crate::google::CalendarClient;
use crate::storage::{KeyValueStore, Persistence};
use crate::store::EventStore;
use crate::sync::types::{SyncFailure, SyncReport, SyncSession, SyncState};

/// Orchestrates synchronization between an [`EventStore`] and the remote
/// calendar, owning the session state machine and the persistence adapter.
pub struct SyncEngine<K: KeyValueStore> {
    client: CalendarClient,
    persistence: Persistence<K>,
    session: SyncSession,
    push_in_flight: bool,
}

impl<K: KeyValueStore> SyncEngine<K> {
    pub fn new(client: CalendarClient, persistence: Persistence<K>) -> Self {
        Self {
            client,
            persistence,
            session: SyncSession::disconnected(),
            push_in_flight: false,
        }
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    /// Load the persisted event store. A `ParseFailed` error is non-fatal:
    /// the caller surfaces it and continues with an empty store.
    pub fn load_store(&self) -> Result<EventStore, StorageError> {
        Ok(EventStore::from_events(self.persistence.load_events()?))
    }

    /// The token currently held in durable storage, if any.
    pub fn stored_token(&self) -> Result<Option<String>, StorageError> {
        self.persistence.load_token()
    }

    /// Re-enter `Connected` from a previously persisted token without the
    /// initial fetch. Used by short-lived callers that already merged on
    /// login and only need to push or patch.
    pub fn restore_session(&mut self) -> Result<bool, StorageError> {
        match self.persistence.load_token()? {
            Some(token) => {
                self.session.connect(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Login succeeded: persist the token, enter `Connected`, and run the
    /// initial fetch-and-merge. Reconnecting from `TokenExpired` goes
    /// through here as a full reset.
    pub async fn connect(
        &mut self,
        store: &mut EventStore,
        token: String,
    ) -> Result<SyncReport, CoreError> {
        self.session.begin_connect();
        self.persistence.save_token(&token)?;
        self.session.connect(token);
        self.fetch_and_merge(store).await
    }

    /// Startup path: restore a stored session and re-run fetch-and-merge.
    pub async fn resume(&mut self, store: &mut EventStore) -> Result<SyncReport, CoreError> {
        if !self.restore_session()? {
            return Ok(SyncReport::default());
        }
        self.fetch_and_merge(store).await
    }

    /// Explicit logout: forget the token, back to `Disconnected`.
    pub fn disconnect(&mut self) -> Result<(), StorageError> {
        self.persistence.clear_token()?;
        self.session.disconnect();
        Ok(())
    }

    /// Fetch remote events for the sync window (one month back, two months
    /// ahead) and append those not already represented locally. Local
    /// precedence: an event whose remote id is already in the store is
    /// never touched, so remote-side edits after the first merge are not
    /// pulled back down.
    pub async fn fetch_and_merge(
        &mut self,
        store: &mut EventStore,
    ) -> Result<SyncReport, CoreError> {
        let mut report = SyncReport::default();
        let Some(token) = self.session.token().map(str::to_owned) else {
            return Ok(report);
        };

        let (window_start, window_end) = sync_window(Utc::now());
        let fetched = self
            .client
            .fetch_events(&token, window_start, window_end)
            .await;
        match fetched {
            Ok(remote_events) => {
                report.merged = merge_remote(store, remote_events);
                self.persistence.save_events(store.all())?;
            }
            Err(SyncError::TokenExpired) => {
                self.expire()?;
                report.token_expired = true;
            }
            Err(error) => report.failures.push(SyncFailure {
                event_id: None,
                error,
            }),
        }
        Ok(report)
    }

    /// Create remote counterparts for all local-only events, sequentially.
    ///
    /// Each event's `google_event_id` is re-checked at call time (not just
    /// at enqueue time), and the store is re-read after the network call so
    /// the assigned remote id lands on whichever version of the event is
    /// current. Token expiry short-circuits the remaining queue; any other
    /// failure is recorded and the queue continues.
    pub async fn push_unsynced(&mut self, store: &mut EventStore) -> Result<SyncReport, CoreError> {
        let mut report = SyncReport::default();
        if !self.session.is_connected() || self.push_in_flight {
            return Ok(report);
        }

        self.push_in_flight = true;
        let result = self.push_pass(store, &mut report).await;
        self.push_in_flight = false;
        result?;
        Ok(report)
    }

    async fn push_pass(
        &mut self,
        store: &mut EventStore,
        report: &mut SyncReport,
    ) -> Result<(), CoreError> {
        for id in store.unsynced_ids() {
            let Some(token) = self.session.token().map(str::to_owned) else {
                break;
            };
            // Re-check at call time: a prior pass may already have attached
            // a remote id to this event.
            let snapshot = match store.get(&id) {
                Some(event) if event.google_event_id.is_none() => event.clone(),
                _ => continue,
            };

            let created = self.client.create_event(&token, &snapshot).await;
            match created {
                Ok(remote_id) => {
                    // Attach to the current version, which may have been
                    // edited while the request was in flight.
                    if let Some(current) = store.get_mut(&id) {
                        current.google_event_id = Some(remote_id);
                    }
                    report.created += 1;
                }
                Err(SyncError::TokenExpired) => {
                    self.expire()?;
                    report.token_expired = true;
                    break;
                }
                Err(error) => report.failures.push(SyncFailure {
                    event_id: Some(id),
                    error,
                }),
            }
        }
        self.persistence.save_events(store.all())?;
        Ok(())
    }

    /// Add an event: store, write-through, then push when connected.
    pub async fn add_event(
        &mut self,
        store: &mut EventStore,
        event: Event,
    ) -> Result<SyncReport, CoreError> {
        store.add(event)?;
        self.persistence.save_events(store.all())?;
        if self.session.is_connected() {
            self.push_unsynced(store).await
        } else {
            Ok(SyncReport::default())
        }
    }

    /// Update an event: store, write-through, then propagate. Mirrored
    /// events get a best-effort patch; a local-only event goes through the
    /// push pass instead. Remote failure never rolls back the local edit.
    pub async fn update_event(
        &mut self,
        store: &mut EventStore,
        event: Event,
    ) -> Result<SyncReport, CoreError> {
        store.update(event.clone())?;
        self.persistence.save_events(store.all())?;

        let mut report = SyncReport::default();
        if !self.session.is_connected() {
            return Ok(report);
        }

        if let Some(remote_id) = event.google_event_id.clone() {
            let Some(token) = self.session.token().map(str::to_owned) else {
                return Ok(report);
            };
            let patched = self.client.patch_event(&token, &remote_id, &event).await;
            match patched {
                Ok(()) => report.patched += 1,
                Err(SyncError::TokenExpired) => {
                    self.expire()?;
                    report.token_expired = true;
                }
                Err(error) => report.failures.push(SyncFailure {
                    event_id: Some(event.id),
                    error,
                }),
            }
        } else {
            report.absorb(self.push_unsynced(store).await?);
        }
        Ok(report)
    }

    /// Token-expiry transition: clear the persisted token and mark the
    /// session expired. Idempotent -- concurrent observers of the same
    /// expiry converge here without re-triggering sync work.
    fn expire(&mut self) -> Result<(), StorageError> {
        if self.session.state() == SyncState::TokenExpired {
            return Ok(());
        }
        self.persistence.clear_token()?;
        self.session.expire();
        Ok(())
    }
}

/// The fetch window: one month back to two months ahead of `now`. Month
/// arithmetic clamps at month ends (Mar 31 back one month is Feb 28).
pub fn sync_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let end = now.checked_add_months(Months::new(2)).unwrap_or(now);
    (start, end)
}

/// Append fetched remote events not already represented locally. Returns
/// the number appended. Events already known under the same remote id are
/// left untouched (local copy wins, even if stale), and a remote id is
/// never added twice even if the batch repeats it.
pub fn merge_remote(store: &mut EventStore, fetched: Vec<Event>) -> usize {
    let mut known = store.remote_ids();
    let mut merged = 0;
    for event in fetched {
        let Some(remote_id) = event.google_event_id.clone() else {
            continue;
        };
        if known.contains(&remote_id) {
            continue;
        }
        if store.add(event).is_ok() {
            known.insert(remote_id);
            merged += 1;
        }
    }
    merged
}
