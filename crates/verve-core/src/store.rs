//! In-memory event store.
//!
//! The canonical ordered sequence of events for a session. Insertion order
//! is stable; the UI groups by date, so ordering only matters for equality
//! in tests. There is no delete operation: the source application never
//! deletes events, and that gap is carried over deliberately.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::event::Event;

/// Ordered collection of calendar events.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a previously persisted sequence.
    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Append an event. Fails with [`StoreError::DuplicateId`] if an event
    /// with the same id is already present.
    pub fn add(&mut self, event: Event) -> Result<(), StoreError> {
        if self.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        self.events.push(event);
        Ok(())
    }

    /// Replace the event with a matching id. Fails with
    /// [`StoreError::UnknownEvent`] when no event matches; a typed error was
    /// chosen over a silent no-op so callers cannot lose edits unnoticed.
    pub fn update(&mut self, event: Event) -> Result<(), StoreError> {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(StoreError::UnknownEvent(event.id)),
        }
    }

    /// The full event sequence, in insertion order.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events occurring on a given day.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// Remote ids of all mirrored events. The merge step filters fetched
    /// events against this set so a remote event is never duplicated.
    pub fn remote_ids(&self) -> HashSet<String> {
        self.events
            .iter()
            .filter_map(|e| e.google_event_id.clone())
            .collect()
    }

    /// Ids of local-only events pending push, in insertion order.
    pub fn unsynced_ids(&self) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.google_event_id.is_none())
            .map(|e| e.id.clone())
            .collect()
    }
}
