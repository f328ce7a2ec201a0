//! Persistence adapter: events and auth token in the key-value store.
//!
//! Write-through, full-overwrite semantics: every store mutation rewrites
//! the whole event array. No batching or debouncing; personal-calendar
//! volumes are small enough that this is fine.

use crate::error::StorageError;
use crate::event::Event;
use crate::storage::kv::KeyValueStore;

/// Key holding the JSON-serialized event array.
pub const EVENTS_KEY: &str = "calendarEvents";
/// Key holding the bearer token string.
pub const TOKEN_KEY: &str = "googleAccessToken";

/// Serializes the event store and the auth token to a durable
/// [`KeyValueStore`] and restores them on startup.
#[derive(Debug)]
pub struct Persistence<K> {
    kv: K,
}

impl<K: KeyValueStore> Persistence<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Load the persisted event sequence. Malformed data is a
    /// [`StorageError::ParseFailed`]; the caller is expected to surface it
    /// and continue with an empty store.
    pub fn load_events(&self) -> Result<Vec<Event>, StorageError> {
        match self.kv.get(EVENTS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::ParseFailed {
                key: EVENTS_KEY.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Overwrite the persisted event sequence.
    pub fn save_events(&mut self, events: &[Event]) -> Result<(), StorageError> {
        let json = serde_json::to_string(events).map_err(|e| StorageError::EncodeFailed {
            key: EVENTS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv.set(EVENTS_KEY, &json)
    }

    /// The stored bearer token, if any. Absence means disconnected.
    pub fn load_token(&self) -> Result<Option<String>, StorageError> {
        self.kv.get(TOKEN_KEY)
    }

    pub fn save_token(&mut self, token: &str) -> Result<(), StorageError> {
        self.kv.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&mut self) -> Result<(), StorageError> {
        self.kv.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use chrono::NaiveDate;

    fn event(title: &str) -> Event {
        Event::new(
            title,
            None,
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "09:00",
            "10:00",
        )
        .unwrap()
    }

    #[test]
    fn test_load_events_empty_store() {
        let persistence = Persistence::new(MemoryStore::new());
        assert!(persistence.load_events().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_events() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let events = vec![event("a"), event("b")];
        persistence.save_events(&events).unwrap();
        assert_eq!(persistence.load_events().unwrap(), events);
    }

    #[test]
    fn test_malformed_events_is_parse_error() {
        let mut kv = MemoryStore::new();
        kv.set(EVENTS_KEY, "{not json").unwrap();
        let persistence = Persistence::new(kv);
        let result = persistence.load_events();
        assert!(matches!(
            result,
            Err(StorageError::ParseFailed { ref key, .. }) if key == EVENTS_KEY
        ));
    }

    #[test]
    fn test_token_lifecycle() {
        let mut persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load_token().unwrap(), None);
        persistence.save_token("ya29.secret").unwrap();
        assert_eq!(
            persistence.load_token().unwrap().as_deref(),
            Some("ya29.secret")
        );
        persistence.clear_token().unwrap();
        assert_eq!(persistence.load_token().unwrap(), None);
    }
}
