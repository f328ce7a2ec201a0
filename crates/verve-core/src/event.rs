//! The calendar event record.
//!
//! Serialized with camelCase field names so the persisted JSON matches the
//! payload the web frontend kept in `localStorage` (dates as ISO strings,
//! times as `HH:MM`).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single calendar event.
///
/// Invariant: `completed == (progress == 100)`. Mutate progress and
/// completion through [`Event::set_progress`] and [`Event::set_completed`];
/// both keep the pair consistent.
///
/// `google_event_id` present means the event is mirrored on Google Calendar;
/// absent means it is local-only and pending push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub progress: u8,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_event_id: Option<String>,
}

impl Event {
    /// Create a local-only event with a fresh UUID id and zero progress.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let start_time = validate_time(start_time.into())?;
        let end_time = validate_time(end_time.into())?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description: description.filter(|d| !d.is_empty()),
            date,
            start_time,
            end_time,
            progress: 0,
            completed: false,
            google_event_id: None,
        })
    }

    /// Set progress (0-100, step 10). Reaching 100 marks the event
    /// completed; dropping below 100 clears the completed flag.
    pub fn set_progress(&mut self, progress: u8) -> Result<(), ValidationError> {
        if progress > 100 || progress % 10 != 0 {
            return Err(ValidationError::InvalidProgress(progress));
        }
        self.progress = progress;
        self.completed = progress == 100;
        Ok(())
    }

    /// Toggle completion. Completing sets progress to 100; un-completing
    /// resets it to 0, mirroring the original checkbox behavior.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.progress = if completed { 100 } else { 0 };
    }

    /// Whether this event has a remote counterpart.
    pub fn is_mirrored(&self) -> bool {
        self.google_event_id.is_some()
    }
}

fn validate_time(time: String) -> Result<String, ValidationError> {
    match NaiveTime::parse_from_str(&time, "%H:%M") {
        Ok(_) => Ok(time),
        Err(_) => Err(ValidationError::InvalidTime(time)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Event {
        Event::new(
            "Dentist",
            Some("Annual checkup".to_string()),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "09:30",
            "10:00",
        )
        .unwrap()
    }

    #[test]
    fn test_new_event_defaults() {
        let event = sample();
        assert_eq!(event.progress, 0);
        assert!(!event.completed);
        assert!(event.google_event_id.is_none());
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Event::new(
            "  ",
            None,
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "09:30",
            "10:00",
        );
        assert!(matches!(result, Err(ValidationError::EmptyTitle)));
    }

    #[test]
    fn test_bad_time_rejected() {
        let result = Event::new(
            "Dentist",
            None,
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "9:30am",
            "10:00",
        );
        assert!(matches!(result, Err(ValidationError::InvalidTime(_))));
    }

    #[test]
    fn test_progress_100_implies_completed() {
        let mut event = sample();
        event.set_progress(100).unwrap();
        assert!(event.completed);
    }

    #[test]
    fn test_progress_below_100_clears_completed() {
        let mut event = sample();
        event.set_completed(true);
        assert!(event.completed);
        event.set_progress(50).unwrap();
        assert!(!event.completed);
        assert_eq!(event.progress, 50);
    }

    #[test]
    fn test_set_completed_moves_progress() {
        let mut event = sample();
        event.set_completed(true);
        assert_eq!(event.progress, 100);
        event.set_completed(false);
        assert_eq!(event.progress, 0);
    }

    #[test]
    fn test_progress_step_validated() {
        let mut event = sample();
        assert!(event.set_progress(55).is_err());
        assert!(event.set_progress(110).is_err());
        assert!(event.set_progress(70).is_ok());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let event = sample();
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert_eq!(json["date"], "2025-03-14");
        // Local-only event omits the remote id entirely.
        assert!(json.get("googleEventId").is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut event = sample();
        event.google_event_id = Some("gcal-1".to_string());
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
