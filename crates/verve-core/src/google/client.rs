//! Google Calendar API client for sync operations.
//!
//! Stateless REST calls against the Calendar v3 API plus the pure codec
//! between the local [`Event`] representation and the provider's event
//! payload. Progress, completion, and the local event id travel in
//! `extendedProperties.private` (string-encoded, as the API requires).

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::error::SyncError;
use crate::event::Event;

/// Production API base.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Title used when a remote event has no summary.
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl CalendarClient {
    /// Client against the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternative base URL (mock server in tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the per-request network timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.base_url)
    }

    /// Fetch events whose occurrence falls within the window, with
    /// recurring events expanded to single instances. Cancelled events are
    /// skipped.
    pub async fn fetch_events(
        &self,
        token: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, SyncError> {
        let response = self
            .http
            .get(self.events_url())
            .query(&[
                ("timeMin", window_start.to_rfc3339()),
                ("timeMax", window_end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .bearer_auth(token)
            .timeout(self.timeout)
            .send()
            .await?;
        let body = read_body(response).await?;

        let items = body["items"].as_array().cloned().unwrap_or_default();
        let mut events = Vec::new();
        for item in &items {
            if let Some(event) = event_from_gcal(item)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Create a remote counterpart for a local event, returning the remote
    /// event id.
    pub async fn create_event(&self, token: &str, event: &Event) -> Result<String, SyncError> {
        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(token)
            .timeout(self.timeout)
            .json(&event_to_gcal(event))
            .send()
            .await?;
        let body = read_body(response).await?;

        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SyncError::MalformedEvent("response missing event id".to_string()))
    }

    /// Partially update an existing remote event.
    pub async fn patch_event(
        &self,
        token: &str,
        remote_id: &str,
        event: &Event,
    ) -> Result<(), SyncError> {
        let url = format!("{}/{}", self.events_url(), remote_id);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .timeout(self.timeout)
            .json(&event_to_gcal(event))
            .send()
            .await?;
        read_body(response).await?;
        Ok(())
    }
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the response status: 401/403 is the distinguished token-expiry
/// outcome, any other non-success carries the provider status.
async fn read_body(response: reqwest::Response) -> Result<Value, SyncError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::TokenExpired);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(SyncError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

/// Convert a local event to the Google Calendar payload. The local date and
/// `HH:MM` times combine into full timestamps; progress, completion, and
/// the local id ride along as private extended properties.
pub fn event_to_gcal(event: &Event) -> Value {
    json!({
        "summary": event.title,
        "description": event.description.clone().unwrap_or_default(),
        "start": { "dateTime": gcal_timestamp(event.date, &event.start_time) },
        "end": { "dateTime": gcal_timestamp(event.date, &event.end_time) },
        "extendedProperties": {
            "private": {
                "progress": event.progress.to_string(),
                "completed": event.completed.to_string(),
                "localEventId": event.id,
            }
        }
    })
}

fn gcal_timestamp(date: NaiveDate, time: &str) -> String {
    format!("{}T{}:00Z", date.format("%Y-%m-%d"), time)
}

/// Parse a Google Calendar event item into a local [`Event`].
///
/// Returns `Ok(None)` for cancelled events. Missing summary becomes
/// [`UNTITLED_EVENT`]; missing extended metadata defaults to zero progress,
/// not completed. The local id is recovered from `localEventId` when the
/// event originated here, otherwise a fresh UUID is assigned.
pub fn event_from_gcal(item: &Value) -> Result<Option<Event>, SyncError> {
    if item["status"].as_str() == Some("cancelled") {
        return Ok(None);
    }

    let remote_id = item["id"]
        .as_str()
        .ok_or_else(|| SyncError::MalformedEvent("missing event id".to_string()))?;
    let title = item["summary"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(UNTITLED_EVENT)
        .to_string();
    let description = item["description"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let (date, start_time) = parse_gcal_time(&item["start"])?;
    let (_, end_time) = parse_gcal_time(&item["end"])?;

    let props = &item["extendedProperties"]["private"];
    let mut progress = props["progress"]
        .as_str()
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(0)
        .min(100);
    let mut completed = props["completed"].as_str() == Some("true");
    // Reconcile inconsistent remote metadata with the local invariant.
    if completed {
        progress = 100;
    } else {
        completed = progress == 100;
    }
    let id = props["localEventId"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Ok(Some(Event {
        id,
        title,
        description,
        date,
        start_time,
        end_time,
        progress,
        completed,
        google_event_id: Some(remote_id.to_string()),
    }))
}

/// Extract a date and zero-padded `HH:MM` time from a Google `start`/`end`
/// object. All-day events carry only `date`; their time-of-day is `00:00`.
fn parse_gcal_time(value: &Value) -> Result<(NaiveDate, String), SyncError> {
    if let Some(ts) = value["dateTime"].as_str() {
        let parsed = DateTime::parse_from_rfc3339(ts)
            .map_err(|e| SyncError::MalformedEvent(format!("bad timestamp '{ts}': {e}")))?;
        Ok((parsed.date_naive(), parsed.format("%H:%M").to_string()))
    } else if let Some(day) = value["date"].as_str() {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| SyncError::MalformedEvent(format!("bad date '{day}': {e}")))?;
        Ok((date, "00:00".to_string()))
    } else {
        Err(SyncError::MalformedEvent(
            "missing start/end time".to_string(),
        ))
    }
}
