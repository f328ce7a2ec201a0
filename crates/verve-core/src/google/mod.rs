//! Google Calendar integration: REST client and OAuth flow.

pub mod client;
pub mod oauth;

pub use client::{CalendarClient, DEFAULT_BASE_URL, UNTITLED_EVENT};
pub use oauth::OAuthConfig;
