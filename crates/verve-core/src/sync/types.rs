//! Core types for calendar synchronization.

use crate::error::SyncError;

/// Connection state of the sync session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Connecting,
    Connected,
    TokenExpired,
}

/// Explicit session value passed through the engine's entry points.
///
/// Replaces the ambient "is connected" flag of the source application: the
/// token and the state live together and every transition goes through a
/// method here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSession {
    state: SyncState,
    token: Option<String>,
}

impl SyncSession {
    pub fn disconnected() -> Self {
        Self {
            state: SyncState::Disconnected,
            token: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The bearer token, present only while connected.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token present and not known-expired.
    pub fn is_connected(&self) -> bool {
        self.state == SyncState::Connected && self.token.is_some()
    }

    /// Login started, no credential yet.
    pub fn begin_connect(&mut self) {
        self.state = SyncState::Connecting;
        self.token = None;
    }

    /// Login succeeded. Also the reconnect path out of `TokenExpired`.
    pub fn connect(&mut self, token: String) {
        self.state = SyncState::Connected;
        self.token = Some(token);
    }

    /// The provider rejected the credential.
    pub fn expire(&mut self) {
        self.state = SyncState::TokenExpired;
        self.token = None;
    }

    /// Explicit user logout.
    pub fn disconnect(&mut self) {
        self.state = SyncState::Disconnected;
        self.token = None;
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Outcome of one sync pass (merge, push, or update propagation).
///
/// Failures are collected, never thrown: one bad event must not block its
/// siblings, and token expiry is a state transition rather than an abort.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Remote-only events appended by fetch-and-merge.
    pub merged: usize,
    /// Local-only events that gained a remote counterpart.
    pub created: usize,
    /// Mirrored events patched remotely.
    pub patched: usize,
    /// Per-event (or per-call) failures.
    pub failures: Vec<SyncFailure>,
    /// The pass observed token expiry and the session is now expired.
    pub token_expired: bool,
}

impl SyncReport {
    /// No failures and the token survived.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.token_expired
    }

    /// Fold another pass's outcome into this one.
    pub fn absorb(&mut self, other: SyncReport) {
        self.merged += other.merged;
        self.created += other.created;
        self.patched += other.patched;
        self.failures.extend(other.failures);
        self.token_expired |= other.token_expired;
    }
}

/// A single failed remote operation.
#[derive(Debug)]
pub struct SyncFailure {
    /// Event the failure belongs to; `None` for whole-fetch failures.
    pub event_id: Option<String>,
    pub error: SyncError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_disconnected() {
        let session = SyncSession::disconnected();
        assert_eq!(session.state(), SyncState::Disconnected);
        assert!(!session.is_connected());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_connect_transition() {
        let mut session = SyncSession::disconnected();
        session.begin_connect();
        assert_eq!(session.state(), SyncState::Connecting);
        session.connect("tok".to_string());
        assert!(session.is_connected());
        assert_eq!(session.token(), Some("tok"));
    }

    #[test]
    fn test_expire_drops_token() {
        let mut session = SyncSession::disconnected();
        session.connect("tok".to_string());
        session.expire();
        assert_eq!(session.state(), SyncState::TokenExpired);
        assert!(session.token().is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn test_reconnect_from_expired() {
        let mut session = SyncSession::disconnected();
        session.connect("old".to_string());
        session.expire();
        session.connect("new".to_string());
        assert!(session.is_connected());
        assert_eq!(session.token(), Some("new"));
    }

    #[test]
    fn test_report_absorb() {
        let mut a = SyncReport {
            merged: 1,
            ..Default::default()
        };
        let b = SyncReport {
            created: 2,
            token_expired: true,
            ..Default::default()
        };
        a.absorb(b);
        assert_eq!(a.merged, 1);
        assert_eq!(a.created, 2);
        assert!(a.token_expired);
        assert!(!a.is_clean());
    }
}
