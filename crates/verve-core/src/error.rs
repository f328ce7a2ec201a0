//! Core error types for verve-core.
//!
//! Typed errors per subsystem, with a top-level umbrella for callers that
//! do not care which layer failed. None of these are fatal: the calendar
//! stays usable against the local store even when the remote provider is
//! unreachable.

use thiserror::Error;

/// Core error type for verve-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// OAuth errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An event with this id already exists.
    #[error("An event with id '{0}' already exists")]
    DuplicateId(String),

    /// No event with this id exists.
    #[error("No event with id '{0}'")]
    UnknownEvent(String),
}

/// Persistence adapter errors.
///
/// `ParseFailed` is recoverable: the caller surfaces it to the user and
/// continues with an empty store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored data under a key could not be decoded.
    #[error("Malformed data under key '{key}': {message}")]
    ParseFailed { key: String, message: String },

    /// Data could not be encoded for a key.
    #[error("Failed to encode data for key '{key}': {message}")]
    EncodeFailed { key: String, message: String },

    /// Underlying store IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote calendar call errors.
///
/// `TokenExpired` is a distinguished outcome: it drives the session state
/// machine and short-circuits in-flight sync passes. Everything else is
/// reported per call and leaves the connection state untouched.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The provider rejected the bearer credential.
    #[error("Google Calendar rejected the access token")]
    TokenExpired,

    /// Non-success response other than an authorization failure.
    #[error("Google Calendar API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure, including the request timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A remote event payload was missing a required field.
    #[error("Malformed remote event: {0}")]
    MalformedEvent(String),
}

/// OAuth flow errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Browser launch or callback listener failed.
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Code-for-token exchange failed.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The localhost callback did not carry an authorization code.
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Client id/secret not set in the config file.
    #[error("Google OAuth credentials not configured")]
    CredentialsNotConfigured,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {}: {message}", path.display())]
    LoadFailed { path: std::path::PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {}: {message}", path.display())]
    SaveFailed { path: std::path::PathBuf, message: String },

    /// No configuration entry under this key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Value could not be parsed for the key's type.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Event field validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Title must be non-empty.
    #[error("Event title must not be empty")]
    EmptyTitle,

    /// Times are wall-clock `HH:MM` strings.
    #[error("Invalid time '{0}': expected HH:MM (24-hour)")]
    InvalidTime(String),

    /// Progress is 0-100 in steps of 10.
    #[error("Invalid progress {0}: expected 0-100 in steps of 10")]
    InvalidProgress(u8),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
