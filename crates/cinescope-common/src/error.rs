//! Common error types used throughout cinescope.
//!
//! The error type is `Clone` so that a failed fetch can be recorded in
//! pagination state and handed out in snapshots without consuming it.

/// Common error type for cinescope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The upstream movie API returned a non-success status, or the request
    /// failed at the transport level (`status_code` is `None` in that case).
    #[error("Remote API error ({}): {status_message}", display_status(.status_code))]
    RemoteApi {
        status_code: Option<u16>,
        status_message: String,
    },

    /// Required configuration (base URL, access credential) is missing or
    /// malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn display_status(code: &Option<u16>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "transport".to_string(),
    }
}

impl Error {
    /// Create a RemoteApi error for an upstream HTTP status.
    pub fn remote<S: Into<String>>(status_code: u16, msg: S) -> Self {
        Self::RemoteApi {
            status_code: Some(status_code),
            status_message: msg.into(),
        }
    }

    /// Create a RemoteApi error for a transport or decoding failure.
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::RemoteApi {
            status_code: None,
            status_message: msg.into(),
        }
    }

    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status reported by the upstream, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
