//! Error handling for the CityHall client

use std::fmt;
use thiserror::Error;

/// Unified error type for the CityHall client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success response from the API, with the server's `error` body when present
    #[error("API error (status {status})")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-supplied error message, if the body carried one
        message: Option<String>,
    },

    /// Authentication rejected (HTTP 401 outside of login); the session has been cleared
    #[error("authentication required")]
    Unauthorized,

    /// Public registration capacity reached (HTTP 409 on submission)
    #[error("capacity reached")]
    CapacityReached,

    /// Authentication errors raised locally (missing token, malformed session)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message the server attached to a failed response, if any.
    ///
    /// The entity editor prefers this wording over its configured fallback
    /// when a list load fails.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Unauthorized => Some(401),
            Error::CapacityReached => Some(409),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
