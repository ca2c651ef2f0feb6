//! Typed failures shared by every remote call in the crate
//!
//! Page fetches, image fetches and request construction all surface one of
//! three failure kinds. Each kind carries a diagnostic detail for logs and a
//! fixed user-facing message for display.

use thiserror::Error;

/// Errors that can occur when talking to the launch API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// The request target could not be built (bad base URL, bad image URL)
    #[error("Invalid request target: {0}")]
    InvalidRequestTarget(String),

    /// Connection-level failure, or the server answered with a non-200 status
    #[error("Transport failure{}: {reason}", status_suffix(.status))]
    TransportFailure {
        /// HTTP status, when the server answered at all
        status: Option<u16>,
        /// Underlying cause
        reason: String,
    },

    /// Body missing, empty, or not matching the expected schema
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl LaunchError {
    /// Builds a transport failure for a non-success HTTP status
    pub fn status(status: u16) -> Self {
        LaunchError::TransportFailure {
            status: Some(status),
            reason: "unexpected status code".to_string(),
        }
    }

    /// Message suitable for showing to the person using the app
    pub fn user_message(&self) -> &'static str {
        match self {
            LaunchError::InvalidRequestTarget(_) => "Invalid URL, please try again later.",
            LaunchError::TransportFailure { .. } => {
                "Unable to complete your request. Please check your internet connection."
            }
            LaunchError::InvalidPayload(_) => {
                "The data received from the server was invalid. Please try again"
            }
        }
    }
}

impl From<reqwest::Error> for LaunchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            LaunchError::InvalidRequestTarget(err.to_string())
        } else if err.is_decode() || err.is_body() {
            LaunchError::InvalidPayload(err.to_string())
        } else {
            LaunchError::TransportFailure {
                status: err.status().map(|s| s.as_u16()),
                reason: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(err: serde_json::Error) -> Self {
        LaunchError::InvalidPayload(err.to_string())
    }
}
