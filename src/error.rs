//! Error types shared by the API client, the screens and startup.
//!
//! Every failure a screen can see is one of these. None of them are fatal:
//! screens log them, turn them into a notice and fall back to an empty or
//! previous state.

use thiserror::Error;

/// A failed backend call.
///
/// `Clone` so it can ride inside UI messages back to the screen that issued
/// the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No connectivity, unreachable host, or the request never completed.
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the body was not what we expected.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Item name is empty")]
    EmptyItemName,

    #[error("Expiry date must look like 2024-12-31, got {0:?}")]
    InvalidExpiry(String),
}

/// Problems loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid user id {0:?}")]
    InvalidUserId(String),

    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A route string that names no screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown route {0:?}")]
    Unknown(String),

    #[error("Invalid recipe id {0:?}")]
    InvalidRecipeId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let err = ApiError::Status {
            status: 404,
            body: "Item not found".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned HTTP 404");

        let err = ValidationError::InvalidExpiry("tomorrow".to_string());
        assert!(err.to_string().contains("\"tomorrow\""));
    }
}
