//! Error type for Facade API operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::seats::SeatError;
use crate::usage::UsageParseError;

/// Error type for Facade API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No seats directory configured
    #[error("Server misconfigured: {0}")]
    Config(#[from] ConfigError),

    /// Empty seat id in the request
    #[error("Missing seat id")]
    MissingSeatId,

    /// The seats directory could not be listed
    #[error("{0}")]
    SeatList(#[source] SeatError),

    /// The seat's auth file could not be resolved, read or parsed
    #[error("{0}")]
    SeatAuth(#[source] SeatError),

    /// The auth file holds neither an access token nor an API key
    #[error("No access token in auth file")]
    NoAccessToken,

    /// The usage API call failed (after retries)
    #[error("{message}")]
    Upstream { message: String, status: u16 },

    /// The usage API answered 2xx with an unusable body
    #[error("{0}")]
    UsageBody(#[from] UsageParseError),
}

impl ApiError {
    /// HTTP status code to report this error with
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Config(_) | ApiError::SeatList(_) => 500,
            ApiError::MissingSeatId | ApiError::NoAccessToken => 400,
            ApiError::SeatAuth(_) => 404,
            ApiError::Upstream { status, .. } => *status,
            ApiError::UsageBody(_) => 502,
        }
    }
}
