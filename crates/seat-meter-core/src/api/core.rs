//! SeatMeter Facade, the dashboard's two operations.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::seats::{self, SeatMeta};
use crate::usage::{
    map_usage_to_status, parse_usage_body, FetchOutcome, SeatStatusResponse, UsageClient,
};

use super::types::ApiError;

/// Facade over the credential store and usage client.
///
/// Holds no per-request state: auth files are re-read on every call and each
/// status request runs its own fetch, so calls may be issued concurrently.
#[derive(Debug, Clone)]
pub struct SeatMeter {
    settings: Arc<Settings>,
    client: UsageClient,
}

impl SeatMeter {
    /// Build the facade, creating an HTTP client with the configured timeout
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = UsageClient::new(Duration::from_secs(settings.usage.timeout_secs))?;
        Ok(Self::with_client(settings, client))
    }

    /// Build the facade around an existing usage client
    pub fn with_client(settings: Settings, client: UsageClient) -> Self {
        Self {
            settings: Arc::new(settings),
            client,
        }
    }

    /// Settings this instance was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// List seats (safe metadata only)
    pub async fn list_seats(&self) -> Result<Vec<SeatMeta>, ApiError> {
        let dir = self.settings.seats_directory()?;
        seats::list_seats(dir).await.map_err(ApiError::SeatList)
    }

    /// Fetch and map the usage of one seat
    pub async fn seat_status(&self, seat_id: &str) -> Result<SeatStatusResponse, ApiError> {
        if seat_id.is_empty() {
            return Err(ApiError::MissingSeatId);
        }
        let dir = self.settings.seats_directory()?;

        let auth = seats::load_seat_auth(dir, seat_id)
            .await
            .map_err(ApiError::SeatAuth)?;
        let Some(access_token) = auth.access_token() else {
            warn!("Seat {}: no access token in auth file", seat_id);
            return Err(ApiError::NoAccessToken);
        };

        let url = self.settings.usage.url();
        debug!("Seat {}: fetching usage from {}", seat_id, url);
        match self
            .client
            .fetch_usage(access_token, auth.account_id(), &url)
            .await
        {
            FetchOutcome::Success { body, .. } => {
                let data = parse_usage_body(&body)?;
                Ok(map_usage_to_status(&data))
            }
            FetchOutcome::Failure { message, status } => {
                info!("Seat {}: usage fetch failed ({}): {}", seat_id, status, message);
                Err(ApiError::Upstream { message, status })
            }
        }
    }
}
