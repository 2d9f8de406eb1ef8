//! Usage data types: the upstream `wham/usage` payload and the dashboard model.

use serde::{Deserialize, Serialize};

/// Response body of the upstream usage API (external, read-only)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageApiResponse {
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<RateLimit>,
    #[serde(default)]
    pub credits: Option<UsageCredits>,
}

/// Rate-limit block with the short (primary) and long (secondary) windows
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimit {
    #[serde(default)]
    pub primary_window: Option<UsageWindow>,
    #[serde(default)]
    pub secondary_window: Option<UsageWindow>,
}

/// One rate-limit accounting window
#[derive(Debug, Clone, Deserialize)]
pub struct UsageWindow {
    /// Percentage used (nominally 0-100)
    pub used_percent: f64,
    /// Reset instant, unix seconds
    pub reset_at: f64,
    #[serde(default)]
    pub limit_window_seconds: Option<f64>,
}

/// Upstream credits block
#[derive(Debug, Clone, Deserialize)]
pub struct UsageCredits {
    pub has_credits: bool,
    pub unlimited: bool,
    #[serde(default)]
    pub balance: Option<f64>,
}

/// One balance card (5h limit, weekly limit, or code review)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCard {
    pub label: String,
    /// Always within 0..=100
    pub remaining_percent: f64,
    /// ISO-8601 reset instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<String>,
}

/// The set of cards shown for a seat
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatBalance {
    pub five_hour_usage_limit: BalanceCard,
    pub weekly_usage_limit: BalanceCard,
    /// Reserved slot, serialized as an explicit `null`
    pub code_review: Option<BalanceCard>,
}

/// Credits summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsInfo {
    pub has_credits: bool,
    pub unlimited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

/// Success body of `GET /api/seats/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStatusResponse {
    pub ok: bool,
    pub balance: SeatBalance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<CreditsInfo>,
}

/// Error body of `GET /api/seats/{id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatStatusError {
    pub ok: bool,
    pub error: String,
}

impl SeatStatusError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// Either status body; serializes as `{ok: true, ...}` or `{ok: false, error}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeatStatusResult {
    Success(SeatStatusResponse),
    Error(SeatStatusError),
}

impl From<SeatStatusResponse> for SeatStatusResult {
    fn from(value: SeatStatusResponse) -> Self {
        SeatStatusResult::Success(value)
    }
}

impl From<SeatStatusError> for SeatStatusResult {
    fn from(value: SeatStatusError) -> Self {
        SeatStatusResult::Error(value)
    }
}

/// Result of one logical usage fetch (after retries)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response with its raw body
    Success { body: String, status: u16 },
    /// Terminal failure with a user-facing message
    Failure { message: String, status: u16 },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// HTTP status carried by either variant
    pub fn status(&self) -> u16 {
        match self {
            FetchOutcome::Success { status, .. } | FetchOutcome::Failure { status, .. } => *status,
        }
    }
}
