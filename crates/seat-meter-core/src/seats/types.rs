//! Per-seat credential file shapes.

use serde::{Deserialize, Serialize};

/// Token block of a seat's auth file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthTokens {
    #[serde(default)]
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Contents of `<seat>.json` in the seats directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthRecord {
    #[serde(default)]
    pub auth_mode: Option<String>,
    #[serde(default, rename = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
    #[serde(default)]
    pub last_refresh: Option<String>,
}

impl AuthRecord {
    /// Token used for the usage request.
    ///
    /// `tokens.access_token` wins when present, otherwise `OPENAI_API_KEY`.
    /// An empty token counts as missing.
    pub fn access_token(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .and_then(|tokens| tokens.access_token.as_deref())
            .or(self.openai_api_key.as_deref())
            .filter(|token| !token.is_empty())
    }

    /// Account id sent as the `ChatGPT-Account-Id` header
    pub fn account_id(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .and_then(|tokens| tokens.account_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Seat list item (safe fields only, no tokens)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatMeta {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
