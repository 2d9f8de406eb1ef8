//! HTTP client for the upstream usage API with bounded retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::types::FetchOutcome;

/// Identifying user agent sent upstream
pub const CLIENT_USER_AGENT: &str = "CodexSeatMeter";
/// Account-scoping header (`ChatGPT-Account-Id`), sent only when the seat has an account id
pub const ACCOUNT_ID_HEADER: &str = "chatgpt-account-id";
/// Retries after the first attempt (3 attempts total)
pub const MAX_RETRIES: u32 = 2;
/// Linear backoff base: attempt `n` (0-indexed) waits `base * (n + 1)`
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(800);

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE
    )
}

/// Stateless usage client.
///
/// Cloning is cheap and every `fetch_usage` call owns its own headers and
/// attempt counter, so concurrent fetches for different seats never interact.
#[derive(Debug, Clone)]
pub struct UsageClient {
    http: reqwest::Client,
    retry_delay: Duration,
}

impl UsageClient {
    /// Build a client with the given per-request timeout
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            retry_delay: RETRY_BASE_DELAY,
        })
    }

    /// Override the backoff base delay
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch usage for one seat.
    ///
    /// Retries transport errors and 429/502/503 up to [`MAX_RETRIES`] times.
    /// 401/403 and any other non-2xx status end the call immediately.
    pub async fn fetch_usage(
        &self,
        access_token: &str,
        account_id: Option<&str>,
        url: &str,
    ) -> FetchOutcome {
        let headers = match build_headers(access_token, account_id) {
            Ok(headers) => headers,
            Err(message) => return FetchOutcome::Failure { message, status: 400 },
        };

        let mut attempt: u32 = 0;
        loop {
            let response = match self
                .http
                .get(url)
                .headers(headers.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    if attempt < MAX_RETRIES {
                        warn!(
                            "Usage fetch: transport error (attempt {}): {}",
                            attempt + 1,
                            e
                        );
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return FetchOutcome::Failure {
                        message: format!("Network error: {}", e),
                        status: StatusCode::BAD_GATEWAY.as_u16(),
                    };
                }
            };

            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    return FetchOutcome::Failure {
                        message: format!("Failed to read usage response: {}", e),
                        status: StatusCode::BAD_GATEWAY.as_u16(),
                    };
                }
            };

            if status.is_success() {
                debug!("Usage fetch: {} after {} attempt(s)", status, attempt + 1);
                return FetchOutcome::Success {
                    body: text,
                    status: status.as_u16(),
                };
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return FetchOutcome::Failure {
                    message: "Token expired or invalid".to_string(),
                    status: status.as_u16(),
                };
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                debug!("Usage fetch: {} (attempt {}), retrying", status, attempt + 1);
                self.backoff(attempt).await;
                attempt += 1;
                continue;
            }

            let preview: String = text.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return FetchOutcome::Failure {
                message: format!("API error {}: {}", status.as_u16(), preview),
                status: status.as_u16(),
            };
        }
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(backoff_delay(self.retry_delay, attempt)).await;
    }
}

/// Linear backoff: `base` after the first attempt, `2 * base` after the second
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * (attempt + 1)
}

fn build_headers(access_token: &str, account_id: Option<&str>) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", access_token))
        .map_err(|_| "Access token contains invalid header characters".to_string())?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(account_id) = account_id {
        let value = HeaderValue::from_str(account_id)
            .map_err(|_| "Account id contains invalid header characters".to_string())?;
        headers.insert(HeaderName::from_static(ACCOUNT_ID_HEADER), value);
    }
    Ok(headers)
}
