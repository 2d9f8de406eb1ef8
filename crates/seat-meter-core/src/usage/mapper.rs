//! Map the upstream usage payload onto the dashboard's balance cards.

use chrono::{DateTime, SecondsFormat};
use thiserror::Error;

use super::types::{
    BalanceCard, CreditsInfo, SeatBalance, SeatStatusResponse, UsageApiResponse, UsageWindow,
};

const FIVE_HOUR_LABEL: &str = "5 hour usage limit";
const WEEKLY_LABEL: &str = "Weekly usage limit";

/// Why a 2xx usage body could not be turned into a [`UsageApiResponse`]
#[derive(Debug, Error)]
pub enum UsageParseError {
    #[error("Invalid JSON from usage API")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Unexpected response shape from usage API: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
}

/// Parse a usage body, telling malformed JSON apart from JSON of the wrong shape
pub fn parse_usage_body(text: &str) -> Result<UsageApiResponse, UsageParseError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(UsageParseError::InvalidJson)?;
    if !value.is_object() {
        return Err(UsageParseError::UnexpectedShape(serde::de::Error::custom(
            "expected a JSON object",
        )));
    }
    serde_json::from_value(value).map_err(UsageParseError::UnexpectedShape)
}

/// Unix seconds to `YYYY-MM-DDTHH:MM:SS.mmmZ`
fn format_reset_at(unix_seconds: f64) -> Option<String> {
    let millis = (unix_seconds * 1000.0).trunc();
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Remaining share of a window, clamped to 0..=100
fn remaining_percent(used_percent: f64) -> f64 {
    (100.0 - used_percent).clamp(0.0, 100.0)
}

fn window_to_card(window: Option<&UsageWindow>, label: &str) -> BalanceCard {
    match window {
        Some(window) => BalanceCard {
            label: label.to_string(),
            remaining_percent: remaining_percent(window.used_percent),
            reset_at: format_reset_at(window.reset_at),
        },
        None => BalanceCard {
            label: label.to_string(),
            remaining_percent: 100.0,
            reset_at: None,
        },
    }
}

/// Convert the upstream usage payload to the seat status response
pub fn map_usage_to_status(data: &UsageApiResponse) -> SeatStatusResponse {
    let rate_limit = data.rate_limit.as_ref();
    let primary = rate_limit.and_then(|rl| rl.primary_window.as_ref());
    let secondary = rate_limit.and_then(|rl| rl.secondary_window.as_ref());

    let credits = data.credits.as_ref().map(|credits| CreditsInfo {
        has_credits: credits.has_credits,
        unlimited: credits.unlimited,
        balance: credits.balance,
    });

    SeatStatusResponse {
        ok: true,
        balance: SeatBalance {
            five_hour_usage_limit: window_to_card(primary, FIVE_HOUR_LABEL),
            weekly_usage_limit: window_to_card(secondary, WEEKLY_LABEL),
            code_review: None,
        },
        plan_type: data.plan_type.clone(),
        credits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_BODY: &str = r#"{"plan_type":"pro","rate_limit":{"primary_window":{"used_percent":30,"reset_at":1700000000,"limit_window_seconds":18000},"secondary_window":{"used_percent":80,"reset_at":1700600000,"limit_window_seconds":604800}},"credits":{"has_credits":true,"unlimited":false,"balance":12.5}}"#;

    fn window(used_percent: f64) -> UsageWindow {
        UsageWindow {
            used_percent,
            reset_at: 1_700_000_000.0,
            limit_window_seconds: Some(18_000.0),
        }
    }

    #[test]
    fn test_map_full_payload() {
        let data = parse_usage_body(FULL_BODY).unwrap();
        let mapped = map_usage_to_status(&data);

        assert!(mapped.ok);
        assert_eq!(mapped.balance.five_hour_usage_limit.remaining_percent, 70.0);
        assert_eq!(mapped.balance.weekly_usage_limit.remaining_percent, 20.0);
        assert_eq!(
            mapped.balance.five_hour_usage_limit.reset_at.as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
        assert_eq!(mapped.plan_type.as_deref(), Some("pro"));
        assert_eq!(
            mapped.credits,
            Some(CreditsInfo {
                has_credits: true,
                unlimited: false,
                balance: Some(12.5),
            })
        );
    }

    #[test]
    fn test_map_serialized_shape() {
        let data = parse_usage_body(FULL_BODY).unwrap();
        let json = serde_json::to_value(map_usage_to_status(&data)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "balance": {
                    "fiveHourUsageLimit": {
                        "label": "5 hour usage limit",
                        "remainingPercent": 70.0,
                        "resetAt": "2023-11-14T22:13:20.000Z"
                    },
                    "weeklyUsageLimit": {
                        "label": "Weekly usage limit",
                        "remainingPercent": 20.0,
                        "resetAt": "2023-11-21T20:53:20.000Z"
                    },
                    "codeReview": null
                },
                "planType": "pro",
                "credits": {"hasCredits": true, "unlimited": false, "balance": 12.5}
            })
        );
    }

    #[test]
    fn test_missing_rate_limit_defaults_to_full() {
        let data = parse_usage_body(r#"{"plan_type":"plus"}"#).unwrap();
        let mapped = map_usage_to_status(&data);

        for card in [
            &mapped.balance.five_hour_usage_limit,
            &mapped.balance.weekly_usage_limit,
        ] {
            assert_eq!(card.remaining_percent, 100.0);
            assert!(card.reset_at.is_none());
        }
        assert!(mapped.balance.code_review.is_none());
        assert!(mapped.credits.is_none());
    }

    #[test]
    fn test_windows_mapped_independently() {
        let data = parse_usage_body(
            r#"{"rate_limit":{"secondary_window":{"used_percent":12.5,"reset_at":1700600000,"limit_window_seconds":604800}}}"#,
        )
        .unwrap();
        let mapped = map_usage_to_status(&data);
        assert_eq!(mapped.balance.five_hour_usage_limit.remaining_percent, 100.0);
        assert!(mapped.balance.five_hour_usage_limit.reset_at.is_none());
        assert_eq!(mapped.balance.weekly_usage_limit.remaining_percent, 87.5);
        assert!(mapped.plan_type.is_none());
    }

    #[test]
    fn test_remaining_percent_exact_in_range() {
        for used in [0.0, 1.0, 42.0, 99.0, 100.0] {
            let card = window_to_card(Some(&window(used)), FIVE_HOUR_LABEL);
            assert_eq!(card.remaining_percent, 100.0 - used);
        }
    }

    #[test]
    fn test_remaining_percent_clamped() {
        assert_eq!(
            window_to_card(Some(&window(-5.0)), FIVE_HOUR_LABEL).remaining_percent,
            100.0
        );
        assert_eq!(
            window_to_card(Some(&window(150.0)), FIVE_HOUR_LABEL).remaining_percent,
            0.0
        );
    }

    #[test]
    fn test_credits_without_balance() {
        let data =
            parse_usage_body(r#"{"credits":{"has_credits":false,"unlimited":true}}"#).unwrap();
        let json = serde_json::to_value(map_usage_to_status(&data)).unwrap();
        assert_eq!(
            json["credits"],
            serde_json::json!({"hasCredits": false, "unlimited": true})
        );
        assert!(json.get("planType").is_none());
    }

    #[test]
    fn test_reset_at_truncates_sub_millisecond() {
        assert_eq!(
            format_reset_at(1_700_000_000.0009).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
        assert_eq!(
            format_reset_at(1_700_000_000.0005).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
        assert_eq!(
            format_reset_at(1_700_000_000.25).as_deref(),
            Some("2023-11-14T22:13:20.250Z")
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_usage_body("<html>oops</html>"),
            Err(UsageParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_unexpected_shape() {
        assert!(matches!(
            parse_usage_body(r#"{"rate_limit":{"primary_window":{"used_percent":"lots"}}}"#),
            Err(UsageParseError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_usage_body("[1,2,3]"),
            Err(UsageParseError::UnexpectedShape(_))
        ));
    }
}
