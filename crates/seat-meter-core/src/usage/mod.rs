//! Usage monitoring: fetch a seat's quota from the upstream usage API and
//! map it onto dashboard balance cards.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::UsageClient;
pub use mapper::{map_usage_to_status, parse_usage_body, UsageParseError};
pub use types::{
    BalanceCard, CreditsInfo, FetchOutcome, SeatBalance, SeatStatusError, SeatStatusResponse,
    SeatStatusResult, UsageApiResponse,
};
