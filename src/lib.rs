//! Seat Meter - local dashboard for Codex seat quotas and credits.
//!
//! The core logic lives in `seat-meter-core`; this crate hosts it over HTTP.

pub mod web;
