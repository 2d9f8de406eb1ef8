//! Core library for seat-meter.
//!
//! Reads per-seat credential files, fetches each seat's usage from the
//! upstream usage API and maps it into the dashboard model. The web
//! frontend lives in the `seat-meter` binary crate.

pub mod api;
pub mod config;
pub mod seats;
pub mod usage;
