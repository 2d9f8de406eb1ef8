//! Web server module for the seat dashboard
//!
//! Provides the REST API consumed by the embedded dashboard page.

mod api;
pub mod auth;
mod server;
mod static_files;

pub use server::{router, WebServer};
