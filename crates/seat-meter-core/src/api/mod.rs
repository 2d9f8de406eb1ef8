//! Public API layer (Facade) for seat-meter-core.
//!
//! [`SeatMeter`] ties the credential store, usage client and mapper together
//! behind the two operations the dashboard needs. Consumers (the web server,
//! tests) should use this instead of calling the pieces directly.
//!
//! ```ignore
//! let meter = SeatMeter::new(settings)?;
//! let seats = meter.list_seats().await?;
//! let status = meter.seat_status("team-a").await?;
//! ```

mod core;
pub mod types;

pub use core::SeatMeter;
pub use types::ApiError;
