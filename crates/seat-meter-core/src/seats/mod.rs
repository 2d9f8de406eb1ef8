//! Seat credential store: one `<seat>.json` auth file per monitored seat.

mod store;
pub mod types;

pub use store::{list_seats, load_seat_auth, seat_auth_path, SeatError};
pub use types::{AuthRecord, AuthTokens, SeatMeta};
