//! Reservation Context - 订座限界上下文

mod aggregate;
mod errors;

pub use aggregate::{ensure_fits_table, ensure_in_future, ReservationStatus};
pub use errors::ReservationError;
