//! Domain models for the ticket desk.

pub mod macros;
pub mod ticket;
pub mod validation;

pub use ticket::*;
pub use validation::{FieldErrors, TicketPayload};
