//! Public API surface.
//!
//! This file consolidates the types that cross the HTTP boundary.
//! All of them derive Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    Category, Classification, FieldErrors, Priority, Ticket, TicketFilterParams, TicketId,
    TicketPayload, TicketStats,
};
