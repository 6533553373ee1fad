//! Service layer for reporting and the model-backed assistants.
//!
//! Ticket CRUD lives in [`crate::db::services`]; this module holds the pure
//! stats computation and the adapters that turn a description into a prompt
//! and the model's reply into a response.

pub mod classification;
pub mod solution;
pub mod stats;

pub use classification::classify_description;
pub use solution::{suggest_solution, FALLBACK_SOLUTION};
pub use stats::build_ticket_stats;

/// Maximum description length echoed into log lines.
pub(crate) const LOG_DESCRIPTION_CHARS: usize = 80;
