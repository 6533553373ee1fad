//! Data Transfer Objects for the HTTP API.
//!
//! Ticket bodies reuse the domain types directly; this module only adds the
//! shapes that exist solely at the HTTP boundary.

use serde::{Deserialize, Serialize};

pub use crate::api::{Classification, Ticket, TicketFilterParams, TicketPayload, TicketStats};

/// Body of the classification and solution endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Suggested solution text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResponse {
    pub solution: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Store connection status
    pub database: String,
}
