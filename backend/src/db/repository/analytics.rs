//! Analytics repository trait for the stats report.
//!
//! Backends only produce raw grouped counts; zero-filling and averaging are
//! done once in `services::stats` so that every backend reports identically.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::TicketCounts;

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Compute total/open counts, the creation time range and grouped counts
    /// by stored priority and category value.
    async fn ticket_counts(&self) -> RepositoryResult<TicketCounts>;
}
