//! Ticket CRUD repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewTicket, Ticket, TicketChanges, TicketFilter, TicketId};

/// Repository trait for ticket records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
///
/// # Error Handling
/// Operations addressing a single ticket return `RepositoryError::NotFound`
/// when the id is unknown.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Check if the backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a new ticket, assigning its `id` and `created_at`.
    async fn create_ticket(&self, ticket: NewTicket) -> RepositoryResult<Ticket>;

    /// Retrieve a ticket by id.
    async fn get_ticket(&self, id: TicketId) -> RepositoryResult<Ticket>;

    /// List tickets matching `filter`, newest first (ties broken by id, descending).
    async fn list_tickets(&self, filter: &TicketFilter) -> RepositoryResult<Vec<Ticket>>;

    /// Apply `changes` to an existing ticket and return the updated record.
    ///
    /// `id` and `created_at` are never modified.
    async fn update_ticket(&self, id: TicketId, changes: TicketChanges)
        -> RepositoryResult<Ticket>;

    /// Delete a ticket.
    async fn delete_ticket(&self, id: TicketId) -> RepositoryResult<()>;
}
