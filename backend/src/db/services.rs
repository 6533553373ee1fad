//! High-level ticket service layer.
//!
//! Repository-agnostic operations used by the HTTP handlers. These functions
//! own the business rules that must hold regardless of the storage backend:
//! payload validation, defaults for new tickets, and the shape of the stats
//! report.
//!
//! # Usage
//!
//! ```no_run
//! use ticket_desk::db::{services, repositories::LocalRepository};
//! use ticket_desk::models::{TicketFilter, TicketPayload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let payload = TicketPayload {
//!         title: Some("Cannot log in".into()),
//!         description: Some("Password reset link expired".into()),
//!         ..Default::default()
//!     };
//!     services::create_ticket(&repo, payload).await?;
//!
//!     let tickets = services::list_tickets(&repo, &TicketFilter::default()).await?;
//!     println!("Found {} tickets", tickets.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::validation::{validate_changes, validate_new_ticket};
use crate::models::{FieldErrors, Ticket, TicketFilter, TicketId, TicketPayload, TicketStats};
use crate::services::stats::build_ticket_stats;

/// Error returned by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before reaching the store.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    /// Store failure, including unknown ticket ids.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ==================== Health & Connection ====================

/// Check if the store is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Ticket Operations ====================

/// Validate and store a new ticket.
///
/// Missing optional fields get their defaults (`general`, `medium`, `open`).
pub async fn create_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    payload: TicketPayload,
) -> ServiceResult<Ticket> {
    let new_ticket = validate_new_ticket(payload)?;
    let ticket = repo.create_ticket(new_ticket).await?;
    info!(
        "Created ticket {} (category={}, priority={})",
        ticket.id, ticket.category, ticket.priority
    );
    Ok(ticket)
}

pub async fn get_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    id: TicketId,
) -> ServiceResult<Ticket> {
    Ok(repo.get_ticket(id).await?)
}

/// List tickets matching `filter`, newest first. The full set is returned; there is no paging.
pub async fn list_tickets<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &TicketFilter,
) -> ServiceResult<Vec<Ticket>> {
    let tickets = repo.list_tickets(filter).await?;
    debug!("Listed {} tickets with {:?}", tickets.len(), filter);
    Ok(tickets)
}

/// Full update (`PUT`): `title` and `description` are required.
pub async fn replace_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    id: TicketId,
    payload: TicketPayload,
) -> ServiceResult<Ticket> {
    update_ticket(repo, id, payload, false).await
}

/// Partial update (`PATCH`): only the supplied fields are validated and written.
pub async fn patch_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    id: TicketId,
    payload: TicketPayload,
) -> ServiceResult<Ticket> {
    update_ticket(repo, id, payload, true).await
}

async fn update_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    id: TicketId,
    payload: TicketPayload,
    partial: bool,
) -> ServiceResult<Ticket> {
    // Unknown ids report 404 even when the body is also invalid.
    repo.get_ticket(id).await?;
    let changes = validate_changes(payload, partial)?;
    let ticket = repo.update_ticket(id, changes).await?;
    info!("Updated ticket {} (status={})", ticket.id, ticket.status);
    Ok(ticket)
}

pub async fn delete_ticket<R: FullRepository + ?Sized>(
    repo: &R,
    id: TicketId,
) -> ServiceResult<()> {
    repo.delete_ticket(id).await?;
    info!("Deleted ticket {}", id);
    Ok(())
}

// ==================== Reporting ====================

/// Aggregate report over every stored ticket.
pub async fn ticket_stats<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<TicketStats> {
    let counts = repo.ticket_counts().await?;
    Ok(build_ticket_stats(&counts))
}
