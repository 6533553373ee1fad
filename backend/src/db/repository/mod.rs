//! Repository traits for abstracting ticket storage.
//!
//! The traits are split by concern:
//! - [`TicketRepository`]: health check and ticket CRUD / filtered listing
//! - [`AnalyticsRepository`]: raw aggregates for the stats report
//!
//! For functions that need every capability, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let tickets = repo.list_tickets(&TicketFilter::default()).await?;
//!     let counts = repo.ticket_counts().await?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod error;
pub mod ticket;

pub use analytics::AnalyticsRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use ticket::TicketRepository;

/// Everything the HTTP layer needs from a storage backend.
pub trait FullRepository: TicketRepository + AnalyticsRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: TicketRepository + AnalyticsRepository {}
