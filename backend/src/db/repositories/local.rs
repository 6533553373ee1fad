//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository traits
//! suitable for unit testing and local development. Tickets are kept in a
//! `BTreeMap` behind an `RwLock`, giving fast, deterministic and isolated
//! execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::repository::*;
use crate::models::{
    NewTicket, Ticket, TicketChanges, TicketCounts, TicketFilter, TicketId, OPEN_STATUS,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use ticket_desk::db::repositories::LocalRepository;
/// use ticket_desk::db::repository::TicketRepository;
/// use ticket_desk::models::{NewTicket, TicketFilter};
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// repo.create_ticket(NewTicket::new("Printer jam", "Tray 2 is stuck")).await.unwrap();
///
/// let tickets = repo.list_tickets(&TicketFilter::default()).await.unwrap();
/// assert_eq!(tickets.len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    tickets: BTreeMap<TicketId, Ticket>,
    next_ticket_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            tickets: BTreeMap::new(),
            next_ticket_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Store a ticket with an explicit creation time.
    ///
    /// Used to seed history for the stats report; the API always stamps the current time.
    pub fn insert_ticket_at(&self, ticket: NewTicket, created_at: DateTime<Utc>) -> Ticket {
        let mut data = self.write();
        let id = TicketId(data.next_ticket_id);
        data.next_ticket_id += 1;

        let stored = Ticket {
            id,
            title: ticket.title,
            description: ticket.description,
            category: ticket.category,
            priority: ticket.priority,
            status: ticket.status,
            created_at,
        };
        data.tickets.insert(id, stored.clone());
        stored
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.write().is_healthy = healthy;
    }

    /// Clear all tickets. Ids restart at 1.
    pub fn clear(&self) {
        let mut data = self.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of tickets stored.
    pub fn ticket_count(&self) -> usize {
        self.read().tickets.len()
    }

    /// Check if a ticket exists.
    pub fn has_ticket(&self, id: TicketId) -> bool {
        self.read().tickets.contains_key(&id)
    }

    // Every mutation is a single map operation, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, LocalData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocalData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.read().is_healthy)
    }

    async fn create_ticket(&self, ticket: NewTicket) -> RepositoryResult<Ticket> {
        self.ensure_healthy("create_ticket")?;
        Ok(self.insert_ticket_at(ticket, Utc::now()))
    }

    async fn get_ticket(&self, id: TicketId) -> RepositoryResult<Ticket> {
        self.ensure_healthy("get_ticket")?;
        self.read()
            .tickets
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::ticket_not_found("get_ticket", id))
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> RepositoryResult<Vec<Ticket>> {
        self.ensure_healthy("list_tickets")?;
        let mut tickets: Vec<Ticket> = self
            .read()
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        changes: TicketChanges,
    ) -> RepositoryResult<Ticket> {
        self.ensure_healthy("update_ticket")?;
        let mut data = self.write();
        let ticket = data
            .tickets
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::ticket_not_found("update_ticket", id))?;
        changes.apply_to(ticket);
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, id: TicketId) -> RepositoryResult<()> {
        self.ensure_healthy("delete_ticket")?;
        self.write()
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::ticket_not_found("delete_ticket", id))
    }
}

#[async_trait]
impl AnalyticsRepository for LocalRepository {
    async fn ticket_counts(&self) -> RepositoryResult<TicketCounts> {
        self.ensure_healthy("ticket_counts")?;
        let data = self.read();

        let mut by_priority: HashMap<String, i64> = HashMap::new();
        let mut by_category: HashMap<String, i64> = HashMap::new();
        let mut counts = TicketCounts::default();

        for ticket in data.tickets.values() {
            counts.total += 1;
            if ticket.status == OPEN_STATUS {
                counts.open += 1;
            }
            counts.first_created_at = Some(match counts.first_created_at {
                Some(first) => first.min(ticket.created_at),
                None => ticket.created_at,
            });
            counts.last_created_at = Some(match counts.last_created_at {
                Some(last) => last.max(ticket.created_at),
                None => ticket.created_at,
            });
            *by_priority.entry(ticket.priority.to_string()).or_default() += 1;
            *by_category.entry(ticket.category.to_string()).or_default() += 1;
        }

        counts.by_priority = by_priority.into_iter().collect();
        counts.by_category = by_category.into_iter().collect();
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let a = repo.create_ticket(NewTicket::new("a", "a")).await.unwrap();
        let b = repo.create_ticket(NewTicket::new("b", "b")).await.unwrap();
        assert_eq!(a.id, TicketId(1));
        assert_eq!(b.id, TicketId(2));
        assert_eq!(repo.ticket_count(), 2);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let repo = LocalRepository::new();
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let old = repo.insert_ticket_at(NewTicket::new("old", "x"), t0);
        let new =
            repo.insert_ticket_at(NewTicket::new("new", "x"), t0 + chrono::Duration::hours(2));
        let tie = repo.insert_ticket_at(NewTicket::new("tie", "x"), t0);

        let ids: Vec<_> = repo
            .list_tickets(&TicketFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![new.id, tie.id, old.id]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_ticket() {
        let repo = LocalRepository::new();
        let err = repo
            .update_ticket(TicketId(9), TicketChanges::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.delete_ticket(TicketId(9)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.create_ticket(NewTicket::new("a", "b")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    }

    #[tokio::test]
    async fn test_counts_group_by_stored_values() {
        let repo = LocalRepository::new();
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        repo.insert_ticket_at(
            NewTicket::new("a", "a").with_priority(Priority::High).with_category(Category::Billing),
            t0,
        );
        repo.insert_ticket_at(
            NewTicket::new("b", "b").with_priority(Priority::High).with_status("resolved"),
            t0 + chrono::Duration::days(3),
        );

        let counts = repo.ticket_counts().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.open, 1);
        assert_eq!(counts.first_created_at, Some(t0));
        assert_eq!(counts.last_created_at, Some(t0 + chrono::Duration::days(3)));
        assert_eq!(counts.by_priority, vec![("high".to_string(), 2)]);

        let mut categories = counts.by_category.clone();
        categories.sort();
        assert_eq!(
            categories,
            vec![("billing".to_string(), 1), ("general".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_clear_resets_ids() {
        let repo = LocalRepository::new();
        repo.create_ticket(NewTicket::new("a", "a")).await.unwrap();
        repo.clear();
        assert_eq!(repo.ticket_count(), 0);
        let t = repo.create_ticket(NewTicket::new("b", "b")).await.unwrap();
        assert_eq!(t.id, TicketId(1));
    }
}
