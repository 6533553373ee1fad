use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::tickets;
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Category, NewTicket, Priority, Ticket, TicketChanges, TicketId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TicketRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TicketRow {
    pub fn into_ticket(self) -> RepositoryResult<Ticket> {
        let id = TicketId(self.id);
        let corrupt = |column: &str, msg: String| RepositoryError::corrupt_row(id, column, msg);
        let category = self
            .category
            .parse::<Category>()
            .map_err(|e| corrupt("category", e))?;
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|e| corrupt("priority", e))?;

        Ok(Ticket {
            id,
            title: self.title,
            description: self.description,
            category,
            priority,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
}

impl From<NewTicket> for NewTicketRow {
    fn from(ticket: NewTicket) -> Self {
        Self {
            title: ticket.title,
            description: ticket.description,
            category: ticket.category.to_string(),
            priority: ticket.priority.to_string(),
            status: ticket.status,
        }
    }
}

/// Column updates; `None` fields are skipped by Diesel.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct TicketChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl From<TicketChanges> for TicketChangeset {
    fn from(changes: TicketChanges) -> Self {
        Self {
            title: changes.title,
            description: changes.description,
            category: changes.category.map(|c| c.to_string()),
            priority: changes.priority.map(|p| p.to_string()),
            status: changes.status,
        }
    }
}
