//! Ticket entity and the value types that travel with it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;

crate::define_id_type!(i64, TicketId);

crate::define_choice_enum!(Category, "category" {
    Billing => "billing",
    Technical => "technical",
    Account => "account",
    General => "general",
});

crate::define_choice_enum!(Priority, "priority" {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Status assigned to new tickets and counted as "open" by the stats report.
pub const OPEN_STATUS: &str = "open";

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum status length in characters.
pub const MAX_STATUS_LEN: usize = 20;

/// A support ticket as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a ticket. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: String,
}

impl NewTicket {
    /// Ticket with default category, priority and status.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: Category::default(),
            priority: Priority::default(),
            status: OPEN_STATUS.to_string(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Validated set of field changes. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<String>,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Apply the changes in place. Identity and creation time are never touched.
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(title) = &self.title {
            ticket.title = title.clone();
        }
        if let Some(description) = &self.description {
            ticket.description = description.clone();
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = &self.status {
            ticket.status = status.clone();
        }
    }
}

/// Raw listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketFilterParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Typed listing filter. Every present field must hold; absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.category.is_some_and(|c| c != ticket.category) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }
        if let Some(status) = &self.status {
            if &ticket.status != status {
                return false;
            }
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                ticket.title.to_lowercase().contains(&needle)
                    || ticket.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

impl TryFrom<TicketFilterParams> for TicketFilter {
    type Error = FieldErrors;

    /// Empty values count as absent; unknown category or priority values are rejected.
    fn try_from(params: TicketFilterParams) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let category = match non_empty(params.category) {
            Some(raw) => match raw.parse::<Category>() {
                Ok(c) => Some(c),
                Err(msg) => {
                    errors.add("category", msg);
                    None
                }
            },
            None => None,
        };
        let priority = match non_empty(params.priority) {
            Some(raw) => match raw.parse::<Priority>() {
                Ok(p) => Some(p),
                Err(msg) => {
                    errors.add("priority", msg);
                    None
                }
            },
            None => None,
        };

        errors.into_result(TicketFilter {
            category,
            priority,
            status: non_empty(params.status),
            search: non_empty(params.search),
        })
    }
}

/// Raw aggregates read from the store; turned into [`TicketStats`] by the stats service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketCounts {
    pub total: i64,
    pub open: i64,
    pub first_created_at: Option<DateTime<Utc>>,
    pub last_created_at: Option<DateTime<Utc>>,
    /// Grouped counts keyed by the stored priority string.
    pub by_priority: Vec<(String, i64)>,
    /// Grouped counts keyed by the stored category string.
    pub by_category: Vec<(String, i64)>,
}

/// Aggregate report served by `GET /api/tickets/stats/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub avg_tickets_per_day: f64,
    pub priority_breakdown: BTreeMap<String, i64>,
    pub category_breakdown: BTreeMap<String, i64>,
}

/// Category and priority suggested for a description.
///
/// Values are kept as the model returned them, even outside the known choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub suggested_category: String,
    pub suggested_priority: String,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            suggested_category: Category::default().to_string(),
            suggested_priority: Priority::default().to_string(),
        }
    }
}
