//! Boundary validation for ticket payloads.
//!
//! Raw request bodies are deserialized into [`TicketPayload`] with every field
//! optional, then checked here so that missing, blank, over-long and
//! out-of-range values are all reported per field in one pass.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ticket::{
    Category, NewTicket, Priority, TicketChanges, MAX_STATUS_LEN, MAX_TITLE_LEN, OPEN_STATUS,
};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Ticket body as received from a client. Read-only fields (`id`, `created_at`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Validate a payload for creation, filling defaults for the optional fields.
pub fn validate_new_ticket(payload: TicketPayload) -> Result<NewTicket, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required_text(&mut errors, "title", payload.title, MAX_TITLE_LEN);
    let description = required_text(&mut errors, "description", payload.description, usize::MAX);
    let category = choice::<Category>(&mut errors, "category", payload.category);
    let priority = choice::<Priority>(&mut errors, "priority", payload.priority);
    let status = optional_text(&mut errors, "status", payload.status, MAX_STATUS_LEN);

    errors.into_result(NewTicket {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        category: category.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        status: status.unwrap_or_else(|| OPEN_STATUS.to_string()),
    })
}

/// Validate a payload for update.
///
/// A full update (`partial == false`) requires `title` and `description` like
/// creation does; a partial update only checks the fields that are present.
pub fn validate_changes(
    payload: TicketPayload,
    partial: bool,
) -> Result<TicketChanges, FieldErrors> {
    let mut errors = FieldErrors::new();

    let (title, description) = if partial {
        (
            optional_text(&mut errors, "title", payload.title, MAX_TITLE_LEN),
            optional_text(&mut errors, "description", payload.description, usize::MAX),
        )
    } else {
        (
            required_text(&mut errors, "title", payload.title, MAX_TITLE_LEN),
            required_text(&mut errors, "description", payload.description, usize::MAX),
        )
    };
    let category = choice::<Category>(&mut errors, "category", payload.category);
    let priority = choice::<Priority>(&mut errors, "priority", payload.priority);
    let status = optional_text(&mut errors, "status", payload.status, MAX_STATUS_LEN);

    errors.into_result(TicketChanges {
        title,
        description,
        category,
        priority,
        status,
    })
}

/// Extract a required, non-blank free-text input such as a classification description.
pub fn required_description(value: Option<&str>) -> Result<&str, FieldErrors> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(FieldErrors::single("description", BLANK)),
        None => Err(FieldErrors::single("description", REQUIRED)),
    }
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        some => optional_text(errors, field, some, max_len),
    }
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    let value = value?;
    if value.trim().is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
        return None;
    }
    Some(value)
}

fn choice<T>(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<T>
where
    T: std::str::FromStr<Err = String>,
{
    match value?.parse::<T>() {
        Ok(v) => Some(v),
        Err(msg) => {
            errors.add(field, msg);
            None
        }
    }
}
