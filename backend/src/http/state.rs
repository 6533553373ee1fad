//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::llm::LlmClient;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ticket store
    pub repository: Arc<dyn FullRepository>,
    /// Model client used by the classification and solution endpoints
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    /// Create a new application state with the given store and model client.
    pub fn new(repository: Arc<dyn FullRepository>, llm: Arc<dyn LlmClient>) -> Self {
        Self { repository, llm }
    }
}
