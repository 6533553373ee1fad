//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Register `path` both with and without a trailing slash.
fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new();
    api = route_both(
        api,
        "/tickets",
        get(handlers::list_tickets).post(handlers::create_ticket),
    );
    // Static segments win over `{id}` in the matcher.
    api = route_both(api, "/tickets/stats", get(handlers::ticket_stats));
    api = route_both(api, "/tickets/classify", post(handlers::classify));
    api = route_both(
        api,
        "/tickets/suggest_solution",
        post(handlers::suggest_solution),
    );
    api = route_both(
        api,
        "/tickets/{id}",
        get(handlers::get_ticket)
            .put(handlers::replace_ticket)
            .patch(handlers::patch_ticket)
            .delete(handlers::delete_ticket),
    );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use crate::llm::{GeminiClient, LlmClient, LlmConfig};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let llm = Arc::new(GeminiClient::new(LlmConfig::default()).unwrap()) as Arc<dyn LlmClient>;
        let _router = create_router(AppState::new(repo, llm));
    }
}
