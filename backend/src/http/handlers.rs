//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    Classification, DescriptionRequest, HealthResponse, SolutionResponse, Ticket,
    TicketFilterParams, TicketPayload, TicketStats,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::validation::required_description;
use crate::models::{TicketFilter, TicketId};
use crate::services::{
    classify_description, suggest_solution as request_solution, FALLBACK_SOLUTION,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn ticket_id(path: Result<Path<i64>, PathRejection>) -> Result<TicketId, AppError> {
    let Path(id) = path?;
    Ok(TicketId(id))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = payload?;
    Ok(value)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Liveness check that also reports whether the ticket store answers.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Ticket CRUD
// =============================================================================

/// GET /api/tickets/
///
/// Newest first. Supports `category`, `priority`, `status` and `search`.
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(params): Query<TicketFilterParams>,
) -> HandlerResult<Vec<Ticket>> {
    let filter = TicketFilter::try_from(params)?;
    let tickets = db_services::list_tickets(state.repository.as_ref(), &filter).await?;
    Ok(Json(tickets))
}

/// POST /api/tickets/
pub async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<TicketPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let ticket = db_services::create_ticket(state.repository.as_ref(), body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/tickets/{id}/
pub async fn get_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Ticket> {
    let ticket = db_services::get_ticket(state.repository.as_ref(), ticket_id(path)?).await?;
    Ok(Json(ticket))
}

/// PUT /api/tickets/{id}/
pub async fn replace_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TicketPayload>, JsonRejection>,
) -> HandlerResult<Ticket> {
    let id = ticket_id(path)?;
    let ticket = db_services::replace_ticket(state.repository.as_ref(), id, body(payload)?).await?;
    Ok(Json(ticket))
}

/// PATCH /api/tickets/{id}/
pub async fn patch_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TicketPayload>, JsonRejection>,
) -> HandlerResult<Ticket> {
    let id = ticket_id(path)?;
    let ticket = db_services::patch_ticket(state.repository.as_ref(), id, body(payload)?).await?;
    Ok(Json(ticket))
}

/// DELETE /api/tickets/{id}/
pub async fn delete_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    db_services::delete_ticket(state.repository.as_ref(), ticket_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Reporting
// =============================================================================

/// GET /api/tickets/stats/
pub async fn ticket_stats(State(state): State<AppState>) -> HandlerResult<TicketStats> {
    let stats = db_services::ticket_stats(state.repository.as_ref()).await?;
    Ok(Json(stats))
}

// =============================================================================
// Model-backed assistants
// =============================================================================

/// POST /api/tickets/classify/
///
/// Always 200 once the description is valid; upstream failures yield the defaults.
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> HandlerResult<Classification> {
    let request = body(payload)?;
    let description = required_description(request.description.as_deref())?;
    Ok(Json(classify_description(state.llm.as_ref(), description).await))
}

/// POST /api/tickets/suggest_solution/
///
/// Upstream failures answer 500 with a fixed fallback message in the usual body shape.
pub async fn suggest_solution(
    State(state): State<AppState>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = body(payload)?;
    let description = required_description(request.description.as_deref())?;

    let response = match request_solution(state.llm.as_ref(), description).await {
        Ok(solution) => Json(SolutionResponse { solution }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SolutionResponse {
                solution: FALLBACK_SOLUTION.to_string(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}
