//! # Ticket Desk
//!
//! Support-ticket tracking service with model-assisted triage.
//!
//! Tickets are stored through a repository abstraction (in-memory or
//! PostgreSQL), filtered and aggregated by the service layer, and exposed as
//! a REST API via Axum. Two endpoints consult a hosted language model: one
//! suggests a category and priority for a description, the other drafts a
//! short solution.
//!
//! ## Architecture
//!
//! - [`api`]: types that cross the HTTP boundary
//! - [`models`]: ticket entity, filters, validation
//! - [`db`]: repository traits, backends, factory and the ticket service layer
//! - [`services`]: stats report, classification and solution adapters
//! - [`llm`]: language model client
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod llm;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
