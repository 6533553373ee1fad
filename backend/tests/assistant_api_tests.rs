//! Tests for the classification and solution endpoints against a scripted model.
#![cfg(feature = "http-server")]

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

use support::http::{app_with, send};
use support::StubLlm;
use ticket_desk::db::repositories::LocalRepository;

const CLASSIFY: &str = "/api/tickets/classify/";
const SOLUTION: &str = "/api/tickets/suggest_solution/";

// =========================================================
// Classification
// =========================================================

#[tokio::test]
async fn test_classify_rejects_missing_description_without_calling_model() {
    let llm = StubLlm::replying("{}");
    let app = app_with(&LocalRepository::new(), llm.clone());

    for body in [json!({}), json!({"description": ""}), json!({"description": "   "})] {
        let (status, response) = send(&app, Method::POST, CLASSIFY, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["fields"]["description"].is_array());
    }
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_classify_parses_fenced_reply() {
    let llm = StubLlm::replying(
        "```json\n{\"suggested_category\": \"billing\", \"suggested_priority\": \"high\"}\n```",
    );
    let app = app_with(&LocalRepository::new(), llm.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        CLASSIFY,
        Some(json!({"description": "I was charged twice for my subscription"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"suggested_category": "billing", "suggested_priority": "high"})
    );
    assert_eq!(llm.calls(), 1);

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("I was charged twice for my subscription"));
    assert!(prompt.contains("Return ONLY JSON"));
}

#[tokio::test]
async fn test_classify_falls_back_on_garbage() {
    let llm = StubLlm::replying("I'm not sure what you mean.");
    let app = app_with(&LocalRepository::new(), llm);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets/classify",
        Some(json!({"description": "something"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"suggested_category": "general", "suggested_priority": "medium"})
    );
}

#[tokio::test]
async fn test_classify_falls_back_on_upstream_error() {
    let llm = StubLlm::failing();
    let app = app_with(&LocalRepository::new(), llm.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        CLASSIFY,
        Some(json!({"description": "server down"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_category"], "general");
    assert_eq!(body["suggested_priority"], "medium");
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_classify_passes_unknown_values_through() {
    let llm = StubLlm::replying(
        r#"{"suggested_category": "hardware", "suggested_priority": "urgent"}"#,
    );
    let app = app_with(&LocalRepository::new(), llm);

    let (status, body) = send(
        &app,
        Method::POST,
        CLASSIFY,
        Some(json!({"description": "Keyboard on fire"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_category"], "hardware");
    assert_eq!(body["suggested_priority"], "urgent");
}

// =========================================================
// Solution
// =========================================================

#[tokio::test]
async fn test_solution_returns_trimmed_text() {
    let llm = StubLlm::replying("\n  Clear the DNS cache. Then restart the browser.  \n");
    let app = app_with(&LocalRepository::new(), llm.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        SOLUTION,
        Some(json!({"description": "Pages fail to load"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"solution": "Clear the DNS cache. Then restart the browser."})
    );
    assert!(llm.last_prompt().unwrap().contains("Technical Support AI"));
}

#[tokio::test]
async fn test_solution_upstream_error_is_500_with_fallback() {
    let app = app_with(&LocalRepository::new(), StubLlm::failing());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tickets/suggest_solution",
        Some(json!({"description": "Pages fail to load"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"solution": "Unable to connect to the AI mainframe at this time."})
    );
}

#[tokio::test]
async fn test_solution_requires_description() {
    let llm = StubLlm::replying("unused");
    let app = app_with(&LocalRepository::new(), llm.clone());

    let (status, _) = send(&app, Method::POST, SOLUTION, Some(json!({"description": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(llm.calls(), 0);
}
