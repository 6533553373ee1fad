//! Tests for reading the model client configuration from the environment.

mod support;

use std::time::Duration;

use ticket_desk::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

const KEYS: [&str; 4] = [
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_BASE_URL",
    "LLM_TIMEOUT_SECS",
];

fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
    KEYS.iter().map(|k| (*k, None)).collect()
}

#[test]
fn test_defaults_without_env() {
    support::with_scoped_env(&cleared(), || {
        let config = LlmConfig::from_env();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    });
}

#[test]
fn test_values_from_env() {
    support::with_scoped_env(
        &[
            ("GEMINI_API_KEY", Some("abc123")),
            ("GEMINI_MODEL", Some("gemini-2.0-pro")),
            ("GEMINI_BASE_URL", Some("http://localhost:9000/")),
            ("LLM_TIMEOUT_SECS", Some("5")),
        ],
        || {
            let config = LlmConfig::from_env();
            assert_eq!(config.api_key.as_deref(), Some("abc123"));
            assert_eq!(config.model, "gemini-2.0-pro");
            assert_eq!(config.base_url, "http://localhost:9000");
            assert_eq!(config.timeout, Duration::from_secs(5));
        },
    );
}

#[test]
fn test_blank_key_counts_as_missing() {
    let mut changes = cleared();
    changes[0] = ("GEMINI_API_KEY", Some("  "));
    support::with_scoped_env(&changes, || {
        assert!(!LlmConfig::from_env().has_api_key());
    });
}

#[test]
fn test_invalid_timeout_uses_default() {
    let mut changes = cleared();
    changes[3] = ("LLM_TIMEOUT_SECS", Some("soon"));
    support::with_scoped_env(&changes, || {
        assert_eq!(LlmConfig::from_env().timeout, Duration::from_secs(30));
    });
}

#[test]
fn test_zero_timeout_uses_default() {
    let mut changes = cleared();
    changes[3] = ("LLM_TIMEOUT_SECS", Some("0"));
    support::with_scoped_env(&changes, || {
        assert_eq!(LlmConfig::from_env().timeout, Duration::from_secs(30));
    });
}
