//! Category and priority suggestions.

use tracing::{debug, warn};

use super::LOG_DESCRIPTION_CHARS;
use crate::llm::{parse_classification, truncate_for_log, LlmClient};
use crate::models::{Category, Classification, Priority};

fn classification_prompt(description: &str) -> String {
    format!(
        r#"Analyze the support ticket description: "{description}"
Categories: billing, technical, account, general
Priorities: low, medium, high, critical
Return ONLY JSON: {{"suggested_category": "...", "suggested_priority": "..."}}"#
    )
}

/// Ask the model for a category and priority.
///
/// Never fails: any upstream or decoding error is logged and answered with
/// the defaults (`general`, `medium`).
pub async fn classify_description(llm: &dyn LlmClient, description: &str) -> Classification {
    let result = match llm.generate(&classification_prompt(description)).await {
        Ok(reply) => parse_classification(&reply),
        Err(e) => Err(e),
    };

    match result {
        Ok(classification) => {
            if classification.suggested_category.parse::<Category>().is_err()
                || classification.suggested_priority.parse::<Priority>().is_err()
            {
                debug!(
                    "Model suggested values outside the known choices: {:?}",
                    classification
                );
            }
            classification
        }
        Err(e) => {
            warn!(
                endpoint = "classify",
                description = %truncate_for_log(description, LOG_DESCRIPTION_CHARS),
                error = %e,
                "Classification failed, using defaults"
            );
            Classification::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;

    struct Scripted(Option<&'static str>);

    #[async_trait]
    impl LlmClient for Scripted {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.map(str::to_string).ok_or(LlmError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_fenced_reply_is_parsed() {
        let llm = Scripted(Some(
            "```json\n{\"suggested_category\": \"billing\", \"suggested_priority\": \"high\"}\n```",
        ));
        let result = classify_description(&llm, "Charged twice").await;
        assert_eq!(result.suggested_category, "billing");
        assert_eq!(result.suggested_priority, "high");
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_defaults() {
        let expected = Classification {
            suggested_category: "general".to_string(),
            suggested_priority: "medium".to_string(),
        };
        assert_eq!(classify_description(&Scripted(None), "x").await, expected);
        assert_eq!(
            classify_description(&Scripted(Some("no idea")), "x").await,
            expected
        );
    }

    #[test]
    fn test_prompt_embeds_description_and_choices() {
        let prompt = classification_prompt("Charged twice this month");
        assert!(prompt.contains("\"Charged twice this month\""));
        assert!(prompt.contains("billing, technical, account, general"));
        assert!(prompt.contains("low, medium, high, critical"));
        assert!(prompt.contains(r#"{"suggested_category": "...", "suggested_priority": "..."}"#));
    }
}
