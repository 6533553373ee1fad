//! Suggested resolutions for a ticket description.

use tracing::error;

use super::LOG_DESCRIPTION_CHARS;
use crate::llm::{truncate_for_log, LlmClient, LlmError};

/// Text returned to the client when the model cannot be reached.
pub const FALLBACK_SOLUTION: &str = "Unable to connect to the AI mainframe at this time.";

fn solution_prompt(description: &str) -> String {
    format!(
        r#"You are a Technical Support AI. Read the following user issue:
"{description}"

Instructions:
1. If the issue is a personal problem, a joke, a philosophical question, or completely unrelated to IT/software support: Reply in a very humorous, witty, and slightly sarcastic way. Acknowledge their funny issue, but gently remind them that you are strictly an IT Support AI and can only fix servers, bugs, and software.
2. If it IS a valid technical/software/business issue: Provide a strictly professional, concise, 2-sentence technical solution. Do not use humor here."#
    )
}

/// Ask the model for a short solution. The reply is trimmed.
///
/// Errors are logged here; the caller decides how to answer.
pub async fn suggest_solution(
    llm: &dyn LlmClient,
    description: &str,
) -> Result<String, LlmError> {
    match llm.generate(&solution_prompt(description)).await {
        Ok(reply) => Ok(reply.trim().to_string()),
        Err(e) => {
            error!(
                endpoint = "suggest_solution",
                description = %truncate_for_log(description, LOG_DESCRIPTION_CHARS),
                error = %e,
                "Solution request failed"
            );
            Err(e)
        }
    }
}
