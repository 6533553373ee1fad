//! Recovering structured data from free-form model output.

use super::LlmError;
use crate::models::Classification;

/// Strip markdown code fences and narrow the text to its outermost JSON object.
///
/// Removes every ```` ```json ```` and ```` ``` ```` marker, trims, then keeps the
/// slice from the first `{` to the last `}` when both exist in that order.
/// Otherwise the trimmed text is returned unchanged.
pub fn extract_json_object(text: &str) -> String {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Parse a classification reply.
///
/// Both `suggested_category` and `suggested_priority` must be present as strings.
pub fn parse_classification(text: &str) -> Result<Classification, LlmError> {
    serde_json::from_str(&extract_json_object(text)).map_err(|e| LlmError::Decode(e.to_string()))
}
