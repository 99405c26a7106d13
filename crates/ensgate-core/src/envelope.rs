use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub text: String,
}

/// Uniform result returned by every operation.
///
/// Error envelopes always carry the human-readable message in
/// `content[0].text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text.into(), false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text.into(), true)
    }

    fn new(text: String, is_error: bool) -> Self {
        Self {
            content: vec![Content {
                kind: ContentType::Text,
                text,
            }],
            is_error,
        }
    }

    /// First text block; empty for a malformed envelope.
    pub fn message(&self) -> &str {
        self.content
            .first()
            .map(|content| content.text.as_str())
            .unwrap_or_default()
    }
}

/// Wraps a handler outcome, classifying failures under `operation_label`.
pub fn normalize(result: Result<String, ResolveError>, operation_label: &str) -> ToolResponse {
    match result {
        Ok(text) => ToolResponse::text(text),
        Err(error) => ToolResponse::error(classify(&error, operation_label)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_protocol_field_names() {
        let value = serde_json::to_value(ToolResponse::text("hello")).expect("serializable");

        assert_eq!(
            value,
            json!({ "content": [{ "type": "text", "text": "hello" }], "isError": false })
        );
    }

    #[test]
    fn normalize_success_keeps_text() {
        let response = normalize(Ok(String::from("Could not resolve a.eth to an address.")), "x");

        assert!(!response.is_error);
        assert_eq!(response.message(), "Could not resolve a.eth to an address.");
    }

    #[test]
    fn normalize_failure_classifies_error() {
        let response = normalize(Err(ResolveError::unclassified("boom")), "resolving name");

        assert!(response.is_error);
        assert_eq!(response.content.len(), 1);
        assert_eq!(response.message(), "Error during resolving name: boom");
    }
}
