//! Standardized API response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Collection wrapper: `{"data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain confirmation: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Confirmation returned by a category update, carrying the fresh record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdatedResponse<T> {
    pub message: String,
    pub category: T,
}

/// Error payload shared by every failing request.
///
/// `errors` is only present for validation failures and maps each field to
/// its messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = Some(errors);
        self
    }

    // Common error constructors
    pub fn unauthorized() -> Self {
        Self::new("Unauthenticated.")
    }

    pub fn validation(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self::new("The given data was invalid.").with_errors(errors)
    }

    pub fn internal_error() -> Self {
        Self::new("Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_payload_is_message_only() {
        let json = serde_json::to_value(ErrorResponse::new("Post not found")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Post not found"}));
    }

    #[test]
    fn test_validation_payload_lists_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("title".to_string(), vec!["The title field is required.".to_string()]);

        let json = serde_json::to_value(ErrorResponse::validation(errors)).unwrap();
        assert_eq!(json["message"], "The given data was invalid.");
        assert_eq!(json["errors"]["title"][0], "The title field is required.");
    }
}
