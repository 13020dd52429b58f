//! Unified error handling for bookworm-core

use thiserror::Error;

/// Core error type for bookworm-core
///
/// The first six variants are the client's error taxonomy; the rest are
/// ambient failures (local storage, configuration, decoding).
#[derive(Error, Debug)]
pub enum Error {
    /// Form constraint violated before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// 401-class: invalid credentials, missing or expired token
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// 403-class: role-gated action refused by the server
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// 404-class
    #[error("Not found: {0}")]
    NotFound(String),

    /// Batch action where some items failed
    #[error("{failed} of {} items failed", .succeeded + .failed)]
    PartialBatch { succeeded: usize, failed: usize },

    /// Transport-level failure, no interpretable response
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-success HTTP status
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for bookworm-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Authentication(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Error::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Map a non-success HTTP status and its body to the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        match status {
            401 => Error::Authentication(message),
            403 => Error::Authorization(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// True for errors caught on the client before any request went out.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Network("Request timed out".to_string())
        } else if err.is_connect() {
            Error::Network("Connection failed".to_string())
        } else if let Some(status) = err.status() {
            Error::from_status(status.as_u16(), "")
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Every field message, ordered by field name so the text is stable.
impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                let field = field.to_string();
                list.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    (field.clone(), message)
                })
            })
            .collect();
        messages.sort();
        messages.dedup();

        let text: Vec<String> = messages.into_iter().map(|(_, m)| m).collect();
        Error::Validation(text.join("; "))
    }
}

/// Pull a human readable message out of an error body.
///
/// The API answers errors either as plain text or as a JSON object with a
/// `message`, `title` or `detail` field.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "title", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
        if let Some(text) = value.as_str() {
            return Some(text.to_string());
        }
    }

    Some(trimmed.chars().take(500).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::auth("Invalid token");
        assert_eq!(err.to_string(), "Authentication error: Invalid token");
    }

    #[test]
    fn test_partial_batch_display() {
        let err = Error::PartialBatch { succeeded: 2, failed: 1 };
        assert_eq!(err.to_string(), "1 of 3 items failed");
    }

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(Error::from_status(401, ""), Error::Authentication(_)));
        assert!(matches!(Error::from_status(403, ""), Error::Authorization(_)));
        assert!(matches!(Error::from_status(404, ""), Error::NotFound(_)));
        assert!(matches!(
            Error::from_status(500, ""),
            Error::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_from_status_reads_json_message() {
        let err = Error::from_status(404, r#"{"message":"Book 7 not found"}"#);
        assert_eq!(err.to_string(), "Not found: Book 7 not found");
    }

    #[test]
    fn test_from_status_plain_text_body() {
        let err = Error::from_status(409, "Concurrency conflict");
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Concurrency conflict");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_empty_body_uses_code() {
        let err = Error::from_status(403, "   ");
        assert_eq!(err.to_string(), "Authorization error: HTTP 403");
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::validation("Name is required").is_validation());
        assert!(!Error::network("down").is_validation());
    }

    #[test]
    fn test_validation_errors_sorted_by_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut name = validator::ValidationError::new("length");
        name.message = Some("Name is required".into());
        errors.add("name", name);
        errors.add("email", validator::ValidationError::new("email"));

        match Error::from(errors) {
            Error::Validation(msg) => assert_eq!(msg, "email is invalid; Name is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
