//! Stripe API Error Types

use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StripeError>;

/// Structured error detail from a Stripe error response body.
///
/// Stripe wraps failures as `{"error": {"type": ..., "code": ...,
/// "param": ..., "message": ...}}`; every field is optional in practice.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    /// Error category, e.g. `invalid_request_error`
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    /// Machine-readable code, e.g. `resource_missing`
    pub code: Option<String>,

    /// The request parameter the error relates to
    pub param: Option<String>,

    /// Human-readable message
    pub message: Option<String>,
}

impl std::fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type={} code={} param={} message={}",
            self.error_type.as_deref().unwrap_or("-"),
            self.code.as_deref().unwrap_or("-"),
            self.param.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("-"),
        )
    }
}

/// Failures raised by the Stripe gateway
#[derive(Error, Debug)]
pub enum StripeError {
    /// Stripe returned a non-success status. The raw body is kept verbatim
    /// so operators see exactly what the platform reported.
    #[error("Stripe API error (status {status}): {detail} body={body}")]
    Api {
        status: u16,
        detail: ApiErrorDetail,
        body: String,
    },

    /// The referenced resource does not exist upstream
    #[error("{0} not found on Stripe")]
    NotFound(String),

    /// The request never produced a response (connect/timeout/TLS)
    #[error("Stripe request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response could not be decoded into the expected shape
    #[error("failed to decode Stripe response for {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl StripeError {
    /// Check if this error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            StripeError::Network(_) => true,
            StripeError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_body() {
        let err = StripeError::Api {
            status: 402,
            detail: ApiErrorDetail {
                error_type: Some("invalid_request_error".into()),
                code: Some("balance_insufficient".into()),
                param: None,
                message: Some("Insufficient funds".into()),
            },
            body: r#"{"error":{"code":"balance_insufficient"}}"#.into(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("balance_insufficient"));
        assert!(rendered.contains(r#"{"error""#));
    }

    #[test]
    fn test_retryable_classification() {
        let server_err = StripeError::Api {
            status: 500,
            detail: ApiErrorDetail::default(),
            body: String::new(),
        };
        assert!(server_err.is_retryable());

        let not_found = StripeError::NotFound("product prod_x".into());
        assert!(!not_found.is_retryable());
    }
}
