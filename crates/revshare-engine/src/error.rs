//! Engine Error Types

use revshare_stripe::StripeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the lifecycle manager and the distribution path
#[derive(Error, Debug)]
pub enum EngineError {
    /// A request was missing or carried malformed fields; never retried
    #[error("{0}")]
    Validation(String),

    /// The referenced resource does not exist upstream; not retried
    #[error("{0} not found")]
    NotFound(String),

    /// The payment platform returned a failure
    #[error(transparent)]
    Upstream(#[from] StripeError),

    /// An offering creation step failed before any companion object existed
    #[error("offering creation failed at step `{step}`: {source}")]
    OfferingFailed {
        step: &'static str,
        #[source]
        source: StripeError,
    },

    /// An offering creation step failed after the dynamic companion product
    /// was created. The platform performs no rollback; the orphaned product
    /// id is named so an operator can clean up or retry manually.
    #[error(
        "offering creation failed at step `{step}`; dynamic product `{dynamic_product_id}` \
         was already created and requires manual cleanup: {source}"
    )]
    OfferingIncomplete {
        step: &'static str,
        dynamic_product_id: String,
        #[source]
        source: StripeError,
    },
}

impl EngineError {
    /// Check if the caller can safely retry the failed operation
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Upstream(source) | EngineError::OfferingFailed { source, .. } => {
                source.is_retryable()
            }
            // Retrying would create a second orphaned dynamic product.
            EngineError::OfferingIncomplete { .. } => false,
            EngineError::Validation(_) | EngineError::NotFound(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revshare_stripe::ApiErrorDetail;

    #[test]
    fn test_offering_incomplete_names_orphaned_product() {
        let err = EngineError::OfferingIncomplete {
            step: "dynamic_price",
            dynamic_product_id: "prod_dyn_123".into(),
            source: StripeError::Api {
                status: 400,
                detail: ApiErrorDetail::default(),
                body: String::new(),
            },
        };

        assert!(err.to_string().contains("prod_dyn_123"));
        assert!(err.to_string().contains("dynamic_price"));
    }

    #[test]
    fn test_validation_is_never_retryable() {
        assert!(!EngineError::Validation("name is required".into()).is_retryable());
    }
}
