use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The inbound scan request was malformed; nothing was sent upstream.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The inference call failed or its reply could not be read.
    #[error("Service error: {0}")]
    ServiceError(String),
}
