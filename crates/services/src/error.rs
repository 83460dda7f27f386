//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::SessionError;

/// Errors emitted by question providers.
///
/// Safety-filtered or empty remote content is not an error: providers fall
/// back to templates internally. These variants cover the cases that must
/// reach the caller, all of which are retryable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("model returned no usable text")]
    EmptyResponse,
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by credential validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("no API credential configured")]
    Missing,
    #[error("credential rejected with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("credential failed validation: {0}")]
    Invalid(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the practice loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterviewError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
