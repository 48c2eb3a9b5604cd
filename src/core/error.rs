//! Error Types
//!
//! Every fallible operation in the checker returns [`CheckResult`]. Errors carry
//! miette diagnostic codes so the CLI can render them through the report hook
//! installed by [`crate::core::logging::init`].

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the checker.
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors produced while checking a submission.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    /// The submitted text was empty or whitespace only. Reported as a warning;
    /// no service is called.
    #[error("Please enter some text.")]
    #[diagnostic(
        code("WRITERIGHT::EMPTY_INPUT"),
        help("Pass the text as an argument, with --file, or on stdin")
    )]
    EmptyInput,

    /// A detector or the rewrite model failed to respond.
    #[error("{service} service unavailable: {message}")]
    #[diagnostic(
        code("WRITERIGHT::SERVICE_UNAVAILABLE"),
        help("Check that the backend is running and reachable, then try again")
    )]
    ServiceUnavailable { service: String, message: String },

    /// Configuration could not be read, parsed, or resolved.
    #[error("Configuration error: {0}")]
    #[diagnostic(code("WRITERIGHT::CONFIG"))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code("WRITERIGHT::IO"))]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Build a [`CheckError::ServiceUnavailable`] for the named service.
    pub fn unavailable(service: impl Into<String>, message: impl ToString) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error should be shown as a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}
