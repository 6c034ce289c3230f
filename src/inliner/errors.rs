//! Error types for the inlining pipeline
//!
//! Every pipeline failure is terminal: the remaining stages are skipped and
//! the error propagates to the caller. There is no retry at any stage.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type InlineResult<T> = Result<T, BuildError>;

/// Error taxonomy for the build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    /// A precondition on the invocation failed. Raised synchronously, before
    /// any I/O is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The source document could not be materialized.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// An external stylesheet reference or the base path could not be resolved.
    #[error("failed to resolve external stylesheet '{reference}': {message}")]
    Resolution { reference: String, message: String },

    /// The cascade capability rejected the combined CSS or markup.
    #[error("css cascade rejected input: {0}")]
    Cascade(String),
}

impl BuildError {
    pub(crate) fn resolution(
        reference: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        BuildError::Resolution {
            reference: reference.into(),
            message: message.to_string(),
        }
    }
}

impl From<css_inline::InlineError> for BuildError {
    fn from(error: css_inline::InlineError) -> Self {
        BuildError::Cascade(error.to_string())
    }
}
