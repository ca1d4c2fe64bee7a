//! Error taxonomy for the content pipeline

use std::io;

use thiserror::Error;

use crate::templates::TemplateError;

/// Failure classification handed to the exception-content resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStatus {
    /// No content source could provide the path.
    NotFound,
    /// Any other failure.
    Internal,
}

/// All errors that can arise from resolving and rendering content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Path failed validation; never triggers exception-content fallback.
    #[error("invalid character in content path `{0}`")]
    InvalidPath(String),

    /// No registered source provides the path.
    #[error("content not found: `{0}`")]
    NotFound(String),

    /// An opened source could not be read to the end.
    #[error("failed to read `{path}`")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The template catalog failed for a reason other than a missing layout.
    #[error("rendering with template `{name}` failed")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
}

impl ContentError {
    /// Status classification used when picking an exception document.
    pub fn status(&self) -> FailureStatus {
        match self {
            ContentError::NotFound(_) => FailureStatus::NotFound,
            _ => FailureStatus::Internal,
        }
    }
}
