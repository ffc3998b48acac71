//! Load error types.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors raised while loading a module
///
/// Every variant is routed through [`Diagnostics`](crate::Diagnostics);
/// callers only see it as an `Err` when the effective error level is fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The repository list is empty
    #[error("No repositories to search for {identifier}")]
    NoRepositories { identifier: String },

    /// Every repository failed; carries the last attempt
    #[error("File not found: {url}")]
    NotFound {
        identifier: String,
        url: String,
        #[source]
        source: FetchError,
    },

    /// Source failed to evaluate or defined nothing under the identifier
    #[error("Could not create namespace[{identifier}]: {reason}")]
    Namespace { identifier: String, reason: String },

    /// Module requested again while its own load is in progress
    #[error("Circular load of {0}")]
    Circular(String),

    /// Message reported directly by the host
    #[error("{0}")]
    Reported(String),
}

impl LoadError {
    /// Identifier of the module that failed, if any
    pub fn identifier(&self) -> Option<&str> {
        match self {
            LoadError::NoRepositories { identifier }
            | LoadError::NotFound { identifier, .. }
            | LoadError::Namespace { identifier, .. } => Some(identifier),
            LoadError::Circular(identifier) => Some(identifier),
            LoadError::Reported(_) => None,
        }
    }
}
