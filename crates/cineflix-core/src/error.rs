//! Domain-level error types.

use thiserror::Error;

/// Movie catalog errors.
///
/// `Request` carries the best-effort description produced by the request
/// wrapper so it can be rendered inline as-is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    #[error("Catalog returned an empty response")]
    EmptyResponse,

    #[error("Unexpected catalog payload: {0}")]
    Decode(String),
}

impl CatalogError {
    /// HTTP status reported by the upstream, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Request { status, .. } => *status,
            _ => None,
        }
    }
}
