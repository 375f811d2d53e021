//! Error handling for the yield lookup
//!
//! Defines the typed error kinds surfaced to the presentation layer.
//! Provider failures are always converted into one of these kinds at the
//! external-call wrapper; nothing propagates raw out of a lookup.

use thiserror::Error;

/// Error kinds for lookup operations
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Result type alias for lookup operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;
