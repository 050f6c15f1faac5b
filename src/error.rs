//! Error types for model loading.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Loader errors. Both kinds are recoverable at the loader boundary: they are
/// logged, the loader returns `None`, and any previously active model stays
/// untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, missing, or out-of-bound fields in the input descriptor.
    #[error("descriptor error: {0}")]
    Descriptor(String),

    /// No matching topology, or failure populating a matched topology's
    /// weights.
    #[error("architecture error: {0}")]
    Architecture(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Descriptor(e.to_string())
    }
}
