//! Error types for the validation pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    /// Content did not parse; distinct from a non-conformant outcome so
    /// callers can tell the two failure classes apart.
    #[error("content is not decodable: {0}")]
    Parse(#[from] kapsel_codec::CodecError),

    #[error("invalid validator configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
