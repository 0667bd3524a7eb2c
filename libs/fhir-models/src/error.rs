//! Error types for artifact models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid conformance artifact: {0}")]
    InvalidArtifact(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
