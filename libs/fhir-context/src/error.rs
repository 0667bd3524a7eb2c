//! Error types for the terminology store

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Startup-only and fatal: the index promises an artifact the resource
    /// path cannot deliver.
    #[error("indexed profile artifact missing: {0}")]
    MissingArtifact(String),

    #[error("artifact {path} is not a conformance resource (resourceType {resource_type})")]
    UnknownArtifactKind { path: String, resource_type: String },

    #[error("invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    #[error("codec error for {path}: {source}")]
    Codec {
        path: String,
        source: kapsel_codec::CodecError,
    },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
