//! Error types for the wire-format codec

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot determine encoding from: {0}")]
    UnsupportedEncoding(String),

    #[error("malformed {encoding} content: {reason}")]
    Parse {
        encoding: crate::EncodingKind,
        reason: String,
    },

    #[error("expected resource of type {expected}, got {actual}")]
    UnexpectedResourceType { expected: String, actual: String },

    #[error("resource has no resourceType property")]
    MissingResourceType,

    #[error("XML read error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
