//! Wire encoding detection
//!
//! An encoding is either given explicitly (file extension, declared media
//! type) or guessed from the content itself. The guess looks at a single
//! byte and is documented as an unreliable convenience default — callers
//! that know the encoding should say so.

use crate::error::{CodecError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Xml,
    Json,
}

impl EncodingKind {
    /// The respective other encoding.
    pub fn flip(self) -> Self {
        match self {
            Self::Xml => Self::Json,
            Self::Json => Self::Xml,
        }
    }

    /// Guess from content: XML if the first non-whitespace character is
    /// `<`, JSON otherwise. Cheap and fallible by design.
    pub fn guess_from_content(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('<') => Self::Xml,
            _ => Self::Json,
        }
    }

    /// Derive from a path or media-type string via case-insensitive
    /// substring match on "xml"/"json".
    pub fn from_path(path: &str) -> Result<Self> {
        let lowered = path.to_lowercase();
        if lowered.contains("xml") {
            Ok(Self::Xml)
        } else if lowered.contains("json") {
            Ok(Self::Json)
        } else {
            Err(CodecError::UnsupportedEncoding(path.to_string()))
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml => write!(f, "XML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}
