//! Profile identity and version value types
//!
//! Profile versions in the wild ("1.0", "1.1.0", "1.0.2") are dotted numeric
//! strings, not semver: two segments are common and labels do not occur.
//! [`ProfileVersion`] parses exactly that shape and orders segment-wise with
//! missing segments treated as zero, so `1.2` and `1.2.0` compare equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Immutable identity of a named, versioned profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileIdentity {
    pub canonical_url: String,
    pub version: ProfileVersion,
}

impl ProfileIdentity {
    pub fn new(canonical_url: impl Into<String>, version: ProfileVersion) -> Self {
        Self {
            canonical_url: canonical_url.into(),
            version,
        }
    }
}

impl fmt::Display for ProfileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.canonical_url, self.version)
    }
}

/// Lenient dotted-numeric version.
///
/// `parse` returns `None` for anything that is not purely dotted digits
/// ("current", "4.0.1-ballot"); callers treat that as "no comparable
/// version" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileVersion {
    segments: Vec<u32>,
}

impl ProfileVersion {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let segments: Option<Vec<u32>> = trimmed.split('.').map(|s| s.parse().ok()).collect();
        segments.map(|segments| Self { segments })
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    fn segment(&self, idx: usize) -> u32 {
        self.segments.get(idx).copied().unwrap_or(0)
    }
}

impl PartialOrd for ProfileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProfileVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for idx in 0..len {
            match self.segment(idx).cmp(&other.segment(idx)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(u32::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl TryFrom<String> for ProfileVersion {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| crate::Error::InvalidArtifact(format!("not a dotted version: {value}")))
    }
}

impl From<ProfileVersion> for String {
    fn from(version: ProfileVersion) -> Self {
        version.to_string()
    }
}

/// Split a canonical URL from its optional `|<version>` suffix.
///
/// `fetch`-style lookups index by bare URL only, so every consumer of a
/// caller-supplied canonical goes through this first.
pub fn split_canonical(url: &str) -> (&str, Option<&str>) {
    match url.split_once('|') {
        Some((bare, version)) => (bare, Some(version)),
        None => (url, None),
    }
}
