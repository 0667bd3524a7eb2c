//! Resource type hints
//!
//! A hint pairs a profile matcher (canonical URL plus an optional inclusive
//! version range) with the descriptor of the concrete type to decode into.

use kapsel_models::{split_canonical, ProfileVersion};

/// Names the concrete in-memory shape a hint maps to. Plain data; the
/// consuming suite translates it to its own types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Name of the concrete shape, e.g. "PrescriptionBundle"
    pub name: &'static str,
    /// The wire-level resourceType the shape expects, e.g. "Bundle"
    pub resource_type: &'static str,
}

impl TypeDescriptor {
    pub const fn new(name: &'static str, resource_type: &'static str) -> Self {
        Self {
            name,
            resource_type,
        }
    }
}

/// Inclusive version range. Open bounds accept everything on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<ProfileVersion>,
    max: Option<ProfileVersion>,
}

impl VersionRange {
    /// Range accepting any version.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from(min: ProfileVersion) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: ProfileVersion, max: ProfileVersion) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, version: &ProfileVersion) -> bool {
        if let Some(min) = &self.min {
            if version < min {
                return false;
            }
        }
        if let Some(max) = &self.max {
            if version > max {
                return false;
            }
        }
        true
    }
}

/// Matches a declared profile entry against a registered canonical URL and
/// version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMatcher {
    url: String,
    versions: VersionRange,
}

impl ProfileMatcher {
    pub fn new(url: impl Into<String>, versions: VersionRange) -> Self {
        Self {
            url: url.into(),
            versions,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Accepts a declared profile entry of the form `url` or `url|version`.
    ///
    /// A declared version that does not parse as a dotted numeric form
    /// degrades this entry to URL-only matching — a documented leniency for
    /// profiles versioned with labels like "current".
    pub fn accepts(&self, declared: &str) -> bool {
        let (bare_url, declared_version) = split_canonical(declared);
        if bare_url != self.url {
            return false;
        }

        match declared_version {
            None => true,
            Some(raw) => match ProfileVersion::parse(raw) {
                Some(version) => self.versions.contains(&version),
                None => {
                    tracing::debug!(
                        profile = bare_url,
                        version = raw,
                        "declared version not comparable, matching by URL only"
                    );
                    true
                }
            },
        }
    }
}

/// One startup-registered mapping from a profile claim to a concrete type.
#[derive(Debug, Clone)]
pub struct ResourceTypeHint {
    pub matcher: ProfileMatcher,
    pub target: TypeDescriptor,
}

impl ResourceTypeHint {
    pub fn new(matcher: ProfileMatcher, target: TypeDescriptor) -> Self {
        Self { matcher, target }
    }

    /// Hint for every version of a profile.
    pub fn for_structure(url: impl Into<String>, target: TypeDescriptor) -> Self {
        Self::new(ProfileMatcher::new(url, VersionRange::any()), target)
    }

    /// Hint restricted to an inclusive version range.
    pub fn for_versions(
        url: impl Into<String>,
        versions: VersionRange,
        target: TypeDescriptor,
    ) -> Self {
        Self::new(ProfileMatcher::new(url, versions), target)
    }
}
