//! Profile-to-type resolution
//!
//! Maps the profile a decoded resource claims conformance to onto the
//! concrete in-memory shape the surrounding suite should use for it. Hints
//! are registered once at startup through [`RegistryBuilder`]; the built
//! [`TypeRegistry`] is immutable and safe to share across threads.
//!
//! Resolution returning `None` is a normal outcome, not an error: it means
//! no specific shape is registered for the claimed profile and the caller
//! falls back to its generic representation.

mod hint;
mod registry;

pub use hint::{ProfileMatcher, ResourceTypeHint, TypeDescriptor, VersionRange};
pub use registry::{RegistryBuilder, TypeRegistry};
