//! The registry proper: ordered first-match resolution over declared
//! profiles.

use crate::hint::{ResourceTypeHint, TypeDescriptor};
use serde_json::Value;

/// Collects hints during startup. Order is significant: resolution scans
/// hints in registration order and the first match wins.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    hints: Vec<ResourceTypeHint>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hint(mut self, hint: ResourceTypeHint) -> Self {
        tracing::debug!(
            profile = hint.matcher.url(),
            target = hint.target.name,
            "registering resource type hint"
        );
        self.hints.push(hint);
        self
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry { hints: self.hints }
    }
}

/// Immutable, read-only after construction; share by reference.
#[derive(Debug)]
pub struct TypeRegistry {
    hints: Vec<ResourceTypeHint>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve the concrete type for a decoded resource.
    ///
    /// Declared profiles are considered in source order; for each, hints are
    /// scanned in registration order. The first hint accepting any declared
    /// profile wins. `None` means "no specific hint" — the caller falls back
    /// to its generic representation.
    pub fn resolve(&self, resource: &Value) -> Option<&TypeDescriptor> {
        for declared in declared_profiles(resource) {
            if let Some(hint) = self
                .hints
                .iter()
                .find(|hint| hint.matcher.accepts(declared))
            {
                tracing::trace!(profile = declared, target = hint.target.name, "hint matched");
                return Some(&hint.target);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

/// Profile claims from `meta.profile`, in source order.
fn declared_profiles(resource: &Value) -> impl Iterator<Item = &str> {
    resource
        .get("meta")
        .and_then(|meta| meta.get("profile"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
