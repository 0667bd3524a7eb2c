//! Per-kind validator cache
//!
//! Base validator construction is expensive; instances are stateless
//! afterwards. The pool caches one instance per kind, populated on first
//! use behind a mutex and read-only thereafter. The pool itself is built
//! explicitly at startup and passed by reference — no hidden globals.

use crate::validators::{NullValidator, ProfileValidator, StoreValidator};
use kapsel_context::TerminologyStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    /// Decode check only; accepts everything that parses.
    Null,
    /// Declared profiles against the store; unknown profiles warn.
    Profile,
    /// Like `Profile`, but unknown profile claims fail the document.
    Reference,
}

pub struct ValidatorPool {
    store: Arc<TerminologyStore>,
    cache: Mutex<HashMap<ValidatorKind, Arc<dyn ProfileValidator>>>,
}

impl ValidatorPool {
    pub fn new(store: Arc<TerminologyStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The cached validator for `kind`, constructing it on first request.
    pub fn validator_for(&self, kind: ValidatorKind) -> Arc<dyn ProfileValidator> {
        let mut cache = self.cache.lock().expect("validator cache poisoned");
        cache
            .entry(kind)
            .or_insert_with(|| {
                tracing::debug!(?kind, "constructing base validator");
                match kind {
                    ValidatorKind::Null => Arc::new(NullValidator::new()),
                    ValidatorKind::Profile => Arc::new(StoreValidator::new(self.store.clone())),
                    ValidatorKind::Reference => {
                        Arc::new(StoreValidator::escalating(self.store.clone()))
                    }
                }
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_returns_the_same_instance_per_kind() {
        let pool = ValidatorPool::new(Arc::new(TerminologyStore::default()));

        let first = pool.validator_for(ValidatorKind::Null);
        let second = pool.validator_for(ValidatorKind::Null);
        assert!(Arc::ptr_eq(&first, &second));

        let other = pool.validator_for(ValidatorKind::Profile);
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
