//! Base validators
//!
//! The pipeline runs one [`ProfileValidator`] implementation per call. All
//! implementations decode the content first — undecodable content is a
//! [`ValidationError::Parse`](crate::ValidationError), not a message — and
//! are stateless after construction, so one instance serves all threads.

use crate::error::Result;
use crate::outcome::ValidationMessage;
use kapsel_codec::FhirCodec;
use kapsel_context::TerminologyStore;
use serde_json::Value;
use std::sync::Arc;

pub trait ProfileValidator: Send + Sync {
    /// Produce the raw message list for one document.
    fn validate(&self, content: &str) -> Result<Vec<ValidationMessage>>;
}

/// Accepts everything that decodes. Used where validation is switched off
/// but the parse/no-parse distinction must be preserved.
#[derive(Default)]
pub struct NullValidator {
    codec: FhirCodec,
}

impl NullValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileValidator for NullValidator {
    fn validate(&self, content: &str) -> Result<Vec<ValidationMessage>> {
        self.codec.decode(content)?;
        Ok(Vec::new())
    }
}

/// Validates declared profiles against the terminology store.
pub struct StoreValidator {
    store: Arc<TerminologyStore>,
    codec: FhirCodec,
    /// Escalate an unknown profile claim to an error instead of a warning.
    escalate_unknown_profiles: bool,
}

impl StoreValidator {
    pub fn new(store: Arc<TerminologyStore>) -> Self {
        Self {
            store,
            codec: FhirCodec::new(),
            escalate_unknown_profiles: false,
        }
    }

    pub fn escalating(store: Arc<TerminologyStore>) -> Self {
        Self {
            escalate_unknown_profiles: true,
            ..Self::new(store)
        }
    }

    fn check_profile(&self, resource: &Value, declared: &str, messages: &mut Vec<ValidationMessage>) {
        let (bare_url, declared_version) = kapsel_models::split_canonical(declared);

        let Some(definition) = self.store.structure_definition(bare_url) else {
            let text = format!("Profile StructureDefinition not found: '{bare_url}'");
            let message = if self.escalate_unknown_profiles {
                ValidationMessage::error(text)
            } else {
                ValidationMessage::warning(text)
            };
            messages.push(message.with_location("meta.profile"));
            return;
        };

        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if let Some(constrained) = definition.constrained_type.as_deref() {
            if constrained != resource_type {
                messages.push(
                    ValidationMessage::error(format!(
                        "Profile '{bare_url}' is for type '{constrained}' but resourceType is '{resource_type}'"
                    ))
                    .with_location("resourceType"),
                );
            }
        }

        // version claims that parse and disagree with the loaded artifact
        // are flagged, not failed: the store holds a single version per URL
        if let (Some(claimed), Some(loaded)) = (
            declared_version.and_then(kapsel_models::ProfileVersion::parse),
            definition.profile_version(),
        ) {
            if claimed != loaded {
                messages.push(
                    ValidationMessage::warning(format!(
                        "Profile '{bare_url}' claimed in version {claimed}, loaded in {loaded}"
                    ))
                    .with_location("meta.profile"),
                );
            }
        }
    }
}

impl ProfileValidator for StoreValidator {
    fn validate(&self, content: &str) -> Result<Vec<ValidationMessage>> {
        let resource = self.codec.decode(content)?;
        let mut messages = Vec::new();

        let declared: Vec<String> = resource
            .get("meta")
            .and_then(|meta| meta.get("profile"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        for profile in &declared {
            self.check_profile(&resource, profile, &mut messages);
        }

        tracing::trace!(
            profiles = declared.len(),
            findings = messages.len(),
            "store validation finished"
        );
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_validator_accepts_any_decodable_resource() {
        let validator = NullValidator::new();
        let messages = validator
            .validate(r#"{"resourceType":"Patient","unexpected":true}"#)
            .unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn null_validator_surfaces_parse_failures() {
        let validator = NullValidator::new();
        assert!(validator.validate("{broken").is_err());
    }
}
