//! Validator modes
//!
//! A mode is a pure policy over a message list: it never touches stored
//! artifacts and never removes messages, only raises severities below
//! `Error`. `Fatal` findings are left alone in every mode.

use crate::error::ValidationError;
use crate::outcome::{Severity, ValidationMessage};

/// Environment variable consulted when no explicit mode is given.
pub const MODE_ENV_VAR: &str = "FHIR_VALIDATOR_MODE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidatorMode {
    /// Keep severities as reported.
    #[default]
    Normal,
    /// Raise every sub-Error severity by one step.
    Strict,
    /// Raise every sub-Error severity straight to Error.
    Pedantic,
}

impl ValidatorMode {
    /// Resolve the active mode: explicit value, else environment, else
    /// `Normal`. An unrecognized value is a configuration error — this is
    /// fatal at first use, not silently ignored.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ValidationError> {
        let raw = match explicit {
            Some(value) => Some(value.to_string()),
            None => std::env::var(MODE_ENV_VAR).ok(),
        };
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => Self::parse(value),
        }
    }

    /// Case-insensitive match against the mode names.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_uppercase().as_str() {
            "NORMAL" => Ok(Self::Normal),
            "STRICT" => Ok(Self::Strict),
            "PEDANTIC" => Ok(Self::Pedantic),
            other => Err(ValidationError::Configuration(format!(
                "unknown validator mode: {other}"
            ))),
        }
    }

    /// Apply the mode's severity policy.
    pub fn adjust(self, messages: Vec<ValidationMessage>) -> Vec<ValidationMessage> {
        match self {
            Self::Normal => messages,
            Self::Strict => map_sub_error(messages, Severity::raised),
            Self::Pedantic => map_sub_error(messages, |_| Severity::Error),
        }
    }
}

fn map_sub_error(
    messages: Vec<ValidationMessage>,
    raise: impl Fn(Severity) -> Severity,
) -> Vec<ValidationMessage> {
    messages
        .into_iter()
        .map(|mut message| {
            if message.severity < Severity::Error {
                let lifted = raise(message.severity);
                tracing::trace!(from = %message.severity, to = %lifted, "raising severity");
                message.severity = lifted;
            }
            message
        })
        .collect()
}
