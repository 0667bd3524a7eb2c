//! Message denylist
//!
//! The base validator produces a handful of known-benign false positives on
//! otherwise conformant documents. The filter drops messages matching a
//! regex denylist. Caller-supplied patterns are always unioned with the
//! built-in list — replacing the built-ins would resurface noise every
//! consumer has to suppress again.

use crate::outcome::ValidationMessage;
use regex::Regex;

/// False positives observed with the underlying validator on conformant
/// documents. Each entry is retireable once the upstream fix lands.
const BUILT_IN_DENYLIST: &[&str] = &[
    r"Unrecognised property '@fhir_comments'",
    r"Unable to expand ValueSet",
    r"URL value '.*' does not resolve",
];

#[derive(Debug)]
pub struct MessageFilter {
    patterns: Vec<Regex>,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self::built_in()
    }
}

impl MessageFilter {
    /// Only the built-in denylist.
    pub fn built_in() -> Self {
        Self {
            patterns: BUILT_IN_DENYLIST
                .iter()
                .map(|pattern| Regex::new(pattern).expect("built-in denylist pattern compiles"))
                .collect(),
        }
    }

    /// Built-ins plus caller-supplied patterns.
    pub fn with_custom(custom: impl IntoIterator<Item = Regex>) -> Self {
        let mut filter = Self::built_in();
        filter.patterns.extend(custom);
        filter
    }

    /// Keep every message not matching the denylist.
    pub(crate) fn retain(&self, messages: Vec<ValidationMessage>) -> Vec<ValidationMessage> {
        messages
            .into_iter()
            .filter(|message| {
                let denied = self.is_denied(&message.text);
                if denied {
                    tracing::trace!(text = %message.text, "dropping denylisted message");
                }
                !denied
            })
            .collect()
    }

    fn is_denied(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
