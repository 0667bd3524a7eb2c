//! Validation messages and the per-call result progression
//!
//! A validation run moves through `RawResult -> filtered -> adjusted`; the
//! adjusted [`ValidationOutcome`] is terminal and the only state success may
//! be read from. The intermediate states are distinct types so a caller
//! cannot shortcut the progression.

use std::fmt;

/// Ordered severity; `Error` and above fail an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Information,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// One step up, saturating at `Fatal`. `Fatal` is never produced from
    /// below; mode adjustment stops at `Error`.
    pub(crate) fn raised(self) -> Self {
        match self {
            Self::Information => Self::Warning,
            Self::Warning => Self::Error,
            other => other,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information => write!(f, "information"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// A single finding from the base validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub text: String,
    pub location: Option<String>,
}

impl ValidationMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            location: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn information(text: impl Into<String>) -> Self {
        Self::new(Severity::Information, text)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Untouched base validator output; entry state of every call.
#[derive(Debug)]
pub struct RawResult {
    messages: Vec<ValidationMessage>,
}

impl RawResult {
    pub fn new(messages: Vec<ValidationMessage>) -> Self {
        Self { messages }
    }

    /// Drop denylisted messages, moving to the filtered state.
    pub fn filtered(self, filter: &crate::MessageFilter) -> FilteredResult {
        let before = self.messages.len();
        let messages = filter.retain(self.messages);
        if messages.len() < before {
            tracing::debug!(dropped = before - messages.len(), "denylist filtered messages");
        }
        FilteredResult { messages }
    }
}

/// Denylist applied; severity adjustment still pending.
#[derive(Debug)]
pub struct FilteredResult {
    messages: Vec<ValidationMessage>,
}

impl FilteredResult {
    /// Apply the mode's severity policy, producing the terminal outcome.
    pub fn adjusted(self, mode: crate::ValidatorMode) -> ValidationOutcome {
        ValidationOutcome {
            messages: mode.adjust(self.messages),
        }
    }
}

/// Terminal validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    messages: Vec<ValidationMessage>,
}

impl ValidationOutcome {
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// True iff no message reaches `Error`.
    pub fn is_success(&self) -> bool {
        self.messages
            .iter()
            .all(|message| message.severity < Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.severity >= Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.severity == Severity::Warning)
            .count()
    }
}
