//! The pipeline: base validation, denylist filtering, mode adjustment.

use crate::error::Result;
use crate::filter::MessageFilter;
use crate::mode::ValidatorMode;
use crate::outcome::{RawResult, ValidationOutcome};
use crate::validators::ProfileValidator;
use std::sync::Arc;

pub struct ValidationPipeline {
    validator: Arc<dyn ProfileValidator>,
    filter: MessageFilter,
    mode: ValidatorMode,
}

impl ValidationPipeline {
    pub fn new(
        validator: Arc<dyn ProfileValidator>,
        filter: MessageFilter,
        mode: ValidatorMode,
    ) -> Self {
        Self {
            validator,
            filter,
            mode,
        }
    }

    /// Validate one document. Undecodable content propagates as
    /// [`ValidationError::Parse`](crate::ValidationError); everything else
    /// lands in the outcome.
    pub fn validate(&self, content: &str) -> Result<ValidationOutcome> {
        let raw = RawResult::new(self.validator.validate(content)?);
        let outcome = raw.filtered(&self.filter).adjusted(self.mode);
        tracing::debug!(
            success = outcome.is_success(),
            errors = outcome.error_count(),
            "validation finished"
        );
        Ok(outcome)
    }

    /// Convenience check; parse failures count as invalid.
    pub fn is_valid(&self, content: &str) -> bool {
        self.validate(content)
            .map(|outcome| outcome.is_success())
            .unwrap_or(false)
    }

    pub fn mode(&self) -> ValidatorMode {
        self.mode
    }
}
