//! Step handler signature and the outcome it returns.

use std::any::Any;

use crate::{StepArgs, StepContext, StepError};

/// What a step handler asks the sequencer to do next.
#[derive(Debug)]
#[must_use]
pub enum StepExecution {
    /// Carry on with the next step.
    Continue {
        /// Value stored in the context under the step definition's name.
        value: Option<Box<dyn Any>>,
    },
    /// Stop here and skip the rest of the scenario.
    Skipped {
        /// Optional reason shown in the test outcome.
        message: Option<String>,
    },
}

impl StepExecution {
    /// Continue without producing a value.
    pub fn done() -> Self {
        Self::Continue { value: None }
    }

    /// Continue and hand `value` to later steps.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::StepExecution;
    ///
    /// let StepExecution::Continue { value: Some(value) } = StepExecution::value(12_u32) else {
    ///     panic!("expected a value");
    /// };
    /// assert_eq!(value.downcast_ref::<u32>(), Some(&12));
    /// ```
    pub fn value<T: Any>(value: T) -> Self {
        Self::Continue {
            value: Some(Box::new(value)),
        }
    }

    /// Skip the rest of the scenario with an optional reason.
    pub fn skipped(message: impl Into<Option<String>>) -> Self {
        Self::Skipped {
            message: message.into(),
        }
    }

    /// Whether this outcome skips the scenario.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Signature shared by every step handler.
pub type StepHandler =
    dyn Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError> + Send + Sync;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_accepts_missing_reason() {
        let outcome = StepExecution::skipped(None::<String>);
        assert!(outcome.is_skipped());
        assert_eq!(crate::assert_step_skipped!(outcome), None);
    }

    #[test]
    fn done_continues_without_value() {
        assert!(matches!(
            StepExecution::done(),
            StepExecution::Continue { value: None }
        ));
    }
}
