//! Error types for step execution failures.

use std::fmt;
use std::sync::Arc;

use crate::StepError;

/// Why a step did not complete.
///
/// [`Skip`](Self::Skip) is a control-flow signal rather than a failure; use
/// [`is_skip`](Self::is_skip) to tell them apart.
///
/// # Examples
///
/// ```
/// use stepwise::execution::ExecutionError;
///
/// let error = ExecutionError::Skip { message: Some("not implemented yet".into()) };
/// assert!(error.is_skip());
/// assert_eq!(error.skip_message(), Some("not implemented yet"));
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// Step requested to skip the rest of the scenario.
    #[error("step skipped{}", reason_suffix(.message.as_deref()))]
    Skip {
        /// Optional reason.
        message: Option<String>,
    },
    /// Context values the step needs were never stored.
    ///
    /// The details are boxed in an `Arc` to keep the enum small.
    #[error("{0}")]
    MissingFixtures(Arc<MissingFixturesDetails>),
    /// Step handler returned an error.
    #[error("{error}")]
    HandlerFailed {
        /// The handler's error, shared so the enum stays `Clone`.
        error: Arc<StepError>,
    },
    /// Step handler panicked.
    #[error("step panicked: {message}")]
    Panicked {
        /// Rendered panic payload.
        message: String,
    },
}

/// Details about missing context values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFixturesDetails {
    /// Pattern of the step definition.
    pub step_pattern: String,
    /// Names the definition declares but no argument binds.
    pub required: Vec<String>,
    /// Required names absent from the context.
    pub missing: Vec<String>,
    /// Names present in the context, sorted.
    pub available: Vec<String>,
}

impl fmt::Display for MissingFixturesDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step `{}` needs context values [{}] but [{}] are missing (available: [{}])",
            self.step_pattern,
            self.required.join(", "),
            self.missing.join(", "),
            self.available.join(", ")
        )
    }
}

fn reason_suffix(message: Option<&str>) -> String {
    message
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}

impl ExecutionError {
    /// Returns `true` if this error represents a skip request.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Returns the skip reason, if this is a skip with a reason.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::execution::ExecutionError;
    ///
    /// let skip_no_msg = ExecutionError::Skip { message: None };
    /// assert_eq!(skip_no_msg.skip_message(), None);
    ///
    /// let failed = ExecutionError::Panicked { message: "boom".into() };
    /// assert_eq!(failed.skip_message(), None);
    /// ```
    #[must_use]
    pub fn skip_message(&self) -> Option<&str> {
        match self {
            Self::Skip { message } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ExecutionError::Skip { message: None }, "step skipped")]
    #[case(ExecutionError::Skip { message: Some("later".into()) }, "step skipped: later")]
    #[case(
        ExecutionError::HandlerFailed { error: Arc::new(StepError::msg("expected 7")) },
        "expected 7"
    )]
    #[case(ExecutionError::Panicked { message: "boom".into() }, "step panicked: boom")]
    fn renders_messages(#[case] error: ExecutionError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn missing_fixture_message_lists_names() {
        let error = ExecutionError::MissingFixtures(Arc::new(MissingFixturesDetails {
            step_pattern: "I eat {eat} cucumbers".into(),
            required: vec!["basket".into(), "knife".into()],
            missing: vec!["knife".into()],
            available: vec!["basket".into()],
        }));
        assert!(!error.is_skip());
        assert_eq!(
            error.to_string(),
            "step `I eat {eat} cucumbers` needs context values [basket, knife] but [knife] \
             are missing (available: [basket])"
        );
    }
}
