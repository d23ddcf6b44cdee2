//! Errors returned by step handlers.

use std::error::Error as StdError;
use std::fmt;

/// Failure reported by a step handler.
///
/// Handlers return `Err(StepError)` to fail the running scenario. Any error
/// type converts through `?` via [`StepError::Source`]; argument helpers on
/// [`StepArgs`](crate::StepArgs) produce the more specific variants.
///
/// # Examples
///
/// ```
/// use stepwise::StepError;
///
/// let err = StepError::msg("expected 7 cucumbers, found 6");
/// assert_eq!(err.to_string(), "expected 7 cucumbers, found 6");
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StepError {
    /// Plain failure message.
    #[error("{0}")]
    Message(String),
    /// A named argument was requested but the step does not provide it.
    #[error("step argument `{name}` is not available")]
    MissingArgument {
        /// Requested argument name.
        name: String,
    },
    /// A named argument could not be parsed into the requested type.
    #[error("cannot parse step argument `{name}` from {value:?}: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Raw text that failed to parse.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A context value exists but holds a different type.
    #[error("context value `{name}` is not a `{expected}`")]
    ContextType {
        /// Context key.
        name: String,
        /// Requested type name.
        expected: &'static str,
    },
    /// Error raised by user code and propagated with `?`.
    #[error(transparent)]
    Source(#[from] Box<dyn StdError + Send + Sync>),
}

impl StepError {
    /// Build a failure from any displayable message.
    #[must_use]
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::Message(message.to_string())
    }

    /// Wrap an arbitrary error value.
    #[must_use]
    pub fn source(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(error))
    }
}
