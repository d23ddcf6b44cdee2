//! Errors raised while turning step patterns into regular expressions.

use std::fmt;
use thiserror::Error;

/// Location and cause of a malformed placeholder or stray brace.
///
/// # Examples
/// ```
/// use stepwise_patterns::PlaceholderErrorInfo;
///
/// let info = PlaceholderErrorInfo::new("invalid placeholder", 3, Some("count".into()));
/// assert_eq!(info.placeholder.as_deref(), Some("count"));
/// assert_eq!(info.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderErrorInfo {
    /// Short description of the failure.
    pub message: &'static str,
    /// Zero-based byte offset into the pattern.
    pub position: usize,
    /// Placeholder name, when one had been read.
    pub placeholder: Option<String>,
}

impl PlaceholderErrorInfo {
    /// Describe a placeholder failure at `position`.
    #[must_use]
    pub fn new(message: &'static str, position: usize, placeholder: Option<String>) -> Self {
        Self {
            message,
            position,
            placeholder,
        }
    }
}

impl fmt::Display for PlaceholderErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.placeholder {
            Some(name) => write!(
                f,
                "{} for placeholder `{name}` at byte {}",
                self.message, self.position
            ),
            None => write!(f, "{} at byte {}", self.message, self.position),
        }
    }
}

/// Failure to compile a step pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern text itself is malformed.
    #[error("{0}")]
    Placeholder(PlaceholderErrorInfo),
    /// The generated regular expression was rejected by the regex engine.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn placeholder_error(
    message: &'static str,
    position: usize,
    placeholder: Option<String>,
) -> PatternError {
    PatternError::Placeholder(PlaceholderErrorInfo::new(message, position, placeholder))
}
