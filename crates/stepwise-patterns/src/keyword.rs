//! Literal step keywords and the semantic step kinds they resolve to.
//!
//! A feature file spells each step with a literal keyword (`Given`, `And`,
//! ...). Reports keep that spelling verbatim, while step lookup works on the
//! semantic [`StepKind`]: conjunctions borrow the kind of the nearest preceding
//! primary keyword in the same scenario.

use gherkin::StepType;
use std::fmt;
use std::str::FromStr;

/// Keyword as written in front of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform an action when testing behaviour.
    When,
    /// Assert the expected outcome of a scenario.
    Then,
    /// Continue the previous step's role.
    And,
    /// Continue the previous step's role with a contrasting condition.
    But,
}

/// Semantic role of a step after conjunctions have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    /// Precondition step.
    Given,
    /// Action step.
    When,
    /// Assertion step.
    Then,
}

impl StepKind {
    /// Lowercase name used as the step `type` in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise_patterns::StepKind;
    ///
    /// assert_eq!(StepKind::When.as_str(), "when");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StepKeyword {
    /// Return the keyword in its canonical capitalised spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Return the step kind of a primary keyword, or `None` for conjunctions.
    #[must_use]
    pub const fn primary_kind(self) -> Option<StepKind> {
        match self {
            Self::Given => Some(StepKind::Given),
            Self::When => Some(StepKind::When),
            Self::Then => Some(StepKind::Then),
            Self::And | Self::But => None,
        }
    }

    /// Resolve this keyword to a step kind while scanning a scenario.
    ///
    /// Primary keywords record their kind in `prev` and return it. `And` and
    /// `But` return the recorded kind unchanged, falling back to
    /// [`StepKind::Given`] when the scenario opens with a conjunction.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise_patterns::{StepKeyword, StepKind};
    ///
    /// let mut prev = None;
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), StepKind::When);
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), StepKind::When);
    /// assert_eq!(prev, Some(StepKind::When));
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<StepKind>) -> StepKind {
        match self.primary_kind() {
            Some(kind) => {
                *prev = Some(kind);
                kind
            }
            None => prev.unwrap_or(StepKind::Given),
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a literal keyword is not one of the five known ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Given, Self::When, Self::Then, Self::And, Self::But]
            .into_iter()
            .find(|kw| trimmed.eq_ignore_ascii_case(kw.as_str()))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_string()))
    }
}

/// Error raised when a parsed [`StepType`] has no [`StepKind`] counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported step type: {0:?}")]
pub struct UnsupportedStepType(pub StepType);

impl TryFrom<StepType> for StepKind {
    type Error = UnsupportedStepType;

    fn try_from(ty: StepType) -> Result<Self, Self::Error> {
        match ty {
            StepType::Given => Ok(Self::Given),
            StepType::When => Ok(Self::When),
            StepType::Then => Ok(Self::Then),
            #[expect(unreachable_patterns, reason = "guard future StepType variants")]
            other => Err(UnsupportedStepType(other)),
        }
    }
}
