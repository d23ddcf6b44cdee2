//! Ranking of step patterns that match the same step text.

use crate::PatternError;
use crate::pattern::lexer::{Token, lex_pattern};
use std::cmp::Ordering;

/// How specific a step pattern is; greater means more specific.
///
/// Scores compare by literal character count (more wins), then by
/// placeholder count (fewer wins), then by typed placeholder count (more
/// wins).
///
/// # Examples
///
/// ```
/// use stepwise_patterns::SpecificityScore;
///
/// let literal = SpecificityScore::calculate("I eat 5 cucumbers")?;
/// let generic = SpecificityScore::calculate("I eat {eat} cucumbers")?;
/// assert!(literal > generic);
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecificityScore {
    /// Literal characters, counting stray braces.
    pub literal_chars: usize,
    /// Number of placeholders.
    pub placeholder_count: usize,
    /// Number of placeholders carrying a type hint.
    pub typed_placeholder_count: usize,
}

impl SpecificityScore {
    /// Score the pattern text.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the pattern cannot be tokenised.
    pub fn calculate(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::from_tokens(&lex_pattern(pattern)?))
    }

    pub(crate) fn from_tokens(tokens: &[Token]) -> Self {
        tokens.iter().fold(Self::default(), |mut score, token| {
            match token {
                Token::Literal(text) => score.literal_chars += text.chars().count(),
                Token::Placeholder { hint, .. } => {
                    score.placeholder_count += 1;
                    if hint.is_some() {
                        score.typed_placeholder_count += 1;
                    }
                }
                Token::OpenBrace { .. } | Token::CloseBrace { .. } => score.literal_chars += 1,
            }
            score
        })
    }
}

impl Ord for SpecificityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.placeholder_count.cmp(&self.placeholder_count))
            .then_with(|| {
                self.typed_placeholder_count
                    .cmp(&other.typed_placeholder_count)
            })
    }
}

impl PartialOrd for SpecificityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
