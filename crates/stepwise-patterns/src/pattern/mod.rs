//! Step-definition patterns: `{name}` / `{name:hint}` placeholders compiled
//! into anchored regular expressions.

mod compiler;
pub(crate) mod lexer;
mod placeholder;

use crate::capture::extract_captured_values;
use crate::errors::PatternError;
use crate::specificity::SpecificityScore;
use regex::Regex;

pub use compiler::build_regex_from_pattern;
use lexer::{Token, lex_pattern};

/// Build and compile the regular expression for a step pattern.
///
/// # Errors
/// Returns [`PatternError`] when the pattern is malformed or the generated
/// regex is rejected.
pub fn compile_regex_from_pattern(pattern: &str) -> Result<Regex, PatternError> {
    let source = build_regex_from_pattern(pattern)?;
    Ok(Regex::new(&source)?)
}

/// Placeholder names of `pattern` in declaration order.
///
/// # Errors
/// Returns [`PatternError`] when the pattern cannot be tokenised.
///
/// # Examples
/// ```
/// use stepwise_patterns::placeholder_names;
///
/// let names = placeholder_names("I eat {eat:f64} of {start}")?;
/// assert_eq!(names, ["eat", "start"]);
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
pub fn placeholder_names(pattern: &str) -> Result<Vec<String>, PatternError> {
    Ok(names_of(&lex_pattern(pattern)?))
}

fn names_of(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// A step pattern compiled once, ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    text: String,
    regex: Regex,
    names: Vec<String>,
    specificity: SpecificityScore,
}

impl CompiledPattern {
    /// Compile `pattern`, recording its placeholder names and specificity.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern is malformed or the generated
    /// regex is rejected.
    ///
    /// # Examples
    /// ```
    /// use stepwise_patterns::CompiledPattern;
    ///
    /// let pattern = CompiledPattern::compile("I eat {eat} cucumbers")?;
    /// let captures = pattern.captures("I eat 5 cucumbers");
    /// assert_eq!(captures, Some(vec![("eat".to_string(), "5".to_string())]));
    /// assert!(pattern.captures("I eat cucumbers").is_none());
    /// # Ok::<(), stepwise_patterns::PatternError>(())
    /// ```
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let tokens = lex_pattern(pattern)?;
        let source = compiler::regex_source(&tokens, pattern.len())?;
        Ok(Self {
            text: pattern.to_owned(),
            regex: Regex::new(&source)?,
            names: names_of(&tokens),
            specificity: SpecificityScore::from_tokens(&tokens),
        })
    }

    /// The pattern text as written by the step author.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The compiled, anchored regular expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Ranking used when several patterns match the same text.
    #[must_use]
    pub fn specificity(&self) -> SpecificityScore {
        self.specificity
    }

    /// Whether `text` matches the whole pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Pair each placeholder name with the text it captured, or `None` when
    /// `text` does not match.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<(String, String)>> {
        let values = extract_captured_values(&self.regex, text)?;
        Some(self.names.iter().cloned().zip(values).collect())
    }
}
