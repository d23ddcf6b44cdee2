//! Translate lexed tokens into an anchored regular-expression source.

use crate::errors::{PatternError, placeholder_error};
use crate::hint::get_type_pattern;

use super::lexer::{Token, lex_pattern};

pub(crate) fn regex_source(tokens: &[Token], pattern_len: usize) -> Result<String, PatternError> {
    let mut regex = String::with_capacity(pattern_len.saturating_mul(2) + 2);
    regex.push('^');
    let mut stray_depth = 0usize;

    for token in tokens {
        match token {
            Token::Literal(text) => regex.push_str(&regex::escape(text)),
            Token::Placeholder { hint, .. } => {
                regex.push('(');
                regex.push_str(get_type_pattern(hint.as_deref()));
                regex.push(')');
            }
            Token::OpenBrace { .. } => {
                stray_depth += 1;
                regex.push_str(r"\{");
            }
            Token::CloseBrace { index } => {
                if stray_depth == 0 {
                    return Err(placeholder_error(
                        "unmatched closing brace '}' in step pattern",
                        *index,
                        None,
                    ));
                }
                stray_depth -= 1;
                regex.push_str(r"\}");
            }
        }
    }

    if stray_depth != 0 {
        return Err(placeholder_error(
            "unbalanced braces in step pattern",
            pattern_len,
            None,
        ));
    }

    regex.push('$');
    Ok(regex)
}

/// Build the anchored regular-expression source for a step pattern.
///
/// # Errors
/// Returns [`PatternError::Placeholder`] for malformed placeholders and
/// unbalanced braces.
///
/// # Examples
/// ```
/// use stepwise_patterns::build_regex_from_pattern;
///
/// let source = build_regex_from_pattern("I eat {eat:f64} cucumbers")?;
/// assert!(source.starts_with("^I eat ("));
/// assert!(source.ends_with(") cucumbers$"));
/// # Ok::<(), stepwise_patterns::PatternError>(())
/// ```
pub fn build_regex_from_pattern(pattern: &str) -> Result<String, PatternError> {
    let tokens = lex_pattern(pattern)?;
    regex_source(&tokens, pattern.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("there are {start:u32} cucumbers", r"^there are (\d+) cucumbers$")]
    #[case("I have {left:i64} left", r"^I have ([+-]?\d+) left$")]
    #[case("the step {text}", r"^the step (.+?)$")]
    #[case("a (literal) step.", r"^a \(literal\) step\.$")]
    #[case("{ balanced }", r"^\{ balanced \}$")]
    fn builds_anchored_sources(#[case] pattern: &str, #[case] expected: &str) {
        let source = build_regex_from_pattern(pattern)
            .unwrap_or_else(|err| panic!("{pattern:?} should compile: {err}"));
        assert_eq!(source, expected);
    }

    #[rstest]
    #[case("broken}", "unmatched closing brace")]
    #[case("broken { still", "unbalanced braces")]
    #[case("{open", "missing closing '}' for placeholder")]
    fn rejects_unbalanced_patterns(#[case] pattern: &str, #[case] fragment: &str) {
        let Err(err) = build_regex_from_pattern(pattern) else {
            panic!("{pattern:?} should be rejected");
        };
        assert!(err.to_string().contains(fragment), "{err}");
    }
}
