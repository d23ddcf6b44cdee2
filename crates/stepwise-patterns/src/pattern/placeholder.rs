//! Parsing of a single `{name}` or `{name:hint}` placeholder.

use crate::errors::{PatternError, placeholder_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceholderSpec {
    pub name: String,
    pub hint: Option<String>,
}

const INVALID: &str = "invalid placeholder in step pattern";
const UNCLOSED: &str = "missing closing '}' for placeholder";

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Parse the placeholder whose opening brace sits at byte `start`.
///
/// Returns the byte offset just past the closing brace together with the
/// parsed name and optional type hint.
pub(crate) fn parse_placeholder(
    pattern: &str,
    start: usize,
) -> Result<(usize, PlaceholderSpec), PatternError> {
    let body_start = start + 1;
    let body = pattern
        .get(body_start..)
        .ok_or_else(|| placeholder_error(INVALID, start, None))?;
    let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    let name = name.to_owned();
    let name_end = body_start + name_len;

    if rest.starts_with('}') {
        return Ok((name_end + 1, PlaceholderSpec { name, hint: None }));
    }
    let Some(hint_body) = rest.strip_prefix(':') else {
        let message = if rest.is_empty() { UNCLOSED } else { INVALID };
        return Err(placeholder_error(message, start, Some(name)));
    };
    let Some((hint, _)) = hint_body.split_once('}') else {
        return Err(placeholder_error(UNCLOSED, start, Some(name)));
    };
    if hint.is_empty() || hint.contains(|c: char| c.is_whitespace() || c == '{') {
        return Err(placeholder_error(INVALID, start, Some(name)));
    }
    Ok((
        name_end + 1 + hint.len() + 1,
        PlaceholderSpec {
            name,
            hint: Some(hint.to_owned()),
        },
    ))
}
