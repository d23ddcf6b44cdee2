//! `<name>` placeholders in scenario-outline step text.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

#[expect(clippy::expect_used, reason = "the placeholder regex is a constant")]
static OUTLINE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^<>]+)>").expect("outline placeholder regex must compile")
});

/// Names of the `<name>` placeholders in `text`, in order of appearance.
///
/// # Examples
/// ```
/// use stepwise_patterns::outline_placeholders;
///
/// assert_eq!(
///     outline_placeholders("I eat <eat> of <start> cucumbers"),
///     ["eat", "start"]
/// );
/// ```
#[must_use]
pub fn outline_placeholders(text: &str) -> Vec<&str> {
    OUTLINE_PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replace each `<name>` placeholder that `lookup` resolves.
///
/// Placeholders `lookup` does not know are left verbatim. Text without
/// placeholders is returned borrowed.
///
/// # Examples
/// ```
/// use stepwise_patterns::substitute_outline;
///
/// let text = substitute_outline("there are <start> <fruit>", |name| {
///     (name == "start").then_some("12")
/// });
/// assert_eq!(text, "there are 12 <fruit>");
/// ```
pub fn substitute_outline<'t, 'v, F>(text: &'t str, lookup: F) -> Cow<'t, str>
where
    F: Fn(&str) -> Option<&'v str>,
{
    OUTLINE_PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        caps.get(1)
            .and_then(|name| lookup(name.as_str()))
            .unwrap_or(whole)
            .to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn plain_text_is_borrowed() {
        let text = substitute_outline("there are 12 cucumbers", |_| Some("x"));
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn substitutes_every_occurrence() {
        let row = HashMap::from([("start", "12"), ("left", "7")]);
        let text = substitute_outline("<start> minus <left> leaves <left>", |name| {
            row.get(name).copied()
        });
        assert_eq!(text, "12 minus 7 leaves 7");
    }

    #[test]
    fn ignores_empty_and_nested_angles() {
        assert!(outline_placeholders("a <> b").is_empty());
        assert_eq!(outline_placeholders("a <<b>>"), ["b"]);
    }
}
