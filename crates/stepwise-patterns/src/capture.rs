//! Extraction of placeholder captures from a matched step.

use regex::Regex;

/// Return the text captured by every group of `re`, or `None` when `text`
/// does not match.
///
/// Group 0 is skipped. Groups that did not participate yield empty strings so
/// positions stay aligned with placeholder names.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use stepwise_patterns::extract_captured_values;
/// let re = Regex::new(r"^there are (\d+) cucumbers$")?;
/// assert_eq!(
///     extract_captured_values(&re, "there are 12 cucumbers"),
///     Some(vec!["12".to_string()])
/// );
/// assert!(extract_captured_values(&re, "there are no cucumbers").is_none());
/// # Ok::<(), regex::Error>(())
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect(),
    )
}
