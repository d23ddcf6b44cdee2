//! Regex fragments for placeholder type hints.

const UNSIGNED: &str = r"\d+";
const SIGNED: &str = r"[+-]?\d+";
const FLOAT: &str = r"(?i:(?:[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?|nan|inf|infinity))";
const ANY: &str = r".+?";

/// Regex fragment matching values of the hinted type.
///
/// Integer and float hints narrow the match; anything else, including no
/// hint, matches lazily.
///
/// # Examples
/// ```
/// use stepwise_patterns::get_type_pattern;
///
/// assert_eq!(get_type_pattern(Some("u32")), r"\d+");
/// assert_eq!(get_type_pattern(Some("String")), ".+?");
/// assert_eq!(get_type_pattern(None), ".+?");
/// ```
#[must_use]
pub fn get_type_pattern(type_hint: Option<&str>) -> &'static str {
    match type_hint {
        Some("u8" | "u16" | "u32" | "u64" | "u128" | "usize") => UNSIGNED,
        Some("i8" | "i16" | "i32" | "i64" | "i128" | "isize") => SIGNED,
        Some("f32" | "f64") => FLOAT,
        _ => ANY,
    }
}
