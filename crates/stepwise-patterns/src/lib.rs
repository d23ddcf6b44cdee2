//! Shared text utilities for stepwise.
//!
//! The crate owns everything that operates on step text alone: keyword
//! normalisation, compilation of `{name}` step-definition patterns into
//! anchored regular expressions, specificity ranking for overlapping
//! definitions, and the `<name>` placeholders used by scenario outlines.

mod capture;
mod errors;
mod hint;
mod keyword;
mod outline;
mod pattern;
mod specificity;

pub use capture::extract_captured_values;
pub use errors::{PatternError, PlaceholderErrorInfo};
pub use hint::get_type_pattern;
pub use keyword::{StepKeyword, StepKeywordParseError, StepKind, UnsupportedStepType};
pub use outline::{outline_placeholders, substitute_outline};
pub use pattern::{
    CompiledPattern, build_regex_from_pattern, compile_regex_from_pattern, placeholder_names,
};
pub use specificity::SpecificityScore;
