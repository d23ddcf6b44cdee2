//! Named arguments handed to a step handler.
//!
//! A step receives two kinds of named values: the raw text captured by its
//! `{name}` placeholders and the typed values converted from the example row
//! of an outline instance. [`StepArgs`] keeps both so handlers can ask for
//! whichever form they need.

use std::any::{Any, type_name};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::{ConvertedValue, StepError};

/// Arguments bound to one step of one scenario instance.
#[derive(Debug, Clone, Default)]
pub struct StepArgs {
    captures: IndexMap<String, String>,
    examples: IndexMap<String, ConvertedValue>,
    docstring: Option<String>,
    table: Option<Vec<Vec<String>>>,
}

impl StepArgs {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder capture.
    #[must_use]
    pub fn with_capture(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.captures.insert(name.into(), value.into());
        self
    }

    /// Add a converted example value.
    #[must_use]
    pub fn with_example(mut self, name: impl Into<String>, value: ConvertedValue) -> Self {
        self.examples.insert(name.into(), value);
        self
    }

    /// Attach the step's docstring.
    #[must_use]
    pub fn with_docstring(mut self, docstring: Option<String>) -> Self {
        self.docstring = docstring;
        self
    }

    /// Attach the step's data table.
    #[must_use]
    pub fn with_table(mut self, table: Option<Vec<Vec<String>>>) -> Self {
        self.table = table;
        self
    }

    /// Whether an argument called `name` is bound in either form.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.captures.contains_key(name) || self.examples.contains_key(name)
    }

    /// Typed example value converted for parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingArgument`] when the row has no such
    /// parameter and [`StepError::ContextType`] when its converter produced
    /// another type.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::{ConvertedValue, StepArgs};
    ///
    /// let args = StepArgs::new().with_example("start", ConvertedValue::new(12_i64));
    /// assert_eq!(args.get::<i64>("start").ok(), Some(&12));
    /// assert!(args.get::<u8>("start").is_err());
    /// ```
    pub fn get<T: Any>(&self, name: &str) -> Result<&T, StepError> {
        let value = self
            .examples
            .get(name)
            .ok_or_else(|| StepError::MissingArgument {
                name: name.to_owned(),
            })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| StepError::ContextType {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// String form of argument `name`: the capture when present, else the
    /// example value's label.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.captures
            .get(name)
            .map(String::as_str)
            .or_else(|| self.examples.get(name).map(ConvertedValue::label))
    }

    /// Parse argument `name` from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingArgument`] when nothing is bound under
    /// `name` and [`StepError::InvalidArgument`] when parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::StepArgs;
    ///
    /// let args = StepArgs::new().with_capture("count", " 7");
    /// assert_eq!(args.parse::<u32>("count").ok(), Some(7));
    /// ```
    pub fn parse<T>(&self, name: &str) -> Result<T, StepError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.text(name).ok_or_else(|| StepError::MissingArgument {
            name: name.to_owned(),
        })?;
        raw.trim()
            .parse::<T>()
            .map_err(|err| StepError::InvalidArgument {
                name: name.to_owned(),
                value: raw.to_owned(),
                reason: err.to_string(),
            })
    }

    /// Placeholder captures in pattern order.
    #[must_use]
    pub fn captures(&self) -> &IndexMap<String, String> {
        &self.captures
    }

    /// Converted example values in header order.
    #[must_use]
    pub fn examples(&self) -> &IndexMap<String, ConvertedValue> {
        &self.examples
    }

    /// Docstring attached to the step.
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    /// Data table attached to the step, header row first.
    #[must_use]
    pub fn table(&self) -> Option<&[Vec<String>]> {
        self.table.as_deref()
    }
}
