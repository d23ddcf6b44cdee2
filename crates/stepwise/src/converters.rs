//! Per-parameter converters applied to raw example cells.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::value::{ConvertedValue, ExampleValue};

type ConverterFn = dyn Fn(&str) -> Result<ConvertedValue, String> + Send + Sync;

/// Mapping from outline parameter name to converter.
///
/// Parameters without a converter keep their raw cell string.
///
/// # Examples
///
/// ```
/// use stepwise::ExampleConverters;
///
/// let converters = ExampleConverters::new()
///     .parse::<i64>("start")
///     .parse::<f64>("eat")
///     .raw("left");
///
/// let eat = converters.convert("eat", "5")?;
/// assert_eq!(eat.label(), "5.0");
/// assert_eq!(converters.convert("unlisted", "x")?.label(), "x");
/// assert!(converters.convert("start", "twelve").is_err());
/// # Ok::<(), String>(())
/// ```
#[derive(Clone, Default)]
pub struct ExampleConverters {
    converters: HashMap<String, Arc<ConverterFn>>,
}

impl ExampleConverters {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallible converter for `name`, replacing any previous one.
    pub fn insert<T, E, F>(&mut self, name: impl Into<String>, convert: F)
    where
        T: ExampleValue,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let converter: Arc<ConverterFn> = Arc::new(move |raw: &str| {
            convert(raw)
                .map(ConvertedValue::new)
                .map_err(|err| err.to_string())
        });
        self.converters.insert(name.into(), converter);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<T, E, F>(mut self, name: impl Into<String>, convert: F) -> Self
    where
        T: ExampleValue,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.insert(name, convert);
        self
    }

    /// Convert `name` with `T`'s [`FromStr`] implementation.
    #[must_use]
    pub fn parse<T>(self, name: impl Into<String>) -> Self
    where
        T: ExampleValue + FromStr,
        T::Err: fmt::Display,
    {
        self.with(name, |raw: &str| raw.trim().parse::<T>())
    }

    /// Keep `name` as its raw string explicitly.
    #[must_use]
    pub fn raw(self, name: impl Into<String>) -> Self {
        self.with(name, |raw: &str| Ok::<_, std::convert::Infallible>(raw.to_owned()))
    }

    /// Whether a converter is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Convert one raw cell, falling back to the raw string.
    ///
    /// # Errors
    ///
    /// Returns the converter's message when it rejects `raw`.
    pub fn convert(&self, name: &str, raw: &str) -> Result<ConvertedValue, String> {
        match self.converters.get(name) {
            Some(convert) => convert(raw),
            None => Ok(ConvertedValue::raw(raw)),
        }
    }
}

impl fmt::Debug for ExampleConverters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.converters.keys().collect();
        names.sort_unstable();
        f.debug_struct("ExampleConverters")
            .field("parameters", &names)
            .finish()
    }
}
