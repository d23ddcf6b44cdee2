//! Scenario-scoped store for values shared between steps.
//!
//! One `StepContext` lives for the duration of a single scenario instance. It
//! is seeded by the caller with fixtures and receives the value returned by
//! each step under the step definition's name, replacing any earlier value of
//! that name.

use std::any::{Any, type_name};
use std::collections::HashMap;

use crate::StepError;

/// Named values visible to every step of one scenario instance.
///
/// # Examples
///
/// ```
/// use stepwise::StepContext;
///
/// let mut ctx = StepContext::default();
/// ctx.insert("cucumbers", 12_u32);
/// assert_eq!(ctx.get::<u32>("cucumbers"), Some(&12));
/// assert!(ctx.get::<i64>("cucumbers").is_none());
/// ```
#[derive(Default)]
pub struct StepContext {
    values: HashMap<String, Box<dyn Any>>,
}

impl StepContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, returning the value it replaced.
    pub fn insert<T: Any>(&mut self, name: impl Into<String>, value: T) -> Option<Box<dyn Any>> {
        self.insert_boxed(name, Box::new(value))
    }

    /// Store an already boxed value under `name`.
    pub fn insert_boxed(
        &mut self,
        name: impl Into<String>,
        value: Box<dyn Any>,
    ) -> Option<Box<dyn Any>> {
        self.values.insert(name.into(), value)
    }

    /// Borrow the value stored under `name` if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref::<T>()
    }

    /// Mutably borrow the value stored under `name` if it has type `T`.
    #[must_use]
    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.values.get_mut(name)?.downcast_mut::<T>()
    }

    /// Borrow a value, reporting why it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingArgument`] when nothing is stored under
    /// `name` and [`StepError::ContextType`] when the stored value has a
    /// different type.
    pub fn require<T: Any>(&self, name: &str) -> Result<&T, StepError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| StepError::MissingArgument { name: name.into() })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| StepError::ContextType {
                name: name.into(),
                expected: type_name::<T>(),
            })
    }

    /// Remove and return the value stored under `name` if it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, name: &str) -> Option<T> {
        if !self.values.get(name)?.is::<T>() {
            return None;
        }
        let boxed = self.values.remove(name)?;
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Whether a value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Stored names in lexicographic order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for StepContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepContext")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}
