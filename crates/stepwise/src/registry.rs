//! Step definitions and the registry that resolves step text to them.
//!
//! Definitions are keyed by step kind and pattern text. Lookup first tries an
//! exact pattern match, then every pattern of the kind that matches the text,
//! preferring the most specific one. Registration order breaks ties.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use stepwise_patterns::{CompiledPattern, PatternError, StepKind};

use crate::types::StepHandler;
use crate::{StepArgs, StepContext, StepError, StepExecution};

/// Failure to register a step definition.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Another definition already uses this kind and pattern.
    #[error("duplicate {kind} step for pattern `{pattern}`")]
    Duplicate {
        /// Step kind.
        kind: StepKind,
        /// Pattern text.
        pattern: String,
    },
    /// The pattern text does not compile.
    #[error("invalid step pattern `{pattern}`: {source}")]
    Pattern {
        /// Pattern text.
        pattern: String,
        /// Compilation error.
        #[source]
        source: PatternError,
    },
}

/// A step implementation bound to a kind and a pattern.
pub struct StepDefinition {
    name: String,
    kind: StepKind,
    pattern: CompiledPattern,
    params: Vec<String>,
    handler: Arc<StepHandler>,
    used: AtomicBool,
}

impl StepDefinition {
    /// Compile `pattern` and wrap `handler`.
    ///
    /// The definition is named after its pattern text until
    /// [`named`](Self::named) says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Pattern`] when the pattern does not compile.
    pub fn new<F>(kind: StepKind, pattern: &str, handler: F) -> Result<Self, RegistryError>
    where
        F: Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError>
            + Send
            + Sync
            + 'static,
    {
        let compiled =
            CompiledPattern::compile(pattern).map_err(|source| RegistryError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self {
            name: pattern.to_owned(),
            kind,
            pattern: compiled,
            params: Vec::new(),
            handler: Arc::new(handler),
            used: AtomicBool::new(false),
        })
    }

    /// Store this step's return value under `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare the argument and context names the step reads.
    ///
    /// Names bound by a placeholder capture or an example column are checked
    /// when the scenario is collected; the rest must be present in the
    /// [`StepContext`] when the step runs.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Context key for the returned value.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind this definition answers to.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Declared parameter names.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Whether any scenario has resolved a step to this definition.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    pub(crate) fn call(
        &self,
        ctx: &mut StepContext,
        args: &StepArgs,
    ) -> Result<StepExecution, StepError> {
        (self.handler)(ctx, args)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A definition matched against concrete step text.
#[derive(Debug, Clone)]
pub struct StepMatch {
    /// Matched definition.
    pub definition: Arc<StepDefinition>,
    /// Placeholder captures in pattern order.
    pub captures: Vec<(String, String)>,
}

/// Explicit mapping from (kind, pattern) to step definitions.
///
/// # Examples
///
/// ```
/// use stepwise::{StepExecution, StepKind, StepRegistry};
///
/// let mut registry = StepRegistry::new();
/// registry.given("there are {count:u32} cucumbers", |_, args| {
///     args.parse::<u32>("count")?;
///     Ok(StepExecution::done())
/// })?;
/// let found = registry.find(StepKind::Given, "there are 12 cucumbers");
/// assert!(found.is_some());
/// # Ok::<(), stepwise::RegistryError>(())
/// ```
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<Arc<StepDefinition>>,
    index: HashMap<(StepKind, String), usize>,
}

impl StepRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the kind and pattern are
    /// already registered.
    pub fn register(
        &mut self,
        definition: StepDefinition,
    ) -> Result<Arc<StepDefinition>, RegistryError> {
        let key = (definition.kind, definition.pattern.as_str().to_owned());
        if self.index.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                kind: key.0,
                pattern: key.1,
            });
        }
        let definition = Arc::new(definition);
        self.index.insert(key, self.definitions.len());
        self.definitions.push(Arc::clone(&definition));
        Ok(definition)
    }

    fn register_handler<F>(
        &mut self,
        kind: StepKind,
        pattern: &str,
        handler: F,
    ) -> Result<Arc<StepDefinition>, RegistryError>
    where
        F: Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.register(StepDefinition::new(kind, pattern, handler)?)
    }

    /// Register a `Given` handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register) and [`StepDefinition::new`].
    pub fn given<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<Arc<StepDefinition>, RegistryError>
    where
        F: Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.register_handler(StepKind::Given, pattern, handler)
    }

    /// Register a `When` handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register) and [`StepDefinition::new`].
    pub fn when<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<Arc<StepDefinition>, RegistryError>
    where
        F: Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.register_handler(StepKind::When, pattern, handler)
    }

    /// Register a `Then` handler.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register) and [`StepDefinition::new`].
    pub fn then<F>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<Arc<StepDefinition>, RegistryError>
    where
        F: Fn(&mut StepContext, &StepArgs) -> Result<StepExecution, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.register_handler(StepKind::Then, pattern, handler)
    }

    /// Resolve `text` for a step of `kind`.
    #[must_use]
    pub fn find(&self, kind: StepKind, text: &str) -> Option<StepMatch> {
        let found = self.find_exact(kind, text).or_else(|| self.find_best(kind, text))?;
        found.definition.used.store(true, Ordering::Relaxed);
        Some(found)
    }

    fn find_exact(&self, kind: StepKind, text: &str) -> Option<StepMatch> {
        let position = *self.index.get(&(kind, text.to_owned()))?;
        let definition = self.definitions.get(position)?;
        // Placeholder-free patterns match themselves with no captures; a
        // pattern that contains placeholders is still run through its regex.
        let captures = definition.pattern.captures(text).unwrap_or_default();
        Some(StepMatch {
            definition: Arc::clone(definition),
            captures,
        })
    }

    fn find_best(&self, kind: StepKind, text: &str) -> Option<StepMatch> {
        let mut best: Option<StepMatch> = None;
        for definition in self.definitions.iter().filter(|d| d.kind == kind) {
            let Some(captures) = definition.pattern.captures(text) else {
                continue;
            };
            let better = best.as_ref().is_none_or(|current| {
                definition.pattern.specificity() > current.definition.pattern.specificity()
            });
            if better {
                best = Some(StepMatch {
                    definition: Arc::clone(definition),
                    captures,
                });
            }
        }
        best
    }

    /// Every definition in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<StepDefinition>> {
        self.definitions.iter()
    }

    /// Definitions no lookup has resolved to yet.
    #[must_use]
    pub fn unused(&self) -> Vec<Arc<StepDefinition>> {
        self.definitions
            .iter()
            .filter(|d| !d.is_used())
            .cloned()
            .collect()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn noop(_: &mut StepContext, _: &StepArgs) -> Result<StepExecution, StepError> {
        Ok(StepExecution::done())
    }

    #[fixture]
    fn registry() -> StepRegistry {
        let mut registry = StepRegistry::new();
        for pattern in [
            "I eat {count} cucumbers",
            "I eat {count:u32} cucumbers",
            "I eat 5 cucumbers",
            "I {verb} {count} cucumbers",
        ] {
            registry
                .when(pattern, noop)
                .unwrap_or_else(|err| panic!("{pattern}: {err}"));
        }
        registry
    }

    fn matched(registry: &StepRegistry, kind: StepKind, text: &str) -> String {
        registry
            .find(kind, text)
            .map(|m| m.definition.pattern().as_str().to_owned())
            .unwrap_or_else(|| panic!("{text:?} should match"))
    }

    #[rstest]
    fn exact_pattern_wins(registry: StepRegistry) {
        assert_eq!(
            matched(&registry, StepKind::When, "I eat 5 cucumbers"),
            "I eat 5 cucumbers"
        );
    }

    #[rstest]
    fn most_specific_placeholder_pattern_wins(registry: StepRegistry) {
        assert_eq!(
            matched(&registry, StepKind::When, "I eat 7 cucumbers"),
            "I eat {count:u32} cucumbers"
        );
        assert_eq!(
            matched(&registry, StepKind::When, "I eat many cucumbers"),
            "I eat {count} cucumbers"
        );
        assert_eq!(
            matched(&registry, StepKind::When, "I peel 3 cucumbers"),
            "I {verb} {count} cucumbers"
        );
    }

    #[rstest]
    fn kinds_are_separate(registry: StepRegistry) {
        assert!(registry.find(StepKind::Given, "I eat 5 cucumbers").is_none());
    }

    #[rstest]
    fn captures_follow_pattern_order(registry: StepRegistry) {
        let Some(found) = registry.find(StepKind::When, "I peel 3 cucumbers") else {
            panic!("should match");
        };
        assert_eq!(
            found.captures,
            vec![
                ("verb".to_owned(), "peel".to_owned()),
                ("count".to_owned(), "3".to_owned()),
            ]
        );
    }

    #[test]
    fn equally_specific_patterns_keep_registration_order() {
        let mut registry = StepRegistry::new();
        for pattern in ["{a} and more", "more and {b}"] {
            registry
                .given(pattern, noop)
                .unwrap_or_else(|err| panic!("{pattern}: {err}"));
        }
        assert_eq!(
            matched(&registry, StepKind::Given, "more and more"),
            "{a} and more"
        );
    }

    #[rstest]
    fn duplicates_are_rejected(mut registry: StepRegistry) {
        let Err(err) = registry.when("I eat {count} cucumbers", noop) else {
            panic!("duplicate should be rejected");
        };
        assert!(matches!(err, RegistryError::Duplicate { kind: StepKind::When, .. }));
        assert!(registry.given("I eat {count} cucumbers", noop).is_ok());
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let mut registry = StepRegistry::new();
        let Err(err) = registry.then("I have {left", noop) else {
            panic!("unclosed placeholder should be rejected");
        };
        assert!(matches!(err, RegistryError::Pattern { .. }));
        assert!(registry.is_empty());
    }

    #[rstest]
    fn lookups_mark_definitions_used(registry: StepRegistry) {
        assert_eq!(registry.unused().len(), 4);
        let _ = registry.find(StepKind::When, "I eat 5 cucumbers");
        let unused: Vec<_> = registry
            .unused()
            .iter()
            .map(|d| d.pattern().as_str().to_owned())
            .collect();
        assert!(!unused.iter().any(|p| p == "I eat 5 cucumbers"));
        assert_eq!(unused.len(), 3);
    }

    #[test]
    fn definitions_default_their_name_to_the_pattern() {
        let definition = StepDefinition::new(StepKind::Given, "a basket", noop)
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(definition.name(), "a basket");
        let definition = definition.named("basket").with_params(["size"]);
        assert_eq!(definition.name(), "basket");
        assert_eq!(definition.params(), ["size".to_owned()]);
    }
}
