//! Immutable scenario model consumed by the expander and the report builder.
//!
//! The model mirrors a parsed feature file: a [`Feature`] owns its
//! [`Scenario`]s, each scenario owns ordered [`StepTemplate`]s whose text may
//! still contain `<name>` outline placeholders, and zero or more
//! [`Examples`] tables. Nothing here is mutated after parsing.

mod parse;

use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use stepwise_patterns::StepKind;

pub use parse::{FeatureLoadError, load_feature, parse_feature};

/// Ordered set of tag names.
///
/// Insertion order is kept, case is preserved, duplicates are dropped and a
/// leading `@` is stripped.
///
/// # Examples
///
/// ```
/// use stepwise::Tags;
///
/// let tags: Tags = ["@slow", "wip", "slow", "Slow"].into_iter().collect();
/// assert_eq!(&*tags, &["slow", "wip", "Slow"]);
/// assert!(tags.contains_tag("@wip"));
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tag` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = normalise_tag(tag.as_ref());
        if tag.is_empty() || self.contains_tag(tag) {
            return false;
        }
        self.0.push(tag.to_owned());
        true
    }

    /// Whether `tag` (with or without a leading `@`) is present.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        let tag = normalise_tag(tag);
        self.0.iter().any(|existing| existing == tag)
    }
}

fn normalise_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('@').unwrap_or(tag)
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

/// A parsed feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature title.
    pub name: String,
    /// Free text below the title; empty when absent.
    pub description: String,
    /// Path of the feature file as given to the loader.
    pub filename: String,
    /// `filename` relative to the invocation root.
    pub rel_filename: String,
    /// 1-based line of the `Feature:` keyword.
    pub line_number: usize,
    /// Feature-level tags, never merged into scenario tags.
    pub tags: Tags,
    /// Background steps run before every scenario.
    pub background: Vec<StepTemplate>,
    /// Scenarios in declaration order, rule scenarios flattened in place.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Find a scenario by exact name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }
}

/// A scenario or scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario title.
    pub name: String,
    /// 1-based line of the `Scenario:` keyword.
    pub line_number: usize,
    /// Scenario-level tags only.
    pub tags: Tags,
    /// Step templates, placeholders not yet substituted.
    pub steps: Vec<StepTemplate>,
    /// Examples tables; empty for a plain scenario.
    pub examples: Vec<Examples>,
}

impl Scenario {
    /// Whether the scenario expands into one instance per example row.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        !self.examples.is_empty()
    }
}

/// One step line as written in the feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTemplate {
    /// Literal keyword without surrounding whitespace, e.g. `And`.
    pub keyword: String,
    /// Step text, possibly containing `<name>` placeholders.
    pub text: String,
    /// 1-based line of the step.
    pub line_number: usize,
    /// Kind assigned by the parser, used when `keyword` is not an English
    /// keyword.
    pub parsed_kind: Option<StepKind>,
    /// Attached doc string.
    pub docstring: Option<String>,
    /// Attached data table, rows of cells.
    pub table: Option<Vec<Vec<String>>>,
}

impl StepTemplate {
    /// Create a step with no attachments.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::StepTemplate;
    ///
    /// let step = StepTemplate::new("Given", "there are <start> cucumbers", 5);
    /// assert_eq!(step.keyword, "Given");
    /// assert!(step.docstring.is_none());
    /// ```
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: impl Into<String>, line_number: usize) -> Self {
        Self {
            keyword: keyword.into().trim().to_owned(),
            text: text.into(),
            line_number,
            parsed_kind: None,
            docstring: None,
            table: None,
        }
    }

    /// Attach a doc string.
    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Attach a data table.
    #[must_use]
    pub fn with_table(mut self, rows: Vec<Vec<String>>) -> Self {
        self.table = Some(rows);
        self
    }

    /// Record the kind the parser assigned.
    #[must_use]
    pub fn with_parsed_kind(mut self, kind: StepKind) -> Self {
        self.parsed_kind = Some(kind);
        self
    }
}

/// An Examples table under a scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    /// Optional title after the `Examples:` keyword.
    pub name: Option<String>,
    /// 1-based line of the `Examples:` keyword.
    pub line_number: usize,
    /// Parameter names; empty when the table has no rows at all.
    pub header: Vec<String>,
    /// Raw data rows in declaration order.
    pub rows: Vec<Vec<String>>,
}

impl Examples {
    /// Split a raw table into header and data rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::Examples;
    ///
    /// let examples = Examples::from_table(
    ///     None,
    ///     9,
    ///     vec![
    ///         vec!["start".into(), "eat".into()],
    ///         vec!["12".into(), "5".into()],
    ///     ],
    /// );
    /// assert_eq!(examples.header, ["start", "eat"]);
    /// assert_eq!(examples.rows.len(), 1);
    /// ```
    #[must_use]
    pub fn from_table(name: Option<String>, line_number: usize, table: Vec<Vec<String>>) -> Self {
        let mut rows = table.into_iter();
        let header = rows.next().unwrap_or_default();
        Self {
            name,
            line_number,
            header,
            rows: rows.collect(),
        }
    }
}
