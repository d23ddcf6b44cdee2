//! Placeholder substitution and keyword normalisation for one instance.

use indexmap::IndexMap;
use stepwise_patterns::{StepKeyword, StepKind, substitute_outline};

use crate::model::StepTemplate;

/// A step ready for matching: placeholders substituted, kind resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    /// Literal keyword as written.
    pub keyword: String,
    /// Semantic kind after conjunction inheritance.
    pub kind: StepKind,
    /// Text with raw example cells substituted; used for matching.
    pub text: String,
    /// Text as written, placeholders intact; used in reports.
    pub template: String,
    /// 1-based line of the step.
    pub line_number: usize,
    /// Doc string with placeholders substituted.
    pub docstring: Option<String>,
    /// Data table with placeholders substituted cell by cell.
    pub table: Option<Vec<Vec<String>>>,
}

/// Resolve `templates` against one raw example row.
///
/// An empty row leaves every text unchanged. Kinds are computed in a single
/// pass: `And`/`But` inherit from the nearest preceding primary keyword,
/// defaulting to `given`. A keyword the literal parser does not know keeps the
/// kind the feature parser assigned.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use stepwise::{StepTemplate, resolve_steps};
/// use stepwise_patterns::StepKind;
///
/// let row = IndexMap::from([("start".to_string(), "12".to_string())]);
/// let steps = resolve_steps(
///     &[
///         StepTemplate::new("When", "I wait", 3),
///         StepTemplate::new("And", "there are <start> cucumbers", 4),
///     ],
///     &row,
/// );
/// assert_eq!(steps[1].kind, StepKind::When);
/// assert_eq!(steps[1].text, "there are 12 cucumbers");
/// assert_eq!(steps[1].template, "there are <start> cucumbers");
/// ```
#[must_use]
pub fn resolve_steps(
    templates: &[StepTemplate],
    raw_row: &IndexMap<String, String>,
) -> Vec<ResolvedStep> {
    let lookup = |name: &str| raw_row.get(name).map(String::as_str);
    let substitute = |text: &str| substitute_outline(text, lookup).into_owned();
    let mut prev = None;
    templates
        .iter()
        .map(|template| ResolvedStep {
            keyword: template.keyword.clone(),
            kind: resolve_kind(template, &mut prev),
            text: substitute(&template.text),
            template: template.text.clone(),
            line_number: template.line_number,
            docstring: template.docstring.as_deref().map(substitute),
            table: template.table.as_ref().map(|rows| {
                rows.iter()
                    .map(|row| row.iter().map(|cell| substitute(cell)).collect())
                    .collect()
            }),
        })
        .collect()
}

fn resolve_kind(template: &StepTemplate, prev: &mut Option<StepKind>) -> StepKind {
    match template.keyword.parse::<StepKeyword>() {
        Ok(keyword) => keyword.resolve(prev),
        Err(_) => {
            let kind = template
                .parsed_kind
                .or(*prev)
                .unwrap_or(StepKind::Given);
            *prev = Some(kind);
            kind
        }
    }
}
