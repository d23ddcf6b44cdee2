//! Expansion of scenarios and scenario outlines into runnable instances.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::converters::ExampleConverters;
use crate::model::{Examples, Feature, Scenario, Tags};
use crate::resolver::{ResolvedStep, resolve_steps};
use crate::value::{ConvertedValue, ReportValue};

/// Failure to turn a scenario into runnable instances.
///
/// These surface while collecting tests, before any step runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CollectionError {
    /// A data row does not have one cell per header column.
    #[error(
        "scenario {scenario:?}: examples row {row_index} at line {line_number} has {found} \
         cells but the header has {expected}"
    )]
    MalformedExamples {
        /// Scenario name.
        scenario: String,
        /// Line of the Examples block.
        line_number: usize,
        /// Zero-based data row index within the block.
        row_index: usize,
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },
    /// A converter rejected a cell.
    #[error(
        "scenario {scenario:?}: cannot convert example parameter `{parameter}` value {value:?} \
         in row {row_index}: {reason}"
    )]
    Conversion {
        /// Scenario name.
        scenario: String,
        /// Parameter (column) name.
        parameter: String,
        /// Raw cell text.
        value: String,
        /// Zero-based data row index within the block.
        row_index: usize,
        /// Converter message.
        reason: String,
    },
    /// No registered step definition matches a step.
    #[error(
        "scenario {scenario:?}: no {kind} step matches `{keyword} {text}` at line {line_number}"
    )]
    StepNotFound {
        /// Scenario name.
        scenario: String,
        /// Literal keyword.
        keyword: String,
        /// Resolved kind, lowercase.
        kind: String,
        /// Substituted step text.
        text: String,
        /// Line of the step.
        line_number: usize,
    },
    /// A scenario requested by name does not exist in the feature.
    #[error("feature {feature:?} has no scenario named {scenario:?}")]
    UnknownScenario {
        /// Feature file name.
        feature: String,
        /// Requested scenario name.
        scenario: String,
    },
}

/// Header and converted rows of one Examples block, shared by its instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamplesSnapshot {
    /// Optional title.
    pub name: Option<String>,
    /// Line of the `Examples:` keyword.
    pub line_number: usize,
    /// Parameter names.
    pub header: Vec<String>,
    /// Every data row, projected to report values in header order.
    pub rows: Vec<Vec<ReportValue>>,
}

/// The example row an outline instance was drawn from.
#[derive(Debug, Clone)]
pub struct ExampleRow {
    /// The block this row belongs to.
    pub examples: Arc<ExamplesSnapshot>,
    /// Zero-based position within the block's data rows.
    pub row_index: usize,
    /// Raw cell text by parameter, header order.
    pub raw: IndexMap<String, String>,
    /// Converted values by parameter, header order.
    pub values: IndexMap<String, ConvertedValue>,
}

impl ExampleRow {
    /// Parameter name to converted-value label, header order.
    #[must_use]
    pub fn kwargs(&self) -> IndexMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.label().to_owned()))
            .collect()
    }
}

/// One runnable expansion of a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioInstance {
    /// Scenario name.
    pub name: String,
    /// Line of the scenario keyword.
    pub line_number: usize,
    /// Scenario-level tags.
    pub tags: Tags,
    /// Background and scenario steps, resolved for this row.
    pub steps: Vec<ResolvedStep>,
    /// Source row; `None` for a plain scenario.
    pub example: Option<ExampleRow>,
}

impl ScenarioInstance {
    /// Labels of the row's converted values; empty for a plain scenario.
    #[must_use]
    pub fn example_kwargs(&self) -> IndexMap<String, String> {
        self.example
            .as_ref()
            .map(ExampleRow::kwargs)
            .unwrap_or_default()
    }
}

/// Expand `scenario` into its instances.
///
/// A plain scenario yields one instance. An outline yields one instance per
/// data row of every Examples block, in declaration order; a block without a
/// header row yields none. Feature background steps are prepended.
///
/// # Errors
///
/// Returns [`CollectionError::MalformedExamples`] when a row's width differs
/// from its header and [`CollectionError::Conversion`] when a converter
/// rejects a cell.
pub fn expand(
    feature: &Feature,
    scenario: &Scenario,
    converters: &ExampleConverters,
) -> Result<Vec<ScenarioInstance>, CollectionError> {
    let templates: Vec<_> = feature
        .background
        .iter()
        .chain(&scenario.steps)
        .cloned()
        .collect();
    let instance = |steps, example| ScenarioInstance {
        name: scenario.name.clone(),
        line_number: scenario.line_number,
        tags: scenario.tags.clone(),
        steps,
        example,
    };

    if !scenario.is_outline() {
        return Ok(vec![instance(resolve_steps(&templates, &IndexMap::new()), None)]);
    }

    let mut instances = Vec::new();
    for examples in &scenario.examples {
        for row in convert_block(scenario, examples, converters)? {
            instances.push(instance(resolve_steps(&templates, &row.raw), Some(row)));
        }
    }
    log::debug!(
        "expanded outline {:?} into {} instances",
        scenario.name,
        instances.len()
    );
    Ok(instances)
}

fn convert_block(
    scenario: &Scenario,
    examples: &Examples,
    converters: &ExampleConverters,
) -> Result<Vec<ExampleRow>, CollectionError> {
    if examples.header.is_empty() {
        return Ok(Vec::new());
    }
    let mut raw_rows = Vec::with_capacity(examples.rows.len());
    let mut converted_rows = Vec::with_capacity(examples.rows.len());
    for (row_index, cells) in examples.rows.iter().enumerate() {
        if cells.len() != examples.header.len() {
            return Err(CollectionError::MalformedExamples {
                scenario: scenario.name.clone(),
                line_number: examples.line_number,
                row_index,
                expected: examples.header.len(),
                found: cells.len(),
            });
        }
        let mut raw = IndexMap::with_capacity(cells.len());
        let mut values = IndexMap::with_capacity(cells.len());
        for (parameter, cell) in examples.header.iter().zip(cells) {
            let value = converters.convert(parameter, cell).map_err(|reason| {
                CollectionError::Conversion {
                    scenario: scenario.name.clone(),
                    parameter: parameter.clone(),
                    value: cell.clone(),
                    row_index,
                    reason,
                }
            })?;
            raw.insert(parameter.clone(), cell.clone());
            values.insert(parameter.clone(), value);
        }
        raw_rows.push(raw);
        converted_rows.push(values);
    }

    let snapshot = Arc::new(ExamplesSnapshot {
        name: examples.name.clone(),
        line_number: examples.line_number,
        header: examples.header.clone(),
        rows: converted_rows
            .iter()
            .map(|values| values.values().map(|v| v.report_value().clone()).collect())
            .collect(),
    });
    Ok(raw_rows
        .into_iter()
        .zip(converted_rows)
        .enumerate()
        .map(|(row_index, (raw, values))| ExampleRow {
            examples: Arc::clone(&snapshot),
            row_index,
            raw,
            values,
        })
        .collect())
}
