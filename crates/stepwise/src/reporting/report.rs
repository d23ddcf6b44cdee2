//! Serializable snapshot of one executed scenario instance.
//!
//! A [`ScenarioReport`] holds only strings, numbers, booleans and nulls.
//! Converted example values appear through their labels and
//! [`ReportValue`] projections, never as the objects step handlers received,
//! so a report survives any serialization boundary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ReportValue;
use crate::execution::ScenarioExecution;
use crate::model::Feature;
use crate::outline::ScenarioInstance;

/// Feature section of a scenario report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    /// Feature title.
    pub name: String,
    /// Absolute path of the feature file.
    pub filename: String,
    /// Path relative to the invocation root.
    pub rel_filename: String,
    /// Line of the `Feature:` keyword.
    pub line_number: usize,
    /// Free-form description; empty when absent.
    pub description: String,
    /// Feature-level tags.
    pub tags: Vec<String>,
}

/// One attempted or skipped step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Literal keyword as written.
    pub keyword: String,
    /// Step text before outline substitution.
    pub name: String,
    /// Line of the step.
    pub line_number: usize,
    /// Normalised role: `given`, `when` or `then`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the step failed.
    pub failed: bool,
    /// Whether the step was skipped.
    pub skipped: bool,
    /// Seconds spent in the handler.
    pub duration: f64,
}

/// The Examples block an outline instance was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplesReport {
    /// Optional block title.
    pub name: Option<String>,
    /// Line of the `Examples:` keyword.
    pub line_number: usize,
    /// Header and every converted data row of the block.
    pub rows: (Vec<String>, Vec<Vec<ReportValue>>),
    /// Row that produced this instance.
    pub row_index: usize,
}

/// Structured report attached to a scenario's test outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Owning feature.
    pub feature: FeatureReport,
    /// Scenario title.
    pub name: String,
    /// Line of the scenario keyword.
    pub line_number: usize,
    /// Scenario-level tags, without the feature's.
    pub tags: Vec<String>,
    /// Steps in execution order.
    pub steps: Vec<StepReport>,
    /// Source block for outline instances; empty otherwise.
    pub examples: Vec<ExamplesReport>,
    /// Parameter labels in header order; empty for plain scenarios.
    pub example_kwargs: IndexMap<String, String>,
}

impl ScenarioReport {
    /// Assemble the report of a finished instance.
    ///
    /// Steps after a failure have no result and are left out.
    #[must_use]
    pub fn build(
        feature: &Feature,
        instance: &ScenarioInstance,
        execution: &ScenarioExecution,
    ) -> Self {
        let steps = execution
            .results
            .iter()
            .filter_map(|result| {
                let step = instance.steps.get(result.index)?;
                Some(StepReport {
                    keyword: step.keyword.clone(),
                    name: step.template.clone(),
                    line_number: step.line_number,
                    kind: step.kind.as_str().to_owned(),
                    failed: result.failed(),
                    skipped: result.skipped(),
                    duration: result.duration.as_secs_f64(),
                })
            })
            .collect();
        let examples = instance
            .example
            .iter()
            .map(|row| ExamplesReport {
                name: row.examples.name.clone(),
                line_number: row.examples.line_number,
                rows: (row.examples.header.clone(), row.examples.rows.clone()),
                row_index: row.row_index,
            })
            .collect();
        Self {
            feature: FeatureReport {
                name: feature.name.clone(),
                filename: feature.filename.clone(),
                rel_filename: feature.rel_filename.clone(),
                line_number: feature.line_number,
                description: feature.description.clone(),
                tags: feature.tags.to_vec(),
            },
            name: instance.name.clone(),
            line_number: instance.line_number,
            tags: instance.tags.to_vec(),
            steps,
            examples,
            example_kwargs: instance.example_kwargs(),
        }
    }

    /// The first failed step, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|step| step.failed)
    }

    /// Sum of the step durations in seconds.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(|step| step.duration).sum()
    }
}
