//! Contract between the engine and a host test framework.
//!
//! [`collect_scenarios`] turns a feature into one [`ScenarioTest`] per
//! scenario instance, resolving every step against the registry up front so
//! unmatched steps and bad example cells surface before anything runs.
//! Running a test yields a [`PhaseReport`] for the `call` phase carrying the
//! scenario report, and attaches the same report to the test's [`TestItem`].

mod adapter;
mod runner;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use adapter::{HarnessAdapter, StdHarness};
pub use runner::{ScenarioMetadata, ScenarioRunRequest};

use crate::config::{ALLOW_SKIPPED_TAG, fail_on_skipped};
use crate::converters::ExampleConverters;
use crate::execution::{BoundStep, ScenarioExecution, ScenarioOutcome};
use crate::model::{Feature, Scenario};
use crate::outline::{CollectionError, ScenarioInstance, expand};
use crate::registry::StepRegistry;
use crate::reporting::{
    self, FailedScenario, ScenarioRecord, ScenarioReport, ScenarioStatus, SkippedScenario,
};
use crate::resolver::ResolvedStep;
use crate::{ConvertedValue, StepArgs, StepContext};

/// Test phase a [`PhaseReport`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// The phase that runs the scenario's steps.
    Call,
}

/// Outcome reported to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// Every step completed.
    Passed,
    /// A step failed, or a skip was turned into a failure.
    Failed,
    /// A step skipped.
    Skipped,
}

/// Result of one test phase, with the scenario report attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Test identifier.
    pub nodeid: String,
    /// Phase described.
    pub when: Phase,
    /// Host-facing outcome.
    pub outcome: TestOutcome,
    /// Failure text or skip reason.
    pub longrepr: Option<String>,
    /// Seconds spent running the scenario.
    pub duration: f64,
    /// Structured scenario report.
    pub scenario: ScenarioReport,
}

/// Host-side handle of a collected test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    /// Test identifier.
    pub nodeid: String,
    /// Report of the most recent run, for cross-process consumers.
    pub scenario_report: Option<ScenarioReport>,
}

/// One runnable scenario instance with its steps bound to definitions.
#[derive(Debug, Clone)]
pub struct ScenarioTest {
    /// Deterministic test name.
    pub name: String,
    /// Owning feature.
    pub feature: Arc<Feature>,
    /// Expanded instance.
    pub instance: ScenarioInstance,
    /// Bound steps in execution order.
    pub steps: Vec<BoundStep>,
    /// Host-side handle the report is attached to.
    pub item: TestItem,
}

impl ScenarioTest {
    /// Metadata handed to the harness adapter.
    #[must_use]
    pub fn metadata(&self) -> ScenarioMetadata {
        ScenarioMetadata::from(self)
    }

    /// Run with an empty context on the calling thread.
    pub fn run(&mut self) -> PhaseReport {
        self.run_with(StepContext::new())
    }

    /// Run with a pre-populated context on the calling thread.
    pub fn run_with(&mut self, ctx: StepContext) -> PhaseReport {
        self.run_in(&StdHarness::new(), ctx)
    }

    /// Run inside `harness`.
    ///
    /// The outcome is recorded in the [`reporting`] collector and the report
    /// is attached to [`item`](Self::item).
    pub fn run_in<H: HarnessAdapter>(&mut self, harness: &H, ctx: StepContext) -> PhaseReport {
        let execution = harness.run(ScenarioRunRequest::new(self.metadata(), &self.steps, ctx));
        let report = ScenarioReport::build(&self.feature, &self.instance, &execution);
        let (outcome, longrepr, status) = self.settle(&execution);
        log::debug!("{} {}", self.name, outcome_label(outcome));

        reporting::record(ScenarioRecord::new(
            self.name.clone(),
            status,
            report.clone(),
        ));
        self.item.scenario_report = Some(report.clone());
        PhaseReport {
            nodeid: self.name.clone(),
            when: Phase::Call,
            outcome,
            longrepr,
            duration: execution.duration.as_secs_f64(),
            scenario: report,
        }
    }

    fn allows_skipping(&self) -> bool {
        self.feature.tags.contains_tag(ALLOW_SKIPPED_TAG)
            || self.instance.tags.contains_tag(ALLOW_SKIPPED_TAG)
    }

    fn settle(
        &self,
        execution: &ScenarioExecution,
    ) -> (TestOutcome, Option<String>, ScenarioStatus) {
        match &execution.outcome {
            ScenarioOutcome::Passed => (TestOutcome::Passed, None, ScenarioStatus::Passed),
            ScenarioOutcome::Failed(failure) => {
                let message = failure.to_string();
                (
                    TestOutcome::Failed,
                    Some(message.clone()),
                    ScenarioStatus::Failed(FailedScenario::new(message, failure.line_number)),
                )
            }
            ScenarioOutcome::Skipped { message } => {
                let allow_skipped = self.allows_skipping();
                let forced_failure = !allow_skipped && fail_on_skipped();
                let status = ScenarioStatus::Skipped(SkippedScenario::new(
                    message.clone(),
                    allow_skipped,
                    forced_failure,
                ));
                if forced_failure {
                    let reason = message.as_deref().unwrap_or("no reason given");
                    (
                        TestOutcome::Failed,
                        Some(format!(
                            "scenario {:?} skipped while fail-on-skipped is enabled: {reason}",
                            self.instance.name
                        )),
                        status,
                    )
                } else {
                    (TestOutcome::Skipped, message.clone(), status)
                }
            }
        }
    }
}

fn outcome_label(outcome: TestOutcome) -> &'static str {
    match outcome {
        TestOutcome::Passed => "passed",
        TestOutcome::Failed => "failed",
        TestOutcome::Skipped => "skipped",
    }
}

/// Collect every scenario of `feature`.
///
/// # Errors
///
/// Returns the first [`CollectionError`] met while expanding outlines or
/// binding steps.
pub fn collect_scenarios(
    feature: &Arc<Feature>,
    registry: &StepRegistry,
    converters: &ExampleConverters,
) -> Result<Vec<ScenarioTest>, CollectionError> {
    let mut names = HashSet::new();
    let mut tests = Vec::new();
    for scenario in &feature.scenarios {
        tests.extend(collect(feature, scenario, registry, converters, &mut names)?);
    }
    log::debug!(
        "collected {} tests from {}",
        tests.len(),
        feature.rel_filename
    );
    Ok(tests)
}

/// Collect the scenario called `name`.
///
/// # Errors
///
/// Returns [`CollectionError::UnknownScenario`] when the feature has no such
/// scenario, otherwise as [`collect_scenarios`].
pub fn collect_scenario(
    feature: &Arc<Feature>,
    registry: &StepRegistry,
    converters: &ExampleConverters,
    name: &str,
) -> Result<Vec<ScenarioTest>, CollectionError> {
    let scenario = feature
        .scenario(name)
        .ok_or_else(|| CollectionError::UnknownScenario {
            feature: feature.rel_filename.clone(),
            scenario: name.to_owned(),
        })?;
    collect(feature, scenario, registry, converters, &mut HashSet::new())
}

fn collect(
    feature: &Arc<Feature>,
    scenario: &Scenario,
    registry: &StepRegistry,
    converters: &ExampleConverters,
    names: &mut HashSet<String>,
) -> Result<Vec<ScenarioTest>, CollectionError> {
    expand(feature, scenario, converters)?
        .into_iter()
        .map(|instance| -> Result<ScenarioTest, CollectionError> {
            let steps = instance
                .steps
                .iter()
                .map(|step| bind_step(&instance, step, registry))
                .collect::<Result<Vec<_>, _>>()?;
            let name = dedupe_name(test_name(&instance), names);
            Ok(ScenarioTest {
                item: TestItem {
                    nodeid: name.clone(),
                    scenario_report: None,
                },
                name,
                feature: Arc::clone(feature),
                instance,
                steps,
            })
        })
        .collect()
}

fn bind_step(
    instance: &ScenarioInstance,
    step: &ResolvedStep,
    registry: &StepRegistry,
) -> Result<BoundStep, CollectionError> {
    let found = registry
        .find(step.kind, &step.text)
        .or_else(|| {
            (step.template != step.text)
                .then(|| registry.find(step.kind, &step.template))
                .flatten()
        })
        .ok_or_else(|| CollectionError::StepNotFound {
            scenario: instance.name.clone(),
            keyword: step.keyword.clone(),
            kind: step.kind.as_str().to_owned(),
            text: step.text.clone(),
            line_number: step.line_number,
        })?;

    let mut args = StepArgs::new()
        .with_docstring(step.docstring.clone())
        .with_table(step.table.clone());
    for (name, value) in found.captures {
        args = args.with_capture(name, value);
    }
    if let Some(row) = &instance.example {
        for (name, value) in &row.values {
            args = args.with_example(name.clone(), value.clone());
        }
    }
    let fixtures = found
        .definition
        .params()
        .iter()
        .filter(|param| !args.contains(param))
        .cloned()
        .collect();
    Ok(BoundStep {
        step: step.clone(),
        definition: found.definition,
        args,
        fixtures,
    })
}

fn test_name(instance: &ScenarioInstance) -> String {
    let base = format!("test_{}", snake_case(&instance.name));
    let Some(row) = &instance.example else {
        return base;
    };
    let labels: Vec<_> = row.values.values().map(ConvertedValue::label).collect();
    format!("{base}[{}]", labels.join("-"))
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "scenario".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn dedupe_name(name: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(name.clone()) {
        return name;
    }
    let mut n = 1_usize;
    loop {
        let candidate = format!("{name}_{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Passing", "passing")]
    #[case("Eat cucumbers, then rest!", "eat_cucumbers_then_rest")]
    #[case("  Leading and trailing  ", "leading_and_trailing")]
    #[case("Ünïcode Straße", "ünïcode_straße")]
    #[case("!!!", "scenario")]
    fn scenario_names_become_snake_case(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(snake_case(name), expected);
    }

    #[test]
    fn repeated_names_get_numbered() {
        let mut seen = HashSet::new();
        let names: Vec<_> = ["test_a", "test_a", "test_a", "test_b"]
            .into_iter()
            .map(|name| dedupe_name(name.to_owned(), &mut seen))
            .collect();
        assert_eq!(names, ["test_a", "test_a_1", "test_a_2", "test_b"]);
    }

    #[rstest]
    #[case(TestOutcome::Passed, "passed")]
    #[case(TestOutcome::Failed, "failed")]
    #[case(TestOutcome::Skipped, "skipped")]
    fn outcome_labels_match_serde(#[case] outcome: TestOutcome, #[case] label: &str) {
        assert_eq!(outcome_label(outcome), label);
        assert_eq!(
            serde_json::to_value(outcome).ok(),
            Some(serde_json::Value::from(label))
        );
    }
}
