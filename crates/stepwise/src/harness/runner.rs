//! What a harness adapter is handed for one scenario instance.

use indexmap::IndexMap;

use super::ScenarioTest;
use crate::StepContext;
use crate::execution::{BoundStep, ScenarioExecution, execute};

/// Identity of the scenario instance an adapter is about to run.
///
/// Built from a collected [`ScenarioTest`], so adapters can label spans,
/// pick fixtures per example row, or route by tag without reaching into the
/// feature model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioMetadata {
    nodeid: String,
    feature_path: String,
    scenario_name: String,
    scenario_line: usize,
    tags: Vec<String>,
    row_index: Option<usize>,
    example_kwargs: IndexMap<String, String>,
}

impl ScenarioMetadata {
    /// Test identifier, e.g. `test_outlined[12-5.0-7]`.
    #[must_use]
    pub fn nodeid(&self) -> &str {
        &self.nodeid
    }

    /// Feature file relative to the invocation root.
    #[must_use]
    pub fn feature_path(&self) -> &str {
        &self.feature_path
    }

    /// Scenario name.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// One-based line of the scenario keyword.
    #[must_use]
    pub const fn scenario_line(&self) -> usize {
        self.scenario_line
    }

    /// Scenario-level tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Row position within its Examples block; `None` for a plain scenario.
    #[must_use]
    pub const fn row_index(&self) -> Option<usize> {
        self.row_index
    }

    /// Parameter labels of the example row, header order.
    #[must_use]
    pub fn example_kwargs(&self) -> &IndexMap<String, String> {
        &self.example_kwargs
    }
}

impl From<&ScenarioTest> for ScenarioMetadata {
    fn from(test: &ScenarioTest) -> Self {
        Self {
            nodeid: test.name.clone(),
            feature_path: test.feature.rel_filename.clone(),
            scenario_name: test.instance.name.clone(),
            scenario_line: test.instance.line_number,
            tags: test.instance.tags.to_vec(),
            row_index: test.instance.example.as_ref().map(|row| row.row_index),
            example_kwargs: test.instance.example_kwargs(),
        }
    }
}

/// A request to run one scenario instance's bound steps.
///
/// The adapter may seed the context before calling [`run`](Self::run), which
/// must happen exactly once and on the thread that owns the request.
pub struct ScenarioRunRequest<'a> {
    metadata: ScenarioMetadata,
    steps: &'a [BoundStep],
    context: StepContext,
}

impl<'a> ScenarioRunRequest<'a> {
    /// Create a request for `steps`, starting from `context`.
    #[must_use]
    pub fn new(metadata: ScenarioMetadata, steps: &'a [BoundStep], context: StepContext) -> Self {
        Self {
            metadata,
            steps,
            context,
        }
    }

    /// Scenario identity for diagnostics or harness setup.
    #[must_use]
    pub fn metadata(&self) -> &ScenarioMetadata {
        &self.metadata
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &'a [BoundStep] {
        self.steps
    }

    /// Context the steps will run against, for fixture injection.
    pub fn context_mut(&mut self) -> &mut StepContext {
        &mut self.context
    }

    /// Run the steps in order.
    pub fn run(self) -> ScenarioExecution {
        let Self {
            steps, mut context, ..
        } = self;
        execute(steps, &mut context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use camino::Utf8Path;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::harness::collect_scenarios;
    use crate::{ExampleConverters, StepError, StepExecution, StepRegistry, parse_feature};

    const FEATURE: &str = "\
Feature: Pantry
  @stock
  Scenario: Empty shelf
    Given a shelf

  Scenario Outline: Stocked shelf
    Given a shelf
    Then it holds <jars> jars of <jam>

    Examples:
      | jars | jam    |
      | 3    | quince |
      | 1    | fig    |
";

    #[fixture]
    fn tests() -> Vec<ScenarioTest> {
        let feature = parse_feature(FEATURE, "/pantry/shelf.feature", Utf8Path::new("/pantry"))
            .unwrap_or_else(|err| panic!("{err}"));
        let mut registry = StepRegistry::new();
        let registered = [
            registry.given("a shelf", |_, _| Ok(StepExecution::done())),
            registry.then("it holds {jars:u8} jars of {jam}", |ctx, args| {
                let stocked = ctx.require::<u8>("stocked")?;
                if *stocked == args.parse::<u8>("jars")? {
                    Ok(StepExecution::done())
                } else {
                    Err(StepError::msg(format!("shelf holds {stocked} jars")))
                }
            }),
        ];
        for result in registered {
            if let Err(err) = result {
                panic!("{err}");
            }
        }
        let converters = ExampleConverters::new().parse::<u8>("jars");
        collect_scenarios(&Arc::new(feature), &registry, &converters)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    #[rstest]
    fn plain_scenario_has_no_example_row(tests: Vec<ScenarioTest>) {
        let Some(test) = tests.first() else {
            panic!("no tests collected");
        };
        let metadata = ScenarioMetadata::from(test);
        assert_eq!(metadata.nodeid(), "test_empty_shelf");
        assert_eq!(metadata.feature_path(), "shelf.feature");
        assert_eq!(metadata.scenario_line(), 3);
        assert_eq!(metadata.tags(), ["stock"]);
        assert_eq!(metadata.row_index(), None);
        assert!(metadata.example_kwargs().is_empty());
    }

    #[rstest]
    fn outline_instance_carries_its_row(tests: Vec<ScenarioTest>) {
        let Some(test) = tests.last() else {
            panic!("no tests collected");
        };
        let metadata = ScenarioMetadata::from(test);
        assert_eq!(metadata.nodeid(), "test_stocked_shelf[1-fig]");
        assert_eq!(metadata.scenario_name(), "Stocked shelf");
        assert_eq!(metadata.row_index(), Some(1));
        let kwargs: Vec<_> = metadata
            .example_kwargs()
            .iter()
            .map(|(name, label)| (name.as_str(), label.as_str()))
            .collect();
        assert_eq!(kwargs, [("jars", "1"), ("jam", "fig")]);
    }

    #[rstest]
    #[case(1, "passed")]
    #[case(2, "failed")]
    fn seeded_context_reaches_steps(
        tests: Vec<ScenarioTest>,
        #[case] stocked: u8,
        #[case] expected: &str,
    ) {
        let Some(test) = tests.last() else {
            panic!("no tests collected");
        };
        let mut request =
            ScenarioRunRequest::new(ScenarioMetadata::from(test), &test.steps, StepContext::new());
        assert_eq!(request.steps().len(), 2);
        request.context_mut().insert("stocked", stocked);
        let execution = request.run();
        assert_eq!(execution.outcome.as_str(), expected);
    }
}
