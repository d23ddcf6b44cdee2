//! Step definitions and fixtures shared by the behavioural tests.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use camino::Utf8Path;
use stepwise::harness::{ScenarioTest, collect_scenario};
use stepwise::{
    ExampleConverters, ExampleValue, Feature, RegistryError, StepDefinition, StepError,
    StepExecution, StepKind, StepRegistry, load_feature,
};

/// A converter result with no primitive form of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl FromStr for Point {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (x, y) = raw
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, found {raw:?}"))?;
        let parse = |part: &str| part.trim().parse::<i32>().map_err(|err| err.to_string());
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}

impl ExampleValue for Point {
    fn label(&self) -> String {
        self.to_string()
    }
}

/// The shared feature file, loaded from disk.
pub fn feature() -> Arc<Feature> {
    let root = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = root.join("tests/features/cucumbers.feature");
    Arc::new(load_feature(&path, root).unwrap_or_else(|err| panic!("{err}")))
}

/// Converters for every outline parameter in the feature.
pub fn converters() -> ExampleConverters {
    ExampleConverters::new()
        .parse::<i64>("start")
        .parse::<f64>("eat")
        .raw("left")
        .parse::<Point>("point")
}

fn must_not_run() -> Result<StepExecution, StepError> {
    panic!("steps after a skip must not run")
}

fn add<T>(result: Result<T, RegistryError>) {
    if let Err(err) = result {
        panic!("{err}");
    }
}

/// Definitions for every step in the feature.
pub fn registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    add(registry.given("a passing step", |_, _| Ok(StepExecution::done())));
    add(registry.given("some other passing step", |_, _| {
        Ok(StepExecution::done())
    }));
    add(registry.given("a failing step", |_, _| {
        Err(StepError::msg("Failed step"))
    }));
    add(registry.given("a skipping step", |_, _| stepwise::skip!("not today")));
    add(registry.given("a step that must not run", |_, _| must_not_run()));
    add(registry.given("there are {start:i64} cucumbers", |ctx, args| {
        ctx.insert("cucumbers", *args.get::<i64>("start")?);
        Ok(StepExecution::done())
    }));
    add(registry.when("I eat {eat} cucumbers", |ctx, args| {
        args.get::<f64>("eat")?;
        let eaten: i64 = args.parse("eat")?;
        let count = ctx
            .get_mut::<i64>("cucumbers")
            .ok_or_else(|| StepError::msg("the basket is missing"))?;
        *count -= eaten;
        Ok(StepExecution::done())
    }));
    add(registry.then("I should have {left} cucumbers", |ctx, args| {
        let left = args.get::<String>("left")?;
        let count = ctx.require::<i64>("cucumbers")?;
        if &count.to_string() == left {
            Ok(StepExecution::done())
        } else {
            Err(StepError::msg(format!("expected {left} cucumbers, found {count}")))
        }
    }));
    add(registry.given("the basket is {colour}", |ctx, args| {
        ctx.insert("colour", args.get::<String>("colour")?.clone());
        Ok(StepExecution::done())
    }));
    let coordinate = StepDefinition::new(
        StepKind::Given,
        "there is a coordinate {point}",
        |_, args| Ok(StepExecution::value(*args.get::<Point>("point")?)),
    )
    .unwrap_or_else(|err| panic!("{err}"))
    .named("coordinate");
    add(registry.register(coordinate));
    let quadrant = StepDefinition::new(
        StepKind::Then,
        "the coordinate lies in the first quadrant",
        |ctx, _| {
            let point = ctx.require::<Point>("coordinate")?;
            if point.x > 0 && point.y > 0 {
                Ok(StepExecution::done())
            } else {
                Err(StepError::msg(format!("{point} is not in the first quadrant")))
            }
        },
    )
    .unwrap_or_else(|err| panic!("{err}"))
    .with_params(["coordinate"]);
    add(registry.register(quadrant));
    registry
}

/// Collect the named scenario's tests against the shared steps.
pub fn collect(name: &str) -> Vec<ScenarioTest> {
    collect_scenario(&feature(), &registry(), &converters(), name)
        .unwrap_or_else(|err| panic!("collecting {name:?}: {err}"))
}

/// Collect a scenario that must expand to a single test.
pub fn collect_one(name: &str) -> ScenarioTest {
    let mut tests = collect(name);
    let Some(test) = tests.pop() else {
        panic!("{name:?} produced no tests");
    };
    assert!(tests.is_empty(), "{name:?} should expand to one test");
    test
}
