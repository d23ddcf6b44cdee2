//! Behaviour-driven scenario engine.
//!
//! `stepwise` takes a parsed feature (see [`parse_feature`]), expands
//! scenario outlines into one instance per example row, binds every step to
//! a handler from a [`StepRegistry`], runs the steps in order with skip and
//! failure propagation, and produces a serializable [`ScenarioReport`].
//!
//! ```
//! use std::sync::Arc;
//!
//! use camino::Utf8Path;
//! use stepwise::harness::{TestOutcome, collect_scenarios};
//! use stepwise::{ExampleConverters, StepExecution, StepRegistry, parse_feature};
//!
//! let feature = parse_feature(
//!     "Feature: Cucumbers\n\
//!      \x20 Scenario Outline: Eating\n\
//!      \x20   Given there are <start> cucumbers\n\
//!      \x20   When I eat <eat> cucumbers\n\
//!      \x20   Then I should have <left> cucumbers\n\
//!      \x20   Examples:\n\
//!      \x20     | start | eat | left |\n\
//!      \x20     | 12    | 5   | 7    |\n",
//!     "/work/cucumbers.feature",
//!     Utf8Path::new("/work"),
//! )?;
//!
//! let mut registry = StepRegistry::new();
//! registry.given("there are {start:u32} cucumbers", |ctx, args| {
//!     ctx.insert("count", args.parse::<u32>("start")?);
//!     Ok(StepExecution::done())
//! })?;
//! registry.when("I eat {eat:u32} cucumbers", |ctx, args| {
//!     let eat = args.parse::<u32>("eat")?;
//!     let count = ctx
//!         .get_mut::<u32>("count")
//!         .ok_or_else(|| stepwise::StepError::msg("no cucumbers"))?;
//!     *count -= eat;
//!     Ok(StepExecution::done())
//! })?;
//! registry.then("I should have {left:u32} cucumbers", |ctx, args| {
//!     let left = args.parse::<u32>("left")?;
//!     if ctx.require::<u32>("count")? != &left {
//!         return Err(stepwise::StepError::msg("wrong number of cucumbers"));
//!     }
//!     Ok(StepExecution::done())
//! })?;
//!
//! let converters = ExampleConverters::new().parse::<i64>("start").parse::<f64>("eat");
//! let mut tests = collect_scenarios(&Arc::new(feature), &registry, &converters)?;
//! for test in &mut tests {
//!     assert_eq!(test.name, "test_eating[12-5.0-7]");
//!     assert_eq!(test.run().outcome, TestOutcome::Passed);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod args;
pub mod config;
mod context;
mod converters;
mod error;
pub mod execution;
pub mod harness;
mod macros;
pub mod model;
pub mod outline;
mod panic;
pub mod registry;
pub mod reporting;
pub mod resolver;
mod skip;
mod types;
mod value;

pub use args::StepArgs;
pub use context::StepContext;
pub use converters::ExampleConverters;
pub use error::StepError;
pub use execution::{ScenarioExecution, ScenarioOutcome, execute};
pub use model::{
    Examples, Feature, FeatureLoadError, Scenario, StepTemplate, Tags, load_feature,
    parse_feature,
};
pub use outline::{CollectionError, ScenarioInstance, expand};
pub use panic::panic_message;
pub use registry::{RegistryError, StepDefinition, StepRegistry};
pub use reporting::ScenarioReport;
pub use resolver::{ResolvedStep, resolve_steps};
pub use skip::{SkipRequest, current_step};
pub use stepwise_patterns::{StepKeyword, StepKind};
pub use types::{StepExecution, StepHandler};
pub use value::{ConvertedValue, ExampleValue, ReportValue};

#[doc(hidden)]
pub use skip::request_current_skip as __request_current_skip;
