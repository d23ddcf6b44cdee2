//! Sequential execution of one scenario instance.
//!
//! Steps run strictly in order, each inside a timed scope. The first skip or
//! failure ends the scenario:
//!
//! - a skip marks the skipping step and every later step as skipped without
//!   invoking the later handlers;
//! - a failure marks the failing step and omits the steps after it.
//!
//! Handlers skip either by returning [`StepExecution::Skipped`] or by calling
//! [`skip!`](crate::skip) from anywhere below the handler on the same thread.

mod error;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::registry::StepDefinition;
use crate::resolver::ResolvedStep;
use crate::skip::{SkipRequest, enter_scope};
use crate::{StepArgs, StepContext, StepExecution, panic_message};

pub use error::{ExecutionError, MissingFixturesDetails};

/// A resolved step paired with the definition that runs it.
#[derive(Debug, Clone)]
pub struct BoundStep {
    /// The step as it appears in this instance.
    pub step: ResolvedStep,
    /// Matched definition.
    pub definition: Arc<StepDefinition>,
    /// Captures, example values, docstring and table.
    pub args: StepArgs,
    /// Declared names that must come from the scenario context.
    pub fixtures: Vec<String>,
}

/// Terminal state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Handler returned normally.
    Completed,
    /// Handler failed or panicked.
    Failed,
    /// Handler skipped, or an earlier step did.
    Skipped,
}

/// Outcome and timing of one attempted or skipped step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Position in the instance's step list.
    pub index: usize,
    /// Terminal state.
    pub status: StepStatus,
    /// Time spent in the handler; zero for steps that never ran.
    pub duration: Duration,
}

impl StepResult {
    /// Whether the step failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.status == StepStatus::Failed
    }

    /// Whether the step was skipped.
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.status == StepStatus::Skipped
    }
}

/// The step that ended a scenario with a failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{keyword} {text} (line {line_number}) failed: {error}")]
pub struct StepFailure {
    /// Position in the instance's step list.
    pub index: usize,
    /// Literal keyword.
    pub keyword: String,
    /// Substituted step text.
    pub text: String,
    /// Line of the step.
    pub line_number: usize,
    /// Cause.
    pub error: ExecutionError,
}

/// How a scenario instance ended.
#[derive(Debug, Clone)]
pub enum ScenarioOutcome {
    /// Every step completed.
    Passed,
    /// A step failed.
    Failed(StepFailure),
    /// A step skipped.
    Skipped {
        /// Reason given by the skipping step.
        message: Option<String>,
    },
}

impl ScenarioOutcome {
    /// Lowercase outcome name: `passed`, `failed` or `skipped`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped { .. } => "skipped",
        }
    }
}

/// Record of a finished scenario instance.
#[derive(Debug, Clone)]
pub struct ScenarioExecution {
    /// One entry per attempted or skipped step, in order.
    pub results: Vec<StepResult>,
    /// Terminal outcome.
    pub outcome: ScenarioOutcome,
    /// Wall time for the whole instance.
    pub duration: Duration,
}

/// Run `steps` in order against `ctx`.
///
/// Never panics on behalf of a handler: panics are caught and reported as
/// failures, while [`SkipRequest`] payloads become skips.
pub fn execute(steps: &[BoundStep], ctx: &mut StepContext) -> ScenarioExecution {
    let started = Instant::now();
    let mut results = Vec::with_capacity(steps.len());
    for (index, bound) in steps.iter().enumerate() {
        log::debug!(
            "running step {index}: {} {}",
            bound.step.keyword,
            bound.step.text
        );
        let step_started = Instant::now();
        let result = run_step(bound, ctx);
        let duration = step_started.elapsed();
        let status = match &result {
            Ok(()) => StepStatus::Completed,
            Err(error) if error.is_skip() => StepStatus::Skipped,
            Err(_) => StepStatus::Failed,
        };
        results.push(StepResult {
            index,
            status,
            duration,
        });
        let Err(error) = result else {
            continue;
        };

        let outcome = if let ExecutionError::Skip { message } = error {
            log::info!(
                "step {} {} skipped the scenario{}",
                bound.step.keyword,
                bound.step.text,
                message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
            );
            results.extend((index + 1..steps.len()).map(|rest| StepResult {
                index: rest,
                status: StepStatus::Skipped,
                duration: Duration::ZERO,
            }));
            ScenarioOutcome::Skipped { message }
        } else {
            let failure = StepFailure {
                index,
                keyword: bound.step.keyword.clone(),
                text: bound.step.text.clone(),
                line_number: bound.step.line_number,
                error,
            };
            log::warn!("{failure}");
            ScenarioOutcome::Failed(failure)
        };
        return ScenarioExecution {
            results,
            outcome,
            duration: started.elapsed(),
        };
    }
    ScenarioExecution {
        results,
        outcome: ScenarioOutcome::Passed,
        duration: started.elapsed(),
    }
}

fn check_fixtures(bound: &BoundStep, ctx: &StepContext) -> Result<(), ExecutionError> {
    let missing: Vec<_> = bound
        .fixtures
        .iter()
        .filter(|name| !ctx.contains(name))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ExecutionError::MissingFixtures(Arc::new(
        MissingFixturesDetails {
            step_pattern: bound.definition.pattern().as_str().to_owned(),
            required: bound.fixtures.clone(),
            missing,
            available: ctx.names().into_iter().map(str::to_owned).collect(),
        },
    )))
}

fn run_step(bound: &BoundStep, ctx: &mut StepContext) -> Result<(), ExecutionError> {
    check_fixtures(bound, ctx)?;
    let outcome = {
        let _scope = enter_scope(&bound.step.text);
        panic::catch_unwind(AssertUnwindSafe(|| bound.definition.call(ctx, &bound.args)))
    };
    match outcome {
        Ok(Ok(StepExecution::Continue { value })) => {
            if let Some(value) = value {
                ctx.insert_boxed(bound.definition.name(), value);
            }
            Ok(())
        }
        Ok(Ok(StepExecution::Skipped { message })) => Err(ExecutionError::Skip { message }),
        Ok(Err(error)) => Err(ExecutionError::HandlerFailed {
            error: Arc::new(error),
        }),
        Err(payload) => match payload.downcast::<SkipRequest>() {
            Ok(request) => Err(ExecutionError::Skip {
                message: request.into_message(),
            }),
            Err(payload) => Err(ExecutionError::Panicked {
                message: panic_message(&*payload),
            }),
        },
    }
}
