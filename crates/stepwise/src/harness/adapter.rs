//! Harness adapter trait and the default inline harness.

use super::runner::ScenarioRunRequest;
use crate::execution::ScenarioExecution;

/// Runs scenario requests inside a harness-specific environment.
///
/// An adapter may set up whatever the host needs around the steps (a
/// runtime, a UI context, shared fixtures) but must call
/// [`ScenarioRunRequest::run`] exactly once and on the calling thread, so
/// [`skip!`](crate::skip) keeps working.
///
/// # Examples
///
/// ```
/// use stepwise::ScenarioExecution;
/// use stepwise::harness::{HarnessAdapter, ScenarioRunRequest};
///
/// /// Hands every scenario a fresh basket.
/// struct BasketHarness;
///
/// impl HarnessAdapter for BasketHarness {
///     fn run(&self, mut request: ScenarioRunRequest<'_>) -> ScenarioExecution {
///         request.context_mut().insert("basket", Vec::<String>::new());
///         request.run()
///     }
/// }
/// ```
pub trait HarnessAdapter {
    /// Execute one scenario request.
    fn run(&self, request: ScenarioRunRequest<'_>) -> ScenarioExecution;
}

/// Framework-agnostic synchronous harness.
///
/// Runs the steps directly on the calling thread with the context it is
/// given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdHarness;

impl StdHarness {
    /// Create the harness.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HarnessAdapter for StdHarness {
    fn run(&self, request: ScenarioRunRequest<'_>) -> ScenarioExecution {
        log::trace!(
            "running {} from {} inline",
            request.metadata().nodeid(),
            request.metadata().feature_path()
        );
        request.run()
    }
}
