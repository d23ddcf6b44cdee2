//! Macros exported at the crate root.

/// Skip the rest of the running scenario.
///
/// May be called anywhere below a step handler on the thread running the
/// step. The current step and every later step are reported as skipped and
/// the remaining handlers are not invoked.
///
/// # Examples
///
/// ```
/// use stepwise::{StepArgs, StepContext, StepError, StepExecution};
///
/// fn requires_network(_: &mut StepContext, _: &StepArgs) -> Result<StepExecution, StepError> {
///     if std::env::var_os("NETWORK_TESTS").is_none() {
///         stepwise::skip!("network tests disabled");
///     }
///     Ok(StepExecution::done())
/// }
/// ```
#[macro_export]
macro_rules! skip {
    () => {
        $crate::__request_current_skip(None)
    };
    ($fmt:literal $($arg:tt)*) => {
        $crate::__request_current_skip(Some(format!($fmt $($arg)*)))
    };
    ($msg:expr $(,)?) => {
        $crate::__request_current_skip(Some(::std::string::ToString::to_string(&$msg)))
    };
}

/// Assert that a [`StepExecution`](crate::StepExecution) skipped and return
/// its reason.
///
/// # Examples
///
/// ```
/// use stepwise::{assert_step_skipped, StepExecution};
///
/// let reason = assert_step_skipped!(StepExecution::skipped("pending".to_string()));
/// assert_eq!(reason.as_deref(), Some("pending"));
/// ```
#[macro_export]
macro_rules! assert_step_skipped {
    ($expr:expr $(,)?) => {
        match $expr {
            $crate::StepExecution::Skipped { message } => message,
            $crate::StepExecution::Continue { .. } => {
                panic!("expected step execution to skip, but it continued")
            }
        }
    };
}
