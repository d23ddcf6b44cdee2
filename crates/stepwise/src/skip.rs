//! Cooperative skipping from inside a running step.
//!
//! Handlers normally skip by returning [`StepExecution::Skipped`]. Code that
//! cannot return early (helpers several calls deep) uses the
//! [`skip!`](crate::skip!) macro instead, which unwinds with a [`SkipRequest`]
//! payload that the sequencer tells apart from an ordinary panic.
//!
//! [`StepExecution::Skipped`]: crate::StepExecution::Skipped

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::panic;
use std::rc::Rc;

thread_local! {
    static SCOPE_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Panic payload asking the sequencer to skip the rest of the scenario.
#[derive(Debug)]
pub struct SkipRequest {
    message: Option<String>,
}

impl SkipRequest {
    /// Create a request with an optional reason.
    #[must_use]
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    /// Consume the request, returning its reason.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    /// Unwind with this request as the payload.
    ///
    /// The panic hook is bypassed, so no "thread panicked" line is printed.
    pub fn raise(message: Option<String>) -> ! {
        panic::resume_unwind(Box::new(Self::new(message)));
    }
}

impl fmt::Display for SkipRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("scenario skipped"))
    }
}

/// Marks the current thread as running a step while alive.
///
/// The guard is neither `Send` nor `Sync`: it must be dropped on the thread
/// that entered the scope.
#[derive(Debug)]
pub(crate) struct StepScopeGuard {
    depth: usize,
    _not_send_or_sync: PhantomData<Rc<()>>,
}

impl Drop for StepScopeGuard {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth, "step scopes must nest");
            stack.pop();
        });
    }
}

/// Enter the scope of the step whose text is `step`.
pub(crate) fn enter_scope(step: &str) -> StepScopeGuard {
    let depth = SCOPE_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(step.to_owned());
        stack.len()
    });
    StepScopeGuard {
        depth,
        _not_send_or_sync: PhantomData,
    }
}

/// Text of the step running on this thread, if any.
#[must_use]
pub fn current_step() -> Option<String> {
    SCOPE_STACK.with(|stack| stack.borrow().last().cloned())
}

#[doc(hidden)]
pub fn request_current_skip(message: Option<String>) -> ! {
    if current_step().is_none() {
        panic!(
            "stepwise::skip! may only be used on the thread running a step; \
             spawned threads and code outside a scenario cannot skip"
        );
    }
    SkipRequest::raise(message)
}
