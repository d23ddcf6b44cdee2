//! Scenario reports and the process-wide record collector.
//!
//! Each executed scenario instance produces a [`ScenarioReport`]. Running a
//! [`ScenarioTest`](crate::harness::ScenarioTest) also stores a
//! [`ScenarioRecord`] in a global, thread-safe collector so reporters can
//! render summaries after the tests ran.

use std::sync::{Mutex, MutexGuard, OnceLock};

/// JSON writer for collected records.
pub mod json;
mod record;
mod report;

pub use record::{FailedScenario, ScenarioRecord, ScenarioStatus, SkippedScenario};
pub use report::{ExamplesReport, FeatureReport, ScenarioReport, StepReport};

/// Thread-safe store containing scenario records gathered during a test run.
static REPORTS: OnceLock<Mutex<Vec<ScenarioRecord>>> = OnceLock::new();

fn reports_mutex() -> &'static Mutex<Vec<ScenarioRecord>> {
    REPORTS.get_or_init(|| Mutex::new(Vec::new()))
}

fn lock_reports() -> MutexGuard<'static, Vec<ScenarioRecord>> {
    match reports_mutex().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Record a scenario outcome in the shared collector.
pub fn record(record: ScenarioRecord) {
    lock_reports().push(record);
}

/// Retrieve a snapshot of the recorded scenarios without clearing them.
#[must_use]
pub fn snapshot() -> Vec<ScenarioRecord> {
    lock_reports().clone()
}

/// Remove and return all recorded scenario outcomes.
#[must_use]
pub fn drain() -> Vec<ScenarioRecord> {
    lock_reports().drain(..).collect()
}
