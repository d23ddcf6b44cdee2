//! Data structures representing scenario results captured by the collector.

use super::ScenarioReport;

/// Outcome recorded for a single scenario instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioRecord {
    nodeid: String,
    status: ScenarioStatus,
    report: ScenarioReport,
}

impl ScenarioRecord {
    /// Construct a record for the test `nodeid`.
    #[must_use]
    pub fn new(nodeid: impl Into<String>, status: ScenarioStatus, report: ScenarioReport) -> Self {
        Self {
            nodeid: nodeid.into(),
            status,
            report,
        }
    }

    /// Identifier of the test that ran the scenario.
    #[must_use]
    pub fn nodeid(&self) -> &str {
        &self.nodeid
    }

    /// Feature path relative to the invocation root.
    #[must_use]
    pub fn feature_path(&self) -> &str {
        &self.report.feature.rel_filename
    }

    /// Scenario title.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.report.name
    }

    /// Line of the scenario keyword.
    #[must_use]
    pub fn line(&self) -> usize {
        self.report.line_number
    }

    /// Scenario-level tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.report.tags
    }

    /// Access the stored status value.
    #[must_use]
    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    /// Full scenario report.
    #[must_use]
    pub fn report(&self) -> &ScenarioReport {
        &self.report
    }
}

/// Status of a scenario instance recorded by the collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every step completed.
    Passed,
    /// A step failed.
    Failed(FailedScenario),
    /// A step skipped.
    Skipped(SkippedScenario),
}

impl ScenarioStatus {
    /// Retrieve the lowercase label for the stored status.
    ///
    /// # Examples
    /// ```
    /// use stepwise::reporting::{ScenarioStatus, SkippedScenario};
    ///
    /// assert_eq!(ScenarioStatus::Passed.label(), "passed");
    /// let skipped = ScenarioStatus::Skipped(SkippedScenario::new(None, false, false));
    /// assert_eq!(skipped.label(), "skipped");
    /// ```
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
        }
    }
}

/// Details captured when a scenario fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedScenario {
    message: String,
    line_number: usize,
}

impl FailedScenario {
    /// Record the failing step's line and message.
    #[must_use]
    pub fn new(message: impl Into<String>, line_number: usize) -> Self {
        Self {
            message: message.into(),
            line_number,
        }
    }

    /// Failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Line of the failing step.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Details captured when a scenario skips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedScenario {
    message: Option<String>,
    allow_skipped: bool,
    forced_failure: bool,
}

impl SkippedScenario {
    /// Create a new skip record with the supplied metadata.
    ///
    /// # Examples
    /// ```
    /// use stepwise::reporting::SkippedScenario;
    ///
    /// let skipped = SkippedScenario::new(Some("pending".into()), true, false);
    /// assert_eq!(skipped.message(), Some("pending"));
    /// assert!(skipped.allow_skipped());
    /// ```
    #[must_use]
    pub fn new(message: Option<String>, allow_skipped: bool, forced_failure: bool) -> Self {
        Self {
            message,
            allow_skipped,
            forced_failure,
        }
    }

    /// Retrieve the message provided by the skipping step, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the scenario is tagged `allow_skipped`.
    #[must_use]
    pub fn allow_skipped(&self) -> bool {
        self.allow_skipped
    }

    /// Whether the skip failed the test because of
    /// [`fail_on_skipped`](crate::config::fail_on_skipped).
    ///
    /// # Examples
    /// ```
    /// use stepwise::reporting::SkippedScenario;
    ///
    /// let skipped = SkippedScenario::new(None, false, true);
    /// assert!(skipped.forced_failure());
    /// ```
    #[must_use]
    pub fn forced_failure(&self) -> bool {
        self.forced_failure
    }
}
