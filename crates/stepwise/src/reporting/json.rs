//! JSON writer for scenario outcome records.
//!
//! The writer serializes collector records into a predictable shape: status
//! labels are lowercase and each entry embeds its full scenario report.

use std::io::Write;

use serde::Serialize;

use super::{ScenarioRecord, ScenarioReport, ScenarioStatus, snapshot};

#[derive(Serialize)]
struct JsonReport<'a> {
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    nodeid: &'a str,
    feature_path: &'a str,
    scenario_name: &'a str,
    status: &'static str,
    line: usize,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<JsonFailure<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<JsonSkip<'a>>,
    report: &'a ScenarioReport,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    message: &'a str,
    line_number: usize,
}

#[derive(Serialize)]
struct JsonSkip<'a> {
    message: Option<&'a str>,
    allow_skipped: bool,
    forced_failure: bool,
}

impl<'a> From<&'a [ScenarioRecord]> for JsonReport<'a> {
    fn from(records: &'a [ScenarioRecord]) -> Self {
        let scenarios = records.iter().map(JsonScenario::from).collect();
        Self { scenarios }
    }
}

impl<'a> From<&'a ScenarioRecord> for JsonScenario<'a> {
    fn from(record: &'a ScenarioRecord) -> Self {
        let (failure, skip) = match record.status() {
            ScenarioStatus::Passed => (None, None),
            ScenarioStatus::Failed(details) => (
                Some(JsonFailure {
                    message: details.message(),
                    line_number: details.line_number(),
                }),
                None,
            ),
            ScenarioStatus::Skipped(details) => (
                None,
                Some(JsonSkip {
                    message: details.message(),
                    allow_skipped: details.allow_skipped(),
                    forced_failure: details.forced_failure(),
                }),
            ),
        };
        Self {
            nodeid: record.nodeid(),
            feature_path: record.feature_path(),
            scenario_name: record.scenario_name(),
            status: record.status().label(),
            line: record.line(),
            tags: record.tags(),
            failure,
            skip,
            report: record.report(),
        }
    }
}

/// Serialize the provided scenario records into the supplied writer.
///
/// # Errors
/// Returns an error when serialization of the provided records fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Serialize the current collector snapshot into the supplied writer.
///
/// # Errors
/// Returns an error when serializing the snapshot fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> serde_json::Result<()> {
    let snapshot = snapshot();
    write(writer, &snapshot)
}

/// Produce a JSON string representation of the provided scenario records.
///
/// # Errors
/// Returns an error when serializing the provided records fails.
pub fn to_string(records: &[ScenarioRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}

/// Produce a JSON string representation of the current collector snapshot.
///
/// # Errors
/// Returns an error when serializing the snapshot fails.
pub fn snapshot_string() -> serde_json::Result<String> {
    let snapshot = snapshot();
    to_string(&snapshot)
}
