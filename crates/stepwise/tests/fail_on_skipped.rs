//! Behavioural tests for turning skipped scenarios into failures.

mod scenario_support;

use std::sync::Arc;

use camino::Utf8Path;
use rstest::{fixture, rstest};
use serial_test::serial;
use stepwise::config::{clear_fail_on_skipped_override, set_fail_on_skipped};
use stepwise::harness::{TestOutcome, collect_scenarios};
use stepwise::reporting::{self, ScenarioStatus};
use stepwise::{ExampleConverters, parse_feature};

use scenario_support::{collect_one, registry};

struct OverrideGuard;

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        clear_fail_on_skipped_override();
    }
}

#[fixture]
fn fail_on_skipped() -> OverrideGuard {
    set_fail_on_skipped(true);
    OverrideGuard
}

fn skip_status(nodeid: &str) -> (bool, bool) {
    let records = reporting::drain();
    let Some(record) = records.iter().rev().find(|r| r.nodeid() == nodeid) else {
        panic!("no record for {nodeid}");
    };
    let ScenarioStatus::Skipped(details) = record.status() else {
        panic!("{nodeid} should be recorded as skipped");
    };
    (details.allow_skipped(), details.forced_failure())
}

#[rstest]
#[serial]
fn skipped_scenario_fails_when_enabled(fail_on_skipped: OverrideGuard) {
    let _guard = fail_on_skipped;
    let _ = reporting::drain();
    let mut test = collect_one("Skipping");
    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Failed);
    let longrepr = phase.longrepr.unwrap_or_default();
    assert!(longrepr.contains("fail-on-skipped"), "{longrepr}");
    assert!(longrepr.contains("not today"), "{longrepr}");
    assert_eq!(
        phase
            .scenario
            .steps
            .iter()
            .map(|s| s.skipped)
            .collect::<Vec<_>>(),
        [false, true, true]
    );
    assert_eq!(skip_status(&test.name), (false, true));
}

#[rstest]
#[case::scenario_tag(
    "Feature: Tags\n  @allow_skipped\n  Scenario: Pending\n    Given a skipping step\n"
)]
#[case::feature_tag(
    "@allow_skipped\nFeature: Tags\n  Scenario: Pending\n    Given a skipping step\n"
)]
#[serial]
fn allow_skipped_tag_keeps_the_skip(fail_on_skipped: OverrideGuard, #[case] source: &str) {
    let _guard = fail_on_skipped;
    let _ = reporting::drain();
    let feature = parse_feature(source, "/work/tags.feature", Utf8Path::new("/work"))
        .unwrap_or_else(|err| panic!("{err}"));
    let mut tests = collect_scenarios(&Arc::new(feature), &registry(), &ExampleConverters::new())
        .unwrap_or_else(|err| panic!("{err}"));
    let Some(test) = tests.first_mut() else {
        panic!("one test expected");
    };
    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Skipped);
    assert_eq!(skip_status(&test.name), (true, false));
}

#[test]
#[serial]
fn skips_pass_through_when_disabled() {
    set_fail_on_skipped(false);
    let _guard = OverrideGuard;
    let _ = reporting::drain();
    let mut test = collect_one("Skipping");
    assert_eq!(test.run().outcome, TestOutcome::Skipped);
    assert_eq!(skip_status(&test.name), (false, false));
}
