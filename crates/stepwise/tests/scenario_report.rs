//! Behavioural tests for the report attached to each scenario run.

mod scenario_support;

use rstest::rstest;
use serde_json::{Value, json};
use stepwise::ReportValue;
use stepwise::harness::{Phase, PhaseReport, TestItem, TestOutcome};
use stepwise::reporting::{ScenarioReport, StepReport};

use scenario_support::{Point, collect, collect_one};

fn flags(report: &ScenarioReport) -> Vec<(bool, bool)> {
    report.steps.iter().map(|s| (s.failed, s.skipped)).collect()
}

fn step_lines(report: &ScenarioReport) -> Vec<usize> {
    report.steps.iter().map(|s| s.line_number).collect()
}

fn without_durations(mut report: ScenarioReport) -> ScenarioReport {
    for step in &mut report.steps {
        step.duration = 0.0;
    }
    report
}

#[test]
fn passing_scenario_reports_every_step() {
    let mut test = collect_one("Passing");
    let phase = test.run();
    assert_eq!(phase.when, Phase::Call);
    assert_eq!(phase.outcome, TestOutcome::Passed);
    assert_eq!(phase.longrepr, None);

    let report = &phase.scenario;
    assert_eq!(report.name, "Passing");
    assert_eq!(report.tags, ["scenario-passing-tag"]);
    assert_eq!(report.feature.tags, ["feature-tag"]);
    assert_eq!(report.feature.name, "Cucumber basket");
    assert_eq!(report.feature.description, "Counting what is left in the basket.");
    assert_eq!(report.feature.rel_filename, "tests/features/cucumbers.feature");
    assert!(report.feature.filename.ends_with("tests/features/cucumbers.feature"));
    assert_eq!(report.feature.line_number, 2, "the tag line is not the feature line");
    assert_eq!(report.line_number, 6);
    assert_eq!(step_lines(report), [7, 8]);
    assert_eq!(flags(report), [(false, false), (false, false)]);
    assert_eq!(
        report
            .steps
            .iter()
            .map(|s| (s.keyword.as_str(), s.kind.as_str(), s.name.as_str()))
            .collect::<Vec<_>>(),
        [
            ("Given", "given", "a passing step"),
            ("And", "given", "some other passing step"),
        ]
    );
    assert!(report.examples.is_empty());
    assert!(report.example_kwargs.is_empty());
}

#[test]
fn failing_scenario_stops_at_the_failure() {
    let mut test = collect_one("Failing");
    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Failed);
    let longrepr = phase.longrepr.unwrap_or_default();
    assert!(longrepr.contains("a failing step"), "{longrepr}");
    assert!(longrepr.contains("Failed step"), "{longrepr}");
    assert!(longrepr.contains("line 13"), "{longrepr}");
    assert_eq!(flags(&phase.scenario), [(false, false), (true, false)]);
    assert_eq!(phase.scenario.line_number, 11);
    assert_eq!(step_lines(&phase.scenario), [12, 13]);
    let failed: Option<&StepReport> = phase.scenario.failed_step();
    assert_eq!(
        failed.map(|s| (s.name.as_str(), s.line_number)),
        Some(("a failing step", 13))
    );
}

#[test]
fn skipping_scenario_marks_the_rest_skipped() {
    let mut test = collect_one("Skipping");
    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Skipped);
    assert_eq!(phase.longrepr.as_deref(), Some("not today"));
    assert_eq!(
        flags(&phase.scenario),
        [(false, false), (false, true), (false, true)]
    );
    assert_eq!(step_lines(&phase.scenario), [16, 17, 18]);
}

#[test]
fn outline_instances_share_converted_rows() {
    let mut tests = collect("Outlined");
    assert_eq!(
        tests.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        ["test_outlined[12-5.0-7]", "test_outlined[5-4.0-1]"]
    );

    let phases: Vec<PhaseReport> = tests.iter_mut().map(|test| test.run()).collect();
    assert!(phases.iter().all(|p| p.outcome == TestOutcome::Passed));

    let Some(first) = phases.first() else {
        panic!("two phases expected");
    };
    let report = &first.scenario;
    assert_eq!(
        serde_json::to_value(&report.example_kwargs).ok(),
        Some(json!({"start": "12", "eat": "5.0", "left": "7"}))
    );
    let Some(examples) = report.examples.first() else {
        panic!("outline report should describe its examples");
    };
    assert_eq!(examples.row_index, 0);
    assert_eq!(examples.line_number, 25);
    assert_eq!(report.line_number, 20);
    assert_eq!(step_lines(report), [21, 22, 23]);
    assert_eq!(examples.rows.0, ["start", "eat", "left"]);
    assert_eq!(
        examples.rows.1,
        vec![
            vec![
                ReportValue::Integer(12),
                ReportValue::Float(5.0),
                ReportValue::String("7".into()),
            ],
            vec![
                ReportValue::Integer(5),
                ReportValue::Float(4.0),
                ReportValue::String("1".into()),
            ],
        ]
    );
    assert_eq!(
        report.steps.first().map(|s| s.name.as_str()),
        Some("there are <start> cucumbers")
    );

    let rows: Vec<_> = phases
        .iter()
        .filter_map(|p| p.scenario.examples.first())
        .map(|e| (e.row_index, e.rows.clone()))
        .collect();
    let [(0, shared_first), (1, shared_second)] = rows.as_slice() else {
        panic!("row indices should be 0 and 1: {rows:?}");
    };
    assert_eq!(shared_first, shared_second);
}

#[test]
fn unconverted_columns_keep_their_raw_text() {
    let mut test = collect_one("Coloured");
    assert_eq!(test.name, "test_coloured[3-green]");
    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Passed, "{:?}", phase.longrepr);

    let report = &phase.scenario;
    assert_eq!(
        serde_json::to_value(&report.example_kwargs).ok(),
        Some(json!({"start": "3", "colour": "green"}))
    );
    let Some(examples) = report.examples.first() else {
        panic!("outline report should describe its examples");
    };
    assert_eq!(examples.line_number, 42);
    assert_eq!(
        examples.rows.1,
        vec![vec![ReportValue::Integer(3), ReportValue::String("green".into())]]
    );
    assert_eq!(step_lines(report), [39, 40]);
}

#[test]
fn typed_values_reach_step_arguments() {
    let tests = collect("Outlined");
    let Some(when) = tests.first().and_then(|t| t.steps.get(1)) else {
        panic!("the outline has a When step");
    };
    assert_eq!(when.step.text, "I eat 5 cucumbers");
    assert_eq!(when.args.get::<f64>("eat").ok().map(|v| v.to_bits()), Some(5.0_f64.to_bits()));
    assert_eq!(when.args.get::<i64>("start").ok(), Some(&12));
    assert_eq!(when.args.text("eat"), Some("5"));
}

#[test]
fn complex_values_never_reach_the_report() {
    let mut test = collect_one("Complex");
    assert_eq!(test.name, "test_complex[Point(10, 20)]");
    let Some(given) = test.steps.first() else {
        panic!("the outline has a Given step");
    };
    assert_eq!(given.args.get::<Point>("point").ok(), Some(&Point { x: 10, y: 20 }));

    let phase = test.run();
    assert_eq!(phase.outcome, TestOutcome::Passed, "{:?}", phase.longrepr);
    let Some(examples) = phase.scenario.examples.first() else {
        panic!("outline report should describe its examples");
    };
    assert_eq!(
        examples.rows.1,
        vec![vec![ReportValue::String("Point(10, 20)".into())]]
    );

    let text = serde_json::to_string(&phase).unwrap_or_else(|err| panic!("{err}"));
    let back: PhaseReport = serde_json::from_str(&text).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(back, phase);

    let item_text = serde_json::to_string(&test.item).unwrap_or_else(|err| panic!("{err}"));
    let item: TestItem = serde_json::from_str(&item_text).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(item.scenario_report.as_ref(), Some(&phase.scenario));
    assert_eq!(item.nodeid, "test_complex[Point(10, 20)]");
}

#[rstest]
#[case("Passing")]
#[case("Failing")]
#[case("Skipping")]
#[case("Complex")]
fn rebuilding_a_report_is_stable(#[case] name: &str) {
    let mut first = collect_one(name);
    let mut second = collect_one(name);
    assert_eq!(
        without_durations(first.run().scenario),
        without_durations(second.run().scenario)
    );
}

#[test]
fn report_json_uses_the_documented_field_names() {
    let mut test = collect_one("Passing");
    let value: Value = serde_json::to_value(test.run()).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(value.pointer("/when"), Some(&json!("call")));
    assert_eq!(value.pointer("/outcome"), Some(&json!("passed")));
    let Some(step) = value.pointer("/scenario/steps/0").and_then(Value::as_object) else {
        panic!("first step missing from {value}");
    };
    let mut keys: Vec<_> = step.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["duration", "failed", "keyword", "line_number", "name", "skipped", "type"]
    );
}
