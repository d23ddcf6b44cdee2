//! Behavioural tests for the public pattern API.

use rstest::rstest;
use stepwise_patterns::{
    CompiledPattern, PatternError, SpecificityScore, StepKeyword, StepKind,
    compile_regex_from_pattern, outline_placeholders, placeholder_names, substitute_outline,
};

fn compile(pattern: &str) -> CompiledPattern {
    CompiledPattern::compile(pattern).unwrap_or_else(|err| panic!("{pattern:?}: {err}"))
}

#[test]
fn outline_step_resolves_then_matches_a_typed_pattern() {
    let template = "I eat <eat> cucumbers";
    assert_eq!(outline_placeholders(template), ["eat"]);

    let text = substitute_outline(template, |name| (name == "eat").then_some("5"));
    let pattern = compile("I eat {eat:f64} cucumbers");
    assert_eq!(
        pattern.captures(&text),
        Some(vec![("eat".to_string(), "5".to_string())])
    );
}

#[test]
fn most_specific_matching_pattern_can_be_selected() {
    let candidates = [
        compile("there are {start} cucumbers"),
        compile("there are {start:u32} cucumbers"),
        compile("there are 12 cucumbers"),
    ];
    let best = candidates
        .iter()
        .filter(|pattern| pattern.is_match("there are 12 cucumbers"))
        .max_by_key(|pattern| pattern.specificity());
    assert_eq!(best.map(CompiledPattern::as_str), Some("there are 12 cucumbers"));
}

#[test]
fn placeholder_errors_name_the_offender() {
    let Err(PatternError::Placeholder(info)) = compile_regex_from_pattern("I have {left:}") else {
        panic!("expected a placeholder error");
    };
    assert_eq!(info.placeholder.as_deref(), Some("left"));
    assert_eq!(info.position, 7);
}

#[rstest]
#[case("{value:bad hint}")]
#[case("{value:Vec<{u32}>}")]
fn rejects_hints_with_whitespace_or_braces(#[case] pattern: &str) {
    let Err(err) = placeholder_names(pattern) else {
        panic!("{pattern:?} should be rejected");
    };
    assert!(err.to_string().contains("invalid placeholder"), "{err}");
}

#[test]
fn specificity_is_exposed_for_ranking() {
    let score = SpecificityScore::calculate("I have {count:u32} apples")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(
        score,
        SpecificityScore {
            literal_chars: 14,
            placeholder_count: 1,
            typed_placeholder_count: 1,
        }
    );
}

#[test]
fn keywords_resolve_across_a_scenario() {
    let mut prev = None;
    let kinds: Vec<StepKind> = ["Given", "And", "When", "Then", "But"]
        .into_iter()
        .map(|raw| {
            let keyword: StepKeyword = raw.parse().unwrap_or_else(|err| panic!("{err}"));
            keyword.resolve(&mut prev)
        })
        .collect();
    assert_eq!(
        kinds,
        [
            StepKind::Given,
            StepKind::Given,
            StepKind::When,
            StepKind::Then,
            StepKind::Then,
        ]
    );
}
