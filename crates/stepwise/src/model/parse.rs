//! Adapter from the `gherkin` parse tree to the scenario model.

use camino::{Utf8Path, Utf8PathBuf};
use gherkin::GherkinEnv;
use stepwise_patterns::StepKind;

use super::{Examples, Feature, Scenario, StepTemplate, Tags};

/// Failure to read or parse a feature file.
#[derive(Debug, thiserror::Error)]
pub enum FeatureLoadError {
    /// The file could not be read.
    #[error("failed to read feature file {path}: {source}")]
    Io {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The text is not valid Gherkin.
    #[error("failed to parse feature file {path}: {message}")]
    Parse {
        /// File name the text was attributed to.
        path: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Read and parse the feature file at `path`.
///
/// `rel_filename` is computed against `root`.
///
/// # Errors
///
/// Returns [`FeatureLoadError::Io`] when the file cannot be read and
/// [`FeatureLoadError::Parse`] when it is not valid Gherkin.
pub fn load_feature(path: &Utf8Path, root: &Utf8Path) -> Result<Feature, FeatureLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| FeatureLoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_feature(&text, path.as_str(), root)
}

/// Parse feature text attributed to `filename`.
///
/// # Errors
///
/// Returns [`FeatureLoadError::Parse`] when `text` is not valid Gherkin.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use stepwise::parse_feature;
///
/// let feature = parse_feature(
///     "Feature: Cucumbers\n  Scenario: Eating\n    Given there are 12 cucumbers\n",
///     "/work/features/cucumbers.feature",
///     Utf8Path::new("/work"),
/// )?;
/// assert_eq!(feature.rel_filename, "features/cucumbers.feature");
/// assert_eq!(feature.scenarios[0].steps[0].text, "there are 12 cucumbers");
/// # Ok::<(), stepwise::FeatureLoadError>(())
/// ```
pub fn parse_feature(
    text: &str,
    filename: &str,
    root: &Utf8Path,
) -> Result<Feature, FeatureLoadError> {
    let mut source = text.to_owned();
    if !source.ends_with('\n') {
        source.push('\n');
    }
    let parsed = gherkin::Feature::parse(source, GherkinEnv::default()).map_err(|err| {
        FeatureLoadError::Parse {
            path: filename.to_owned(),
            message: err.to_string(),
        }
    })?;
    log::debug!("parsed feature {:?} from {filename}", parsed.name);
    Ok(convert_feature(parsed, filename, root))
}

fn relative_filename(filename: &str, root: &Utf8Path) -> String {
    Utf8Path::new(filename)
        .strip_prefix(root)
        .map_or_else(|_| filename.to_owned(), |rel| rel.as_str().to_owned())
}

fn convert_feature(feature: gherkin::Feature, filename: &str, root: &Utf8Path) -> Feature {
    let mut scenarios: Vec<Scenario> = feature
        .scenarios
        .into_iter()
        .map(convert_scenario)
        .collect();
    for rule in feature.rules {
        let rule_background = rule
            .background
            .map(|background| convert_steps(background.steps))
            .unwrap_or_default();
        scenarios.extend(rule.scenarios.into_iter().map(|scenario| {
            let mut scenario = convert_scenario(scenario);
            let mut steps = rule_background.clone();
            steps.append(&mut scenario.steps);
            scenario.steps = steps;
            scenario
        }));
    }
    Feature {
        name: feature.name,
        description: feature
            .description
            .map(|text| text.trim().to_owned())
            .unwrap_or_default(),
        filename: filename.to_owned(),
        rel_filename: relative_filename(filename, root),
        line_number: feature.position.line,
        tags: feature.tags.into_iter().collect(),
        background: feature
            .background
            .map(|background| convert_steps(background.steps))
            .unwrap_or_default(),
        scenarios,
    }
}

fn convert_scenario(scenario: gherkin::Scenario) -> Scenario {
    Scenario {
        name: scenario.name,
        line_number: scenario.position.line,
        tags: scenario.tags.into_iter().collect::<Tags>(),
        steps: convert_steps(scenario.steps),
        examples: scenario
            .examples
            .into_iter()
            .map(|examples| {
                let rows = examples.table.map(|table| table.rows).unwrap_or_default();
                Examples::from_table(
                    examples.name.filter(|name| !name.is_empty()),
                    examples.position.line,
                    rows,
                )
            })
            .collect(),
    }
}

fn convert_steps(steps: Vec<gherkin::Step>) -> Vec<StepTemplate> {
    steps
        .into_iter()
        .map(|step| {
            let mut template = StepTemplate::new(step.keyword, step.value, step.position.line);
            if let Ok(kind) = StepKind::try_from(step.ty) {
                template = template.with_parsed_kind(kind);
            }
            if let Some(docstring) = step.docstring {
                template = template.with_docstring(docstring);
            }
            if let Some(table) = step.table {
                template = template.with_table(table.rows);
            }
            template
        })
        .collect()
}
