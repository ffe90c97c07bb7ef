//! SARIF (Static Analysis Results Interchange Format) output formatter.
//!
//! Implements SARIF 2.1.0 for code-scanning integrations. Regions use
//! 1-based lines and columns; columns are counted in characters.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::LintResult;
use crate::rules::builtin_rules;
use crate::violation::{Severity, Violation};

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

const TOOL_NAME: &str = "trivialint";

/// Generates SARIF output from lint results.
pub fn generate_sarif(results: &[LintResult]) -> Result<String, serde_json::Error> {
    let sarif_log = SarifLog::from_results(results);
    serde_json::to_string_pretty(&sarif_log)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<Run>,
}

impl SarifLog {
    fn from_results(results: &[LintResult]) -> Self {
        Self {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![Run::from_results(results)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Run {
    tool: Tool,
    results: Vec<SarifResult>,
}

impl Run {
    fn from_results(lint_results: &[LintResult]) -> Self {
        let mut results = Vec::new();
        // keyed by id so the rule list is stable across runs
        let mut rules: BTreeMap<String, ReportingDescriptor> = BTreeMap::new();

        for lint_result in lint_results {
            for violation in &lint_result.violations {
                results.push(SarifResult::from_violation(violation, &lint_result.path));
                rules
                    .entry(violation.rule_id.clone())
                    .or_insert_with(|| ReportingDescriptor::new(&violation.rule_id));
            }
        }

        Self {
            tool: Tool {
                driver: ToolComponent {
                    name: TOOL_NAME,
                    version: option_env!("CARGO_PKG_VERSION"),
                    rules: rules.into_values().collect(),
                },
            },
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    driver: ToolComponent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolComponent {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rules: Vec<ReportingDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportingDescriptor {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_description: Option<Message>,
}

impl ReportingDescriptor {
    fn new(id: &str) -> Self {
        let description = builtin_rules()
            .into_iter()
            .find(|rule| rule.id() == id)
            .map(|rule| Message::text(rule.description()));
        Self {
            id: id.to_string(),
            name: id.to_string(),
            short_description: description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    text: String,
}

impl Message {
    fn text(s: impl Into<String>) -> Self {
        Self { text: s.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: Message,
    locations: Vec<Location>,
}

impl SarifResult {
    fn from_violation(violation: &Violation, path: &Path) -> Self {
        let level = match violation.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        };

        Self {
            rule_id: violation.rule_id.clone(),
            level,
            message: Message::text(&violation.message),
            locations: vec![Location {
                physical_location: PhysicalLocation {
                    artifact_location: ArtifactLocation {
                        uri: path.to_string_lossy().replace('\\', "/"),
                    },
                    region: violation.loc.as_ref().map(Region::from_location),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    physical_location: PhysicalLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocation {
    artifact_location: ArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<Region>,
}

#[derive(Debug, Clone, Serialize)]
struct ArtifactLocation {
    uri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Region {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

impl Region {
    fn from_location(loc: &trivialint_ast::Location) -> Self {
        Self {
            start_line: loc.start.line,
            start_column: loc.start.column + 1,
            end_line: loc.end.line,
            end_column: loc.end.column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use trivialint_ast::{Location, Position, Span};

    fn violation(rule_id: &str, message: &str, severity: Severity) -> Violation {
        Violation::new(rule_id, message, Span::new(0, 1)).with_severity(severity)
    }

    fn sarif(results: &[LintResult]) -> serde_json::Value {
        serde_json::from_str(&generate_sarif(results).unwrap()).unwrap()
    }

    #[test]
    fn test_sarif_empty_results() {
        let parsed = sarif(&[]);

        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["$schema"], SARIF_SCHEMA);
        assert_eq!(parsed["runs"].as_array().unwrap().len(), 1);
        assert!(parsed["runs"][0]["results"].as_array().unwrap().is_empty());
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "trivialint");
        assert!(parsed["runs"][0]["tool"]["driver"].get("rules").is_none());
    }

    #[test]
    fn test_sarif_severity_mapping() {
        let result = LintResult::new(
            PathBuf::from("Program.cs"),
            vec![
                violation("final-newline", "msg", Severity::Error),
                violation("max-line-length", "msg", Severity::Warning),
                violation("operator-at-line-start", "msg", Severity::Info),
            ],
        );
        let parsed = sarif(&[result]);

        let results = parsed["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results[0]["level"], "error");
        assert_eq!(results[1]["level"], "warning");
        assert_eq!(results[2]["level"], "note");
        assert_eq!(results[0]["ruleId"], "final-newline");
        assert_eq!(results[0]["message"]["text"], "msg");
    }

    #[test]
    fn test_sarif_region_is_one_based() {
        let loc = Location::new(Position::new(5, 0), Position::new(5, 12));
        let result = LintResult::new(
            PathBuf::from("src\\Program.cs"),
            vec![violation("max-line-length", "Line is too long", Severity::Error).with_location(loc)],
        );
        let parsed = sarif(&[result]);

        let location = &parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "src/Program.cs");
        assert_eq!(
            location["region"],
            serde_json::json!({ "startLine": 5, "startColumn": 1, "endLine": 5, "endColumn": 13 })
        );
    }

    #[test]
    fn test_sarif_rules_are_unique_and_described() {
        let results = vec![
            LintResult::new(
                PathBuf::from("A.cs"),
                vec![
                    violation("no-trailing-whitespace", "m", Severity::Error),
                    violation("final-newline", "m", Severity::Error),
                ],
            ),
            LintResult::new(
                PathBuf::from("B.cs"),
                vec![violation("no-trailing-whitespace", "m", Severity::Error)],
            ),
        ];
        let parsed = sarif(&results);

        let rules = parsed["runs"][0]["tool"]["driver"]["rules"]
            .as_array()
            .unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["final-newline", "no-trailing-whitespace"]);
        assert!(rules[0]["shortDescription"]["text"].is_string());
        assert_eq!(parsed["runs"][0]["results"].as_array().unwrap().len(), 3);
    }
}
