use trivialint_parser::{CSharpParser, ParsedSource, Parser};

use crate::cancel::CancellationToken;
use crate::context::RuleContext;
use crate::options::AnalyzerOptions;
use crate::rules::Rule;
use crate::violation::Violation;

pub fn parse(source: &str) -> ParsedSource {
    CSharpParser::new()
        .parse(source)
        .expect("test source should parse")
}

/// Runs one rule over `source` with default options.
pub fn run_rule(rule: &dyn Rule, source: &str) -> Vec<Violation> {
    run_rule_with(rule, source, &AnalyzerOptions::default())
}

pub fn run_rule_with(rule: &dyn Rule, source: &str, options: &AnalyzerOptions) -> Vec<Violation> {
    let parsed = parse(source);
    let cancel = CancellationToken::new();
    let ctx = RuleContext::new(&parsed.document, &parsed.syntax, options, &cancel);

    let mut violations: Vec<Violation> = parsed
        .syntax
        .nodes()
        .iter()
        .filter(|node| rule.node_kinds().contains(&node.kind()))
        .flat_map(|node| rule.check_node(node, &ctx))
        .collect();
    violations.extend(rule.check_document(&ctx).expect("rule should not fail"));
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    violations
}

/// The reported spans as `(start, end)` pairs.
pub fn spans(violations: &[Violation]) -> Vec<(u32, u32)> {
    violations
        .iter()
        .map(|v| (v.span.start, v.span.end))
        .collect()
}

/// Applies every fix of one rule, from the end of the document backwards.
pub fn fix_rule(rule: &dyn Rule, source: &str) -> String {
    let mut document = parse(source).document;
    for violation in run_rule(rule, source).iter().rev() {
        if let Some(edit) = rule.fix(&document, violation.span) {
            document = edit.apply(&document).expect("edit should apply");
        }
    }
    document.text().to_string()
}
