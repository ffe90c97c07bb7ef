//! no-space-before-argument-list rule: no whitespace between an invoked
//! expression and its argument list.
//!
//! Covers method invocations (`Run()`, `x.Run<T>()`) and object creation
//! with an explicit type (`new List<int>()`).

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::gap::{GapContract, gap_edit};
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "no-space-before-argument-list";
const MESSAGE: &str =
    "There must not be any whitespaces in a method invocation before its arguments";

pub struct NoSpaceBeforeArgumentList;

impl Rule for NoSpaceBeforeArgumentList {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Method invocation must not have a whitespace before its arguments"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::Invocation, SyntaxKind::ObjectCreation]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let (left, right) = match node {
            SyntaxNode::Invocation { callee, open } => (*callee, *open),
            SyntaxNode::ObjectCreation { type_end, open } => (*type_end, *open),
            _ => return Vec::new(),
        };
        GapContract::NoWhitespace
            .check(ctx.token(left), ctx.token(right))
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .into_iter()
            .collect()
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        gap_edit(document, RULE_ID, span, GapContract::NoWhitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fix_rule, run_rule, spans};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::invocation("Run();\n")]
    #[case::member_invocation("x.Run(1);\n")]
    #[case::generic_invocation("x.Run<int>(1);\n")]
    #[case::object_creation("var l = new List<int>();\n")]
    #[case::declaration("class C { void Run () { } }\n")]
    fn test_valid(#[case] source: &str) {
        assert!(run_rule(&NoSpaceBeforeArgumentList, source).is_empty());
    }

    #[rstest]
    #[case::invocation("Run ();\n", vec![(3, 4)])]
    #[case::member_invocation("x.Run\t(1);\n", vec![(5, 6)])]
    #[case::generic_invocation("x.Run<int> (1);\n", vec![(10, 11)])]
    #[case::object_creation("var l = new List<int> ();\n", vec![(21, 22)])]
    #[case::newline("Run\n  ();\n", vec![(3, 6)])]
    #[case::nested("Run (Other ());\n", vec![(3, 4), (10, 11)])]
    fn test_invalid(#[case] source: &str, #[case] expected: Vec<(u32, u32)>) {
        let violations = run_rule(&NoSpaceBeforeArgumentList, source);
        assert_eq!(spans(&violations), expected);
    }

    #[rstest]
    #[case("Run ();\n", "Run();\n")]
    #[case("x.Run\t(1);\n", "x.Run(1);\n")]
    #[case("var l = new List<int> ();\n", "var l = new List<int>();\n")]
    #[case("Run\n  ();\n", "Run();\n")]
    #[case("Run (Other ());\n", "Run(Other());\n")]
    fn test_fix(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix_rule(&NoSpaceBeforeArgumentList, source), expected);
    }
}
