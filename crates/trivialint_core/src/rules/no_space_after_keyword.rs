//! no-space-after-keyword rule: keyword expressions are written without
//! whitespace before `(`.
//!
//! Applies to `typeof`, `sizeof`, `default`, `checked`, `unchecked`,
//! `nameof`, constructor initializers (`: this(`, `: base(`) and
//! target-typed `new(`. The message names the keyword.

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::gap::{GapContract, gap_edit, gap_span};
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "no-space-after-keyword";

pub struct NoSpaceAfterKeyword;

impl Rule for NoSpaceAfterKeyword {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Keyword expressions must be immediately followed by '('"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::KeywordExpression]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::KeywordExpression { keyword, open } = node else {
            return Vec::new();
        };
        let keyword = ctx.token(*keyword);
        let open = ctx.token(*open);
        // only the keyword's own trailing trivia counts
        if keyword.trailing().is_empty() || keyword.is_missing() || open.is_missing() {
            return Vec::new();
        }
        let message = format!("'{}' must be immediately followed by '('", keyword.text());
        vec![ctx.violation(RULE_ID, message, gap_span(keyword, open))]
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
    #[case::typeof_("var t = typeof(int);\n")]
    #[case::nameof("var n = nameof(x);\n")]
    #[case::target_typed_new("List<int> l = new();\n")]
    #[case::constructor_initializer("class C { C () : base(1) { } }\n")]
    #[case::new_constraint("class C<T> where T : new () { }\n")]
    fn test_valid(#[case] source: &str) {
        assert!(run_rule(&NoSpaceAfterKeyword, source).is_empty());
    }

    #[rstest]
    #[case::typeof_("var t = typeof (int);\n", "typeof", (14, 15))]
    #[case::sizeof("var s = sizeof  (int);\n", "sizeof", (14, 16))]
    #[case::default("var d = default (int);\n", "default", (15, 16))]
    #[case::checked("var c = checked (x + 1);\n", "checked", (15, 16))]
    #[case::unchecked("var c = unchecked (x + 1);\n", "unchecked", (17, 18))]
    #[case::nameof("var n = nameof (x);\n", "nameof", (14, 15))]
    #[case::target_typed_new("List<int> l = new ();\n", "new", (17, 18))]
    #[case::base("class C { C () : base (1) { } }\n", "base", (21, 22))]
    #[case::this("class C { C () : this (1) { } }\n", "this", (21, 22))]
    fn test_invalid(#[case] source: &str, #[case] keyword: &str, #[case] span: (u32, u32)) {
        let violations = run_rule(&NoSpaceAfterKeyword, source);

        assert_eq!(spans(&violations), vec![span]);
        assert_eq!(
            violations[0].message,
            format!("'{}' must be immediately followed by '('", keyword)
        );
    }

    #[rstest]
    #[case("var t = typeof (int);\n", "var t = typeof(int);\n")]
    #[case("var t = typeof\n  (int);\n", "var t = typeof(int);\n")]
    #[case("class C { C () : base  (1) { } }\n", "class C { C () : base(1) { } }\n")]
    #[case("List<int> l = new ();\n", "List<int> l = new();\n")]
    fn test_fix(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix_rule(&NoSpaceAfterKeyword, source), expected);
    }
}
