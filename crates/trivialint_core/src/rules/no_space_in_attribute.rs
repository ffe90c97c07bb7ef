//! no-space-in-attribute rule: an attribute name is immediately followed by
//! its argument list.

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::gap::{GapContract, gap_edit};
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "no-space-in-attribute";
const MESSAGE: &str =
    "There must be no whitespace in an attribute between the identifier and the argument list";

pub struct NoSpaceInAttribute;

impl Rule for NoSpaceInAttribute {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Attribute must not contain a space between the identifier and the argument list"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::Attribute]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::Attribute { name_end, open } = node else {
            return Vec::new();
        };
        GapContract::NoWhitespace
            .check(ctx.token(*name_end), ctx.token(*open))
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .into_iter()
            .collect()
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        gap_edit(document, RULE_ID, span, GapContract::NoWhitespace)
    }
}
