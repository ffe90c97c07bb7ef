//! no-space-in-cast rule: a cast's closing `)` is immediately followed by
//! its operand.

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::gap::{GapContract, gap_edit};
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "no-space-in-cast";
const MESSAGE: &str = "There must be no whitespace in a cast expression";

pub struct NoSpaceInCast;

impl Rule for NoSpaceInCast {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Cast expression must not contain a space"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CastExpression]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::CastExpression { close, operand } = node else {
            return Vec::new();
        };
        GapContract::NoWhitespace
            .check(ctx.token(*close), ctx.token(*operand))
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .into_iter()
            .collect()
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        gap_edit(document, RULE_ID, span, GapContract::NoWhitespace)
    }
}
