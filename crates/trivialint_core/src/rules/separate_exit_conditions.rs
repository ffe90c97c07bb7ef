//! separate-exit-conditions rule: an `if` that returns when one of several
//! OR'ed conditions holds must be split into one `if` per condition.
//!
//! The condition must be a top-level `||` expression or `or` pattern, and the
//! body (or the first statement of a block body) a `return`. An else chain
//! ending in a plain `else` makes the statement legal again.

use trivialint_ast::{Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "separate-exit-conditions";
const MESSAGE: &str = "There must not be OR'ed exit conditions";

pub struct SeparateExitConditions;

impl Rule for SeparateExitConditions {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Exit conditions must use separate IF statements instead of OR'ed statements"
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStatement]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::IfStatement {
            extent,
            disjunction,
            body_first,
            ends_with_else,
        } = node
        else {
            return Vec::new();
        };
        let exits = ctx.token(*body_first).text() == "return";
        if !*disjunction || !exits || *ends_with_else {
            return Vec::new();
        }
        let span = Span::new(
            ctx.token(extent.first).span().start,
            ctx.token(extent.last).span().end,
        );
        vec![ctx.violation(RULE_ID, MESSAGE, span)]
    }
}
