//! operator-at-line-start rule: when an expression is broken across lines,
//! the break goes before the operator, not after it.
//!
//! ```csharp
//! var total = price
//!     + tax;           // ok
//! var total = price +
//!     tax;             // reported on `+`
//! ```
//!
//! Checked operators are binary operators, `is`, the `and` / `or` pattern
//! combinators, `??`, both halves of `?.`, member-access dots and the `?` /
//! `:` of a conditional expression.

use trivialint_ast::{SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "operator-at-line-start";
const MESSAGE: &str =
    "Operator chaining with newline should have the operator at the beginning of a new line";

pub struct OperatorAtLineStart;

impl Rule for OperatorAtLineStart {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Operator chaining with newline should have the operator at the beginning of a new line"
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::OperatorToken]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::OperatorToken { operator, .. } = node else {
            return Vec::new();
        };
        let operator = ctx.token(*operator);
        if operator.trailing().iter().any(|t| t.is_end_of_line()) {
            vec![ctx.violation(RULE_ID, MESSAGE, operator.span())]
        } else {
            Vec::new()
        }
    }
}
