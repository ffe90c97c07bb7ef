//! using-requires-braces rule: the statement embedded in a `using (...)`
//! statement is a block, or another `using` statement.
//!
//! ```csharp
//! using (var a = Open ()) { Read (a); }   // ok
//! using (var a = Open ())
//! using (var b = Open ()) { }             // ok, stacked usings
//! using (var a = Open ()) Read (a);       // reported
//! ```

use trivialint_ast::{Span, StatementKind, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "using-requires-braces";
const MESSAGE: &str = "There must be braces around the codeblock of a using statement";

pub struct UsingRequiresBraces;

impl Rule for UsingRequiresBraces {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Using statements must use braces around the codeblock"
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::UsingStatement]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::UsingStatement {
            body, body_kind, ..
        } = node
        else {
            return Vec::new();
        };
        if *body_kind != StatementKind::Other {
            return Vec::new();
        }
        let span = Span::new(
            ctx.token(body.first).span().start,
            ctx.token(body.last).span().end,
        );
        vec![ctx.violation(RULE_ID, MESSAGE, span)]
    }
}
