//! space-before-parameter-list rule: exactly one space before a declared
//! parameter list.
//!
//! Applies to methods, constructors, local functions, delegates and
//! anonymous methods. The space goes between the name (or the closing `>` of
//! a type parameter list, or the `delegate` keyword) and `(`.
//!
//! ```csharp
//! void Run ()          // ok
//! void Run()           // missing space, reported on `(`
//! void Run<T>  ()      // two spaces, reported over the gap
//! ```

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::gap::{GapContract, gap_edit};
use crate::rules::Rule;
use crate::violation::Violation;

const RULE_ID: &str = "space-before-parameter-list";
const MESSAGE: &str = "There must be exactly ONE whitespace before parameters in method declaration";

pub struct SpaceBeforeParameterList;

impl Rule for SpaceBeforeParameterList {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Method declaration must have exactly one space before its parameters"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ParameterList]
    }

    fn check_node(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let SyntaxNode::ParameterList { name, open, .. } = node else {
            return Vec::new();
        };
        GapContract::SingleSpace
            .check(ctx.token(*name), ctx.token(*open))
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .into_iter()
            .collect()
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        gap_edit(document, RULE_ID, span, GapContract::SingleSpace)
    }
}
