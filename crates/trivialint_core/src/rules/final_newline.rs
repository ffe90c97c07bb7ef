//! final-newline rule: the file ends with exactly one line break.

use trivialint_ast::{Document, Span};

use crate::LinterError;
use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::rules::Rule;
use crate::scanners::final_newline;
use crate::violation::Violation;

const RULE_ID: &str = "final-newline";
const MESSAGE: &str = "The file must end with a single newline.";

pub struct FinalNewlineRule;

impl Rule for FinalNewlineRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "The file must end with a single newline"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check_document(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, LinterError> {
        Ok(final_newline::scan(ctx.document)
            .map(|found| ctx.violation(RULE_ID, MESSAGE, found.span()))
            .into_iter()
            .collect())
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        final_newline::edit(document, RULE_ID, span)
    }
}
