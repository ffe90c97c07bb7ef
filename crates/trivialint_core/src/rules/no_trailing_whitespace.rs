//! no-trailing-whitespace rule: no whitespace before a line break or at the
//! end of the file.

use trivialint_ast::{Document, Span};

use crate::LinterError;
use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::rules::Rule;
use crate::scanners::trailing_whitespace;
use crate::violation::Violation;

const RULE_ID: &str = "no-trailing-whitespace";
const MESSAGE: &str = "Line contains trailing whitespaces";

pub struct NoTrailingWhitespace;

impl Rule for NoTrailingWhitespace {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Lines should not contain trailing whitespaces"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check_document(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, LinterError> {
        let spans = trailing_whitespace::scan(ctx.document, ctx.cancellation())?;
        Ok(spans
            .into_iter()
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .collect())
    }

    fn fix(&self, document: &Document, span: Span) -> Option<TextEdit> {
        trailing_whitespace::edit(document, RULE_ID, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fix_rule, run_rule, spans};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::clean("class C {\n    int a;\n}\n")]
    #[case::indentation_only_before_token("class C {\n\tint a;\n}\n")]
    #[case::whitespace_inside_comment("int a; // x  \n")]
    fn test_valid(#[case] source: &str) {
        assert!(run_rule(&NoTrailingWhitespace, source).is_empty());
    }

    #[rstest]
    #[case::after_token("int a;  \n", vec![(6, 8)])]
    #[case::blank_line("class C {\n    \n}\n", vec![(10, 14)])]
    #[case::after_block_comment("int a; /* x */  \n", vec![(14, 16)])]
    #[case::at_end_of_file("int a;  ", vec![(6, 8)])]
    #[case::crlf("int a; \r\nint b;\t\r\n", vec![(6, 7), (15, 16)])]
    fn test_invalid(#[case] source: &str, #[case] expected: Vec<(u32, u32)>) {
        let violations = run_rule(&NoTrailingWhitespace, source);
        assert_eq!(spans(&violations), expected);
        assert!(violations.iter().all(|v| v.message == MESSAGE));
    }

    #[rstest]
    #[case("int a;  \n", "int a;\n")]
    #[case("class C {\n    \n}\n", "class C {\n\n}\n")]
    #[case("int a; /* x */  \n", "int a; /* x */\n")]
    #[case("int a; \r\nint b;\t\r\n", "int a;\r\nint b;\r\n")]
    fn test_fix(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix_rule(&NoTrailingWhitespace, source), expected);
    }
}
