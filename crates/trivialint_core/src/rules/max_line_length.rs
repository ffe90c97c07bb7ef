//! max-line-length rule. Analysis only; the limit comes from the analysis
//! options.

use crate::LinterError;
use crate::context::RuleContext;
use crate::rules::Rule;
use crate::scanners::line_length;
use crate::violation::Violation;

const RULE_ID: &str = "max-line-length";
const MESSAGE: &str = "Line is too long";

pub struct MaxLineLength;

impl Rule for MaxLineLength {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Line should not be too long"
    }

    fn check_document(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, LinterError> {
        let spans = line_length::scan(
            ctx.document,
            ctx.options.max_line_length,
            ctx.cancellation(),
        )?;
        Ok(spans
            .into_iter()
            .map(|span| ctx.violation(RULE_ID, MESSAGE, span))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AnalyzerOptions;
    use crate::test_utils::{run_rule, run_rule_with, spans};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_limit() {
        let short = format!("// {}\n", "x".repeat(177));
        assert!(run_rule(&MaxLineLength, &short).is_empty());

        let long = format!("// {}\n", "x".repeat(178));
        assert_eq!(spans(&run_rule(&MaxLineLength, &long)), vec![(0, 181)]);
    }

    #[test]
    fn test_configured_limit() {
        let options = AnalyzerOptions::default().with_max_line_length(10);
        let source = "int a = 1;\nint bb = 22;\n";
        let violations = run_rule_with(&MaxLineLength, source, &options);

        assert_eq!(spans(&violations), vec![(11, 23)]);
        assert_eq!(violations[0].message, MESSAGE);
        let loc = violations[0].loc.expect("location is resolved");
        assert_eq!(loc.start.line, 2);
    }

    #[test]
    fn test_not_fixable() {
        assert!(!MaxLineLength.fixable());
    }
}
