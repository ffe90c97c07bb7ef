//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use trivialint_core::LintResult;

pub fn output_json(results: &[LintResult]) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(results).into_diagnostic()?
    );
    Ok(())
}
