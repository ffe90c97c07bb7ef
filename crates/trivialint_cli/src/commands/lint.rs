//! Lint command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use trivialint_core::{ConfigOverride, Linter, LinterConfig};

use crate::cli::{Cli, OutputFormat};
use crate::fix::{FixSummary, output_fix_summary};
use crate::output::output_results;

pub fn run_lint(
    cli: &Cli,
    patterns: &[String],
    format: OutputFormat,
    fix: bool,
    dry_run: bool,
    timings: bool,
    max_line_length: Option<u32>,
) -> Result<bool> {
    let mut config = if let Some(ref path) = cli.config {
        LinterConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    if timings {
        config.timings = true;
    }

    if let Some(limit) = max_line_length {
        // a command-line limit wins over every configured override
        config
            .push_override(ConfigOverride {
                files: "**".to_string(),
                max_line_length: Some(limit as usize),
            })
            .into_diagnostic()?;
    }

    let timings_enabled = config.timings;
    let linter = Linter::new(config).into_diagnostic()?;

    let (results, failures) = if fix {
        linter.fix_patterns(patterns, dry_run).into_diagnostic()?
    } else {
        linter.lint_patterns(patterns).into_diagnostic()?
    };

    let failures: Vec<(PathBuf, String)> = failures
        .into_iter()
        .map(|(path, error)| (path, error.to_string()))
        .collect();

    if fix && format == OutputFormat::Text {
        output_fix_summary(&FixSummary::from_results(&results, &failures), dry_run);
    } else if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    let has_errors = output_results(&results, format, timings_enabled)?;

    Ok(has_errors || !failures.is_empty())
}

pub fn find_config() -> Result<LinterConfig> {
    if let Some(path) = LinterConfig::discover(".") {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}
