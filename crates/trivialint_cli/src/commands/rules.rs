//! Rules command implementation

use miette::{IntoDiagnostic, Result};
use trivialint_core::{LinterConfig, Severity, builtin_rules};

use crate::cli::Cli;
use crate::commands::lint::find_config;

/// Prints the rule catalogue with the status each rule has under the
/// active configuration.
pub fn run_rules(cli: &Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => LinterConfig::from_file(path).into_diagnostic()?,
        None => find_config()?,
    };

    println!("{:<32} {:<8} {:<8} Description", "Rule", "Status", "Fixable");
    println!("{:-<32} {:-<8} {:-<8} {:-<11}", "", "", "", "");
    for rule in builtin_rules() {
        let status = if config.is_rule_enabled(rule.id()) {
            match config.rule_severity(rule.id()) {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "info",
            }
        } else {
            "off"
        };
        let fixable = if rule.fixable() { "yes" } else { "no" };
        println!(
            "{:<32} {:<8} {:<8} {}",
            rule.id(),
            status,
            fixable,
            rule.description()
        );
    }

    Ok(())
}
