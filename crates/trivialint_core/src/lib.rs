//! # trivialint_core
//!
//! Core linter engine for trivialint.
//!
//! This crate provides:
//! - The rule contract, the built-in rules and the rule registry
//! - The whitespace-gap classifier and the line-trivia scanners
//! - Single, batch and iterative fixing
//! - Configuration loading and per-file option resolution
//! - File discovery and parallel processing
//!
//! ## Example
//!
//! ```rust,ignore
//! use trivialint_core::{Linter, LinterConfig};
//!
//! let config = LinterConfig::from_file(".trivialint.jsonc")?;
//! let linter = Linter::new(config)?;
//!
//! let (results, failures) = linter.lint_patterns(&["src/**/*.cs".to_string()])?;
//! for result in results {
//!     println!("{}: {} issues", result.path.display(), result.violations.len());
//! }
//! ```

mod analyzer;
mod batch;
mod cancel;
mod config;
pub mod context;
pub mod edit;
mod error;
pub mod file_finder;
mod fix;
mod fixer;
pub mod formatters;
pub mod gap;
mod linter;
mod options;
mod registry;
mod result;
pub mod rules;
pub mod scanners;
mod violation;

pub use analyzer::{Analysis, Analyzer};
pub use batch::{BatchFixer, FixOutcome, apply_edits};
pub use cancel::CancellationToken;
pub use config::{ConfigOverride, LinterConfig, RuleOption};
pub use context::RuleContext;
pub use edit::TextEdit;
pub use error::LinterError;
pub use fix::{DEFAULT_MAX_ITERATIONS, FixCoordinator, FixReport, FixResult};
pub use fixer::{Fixer, FixerResult, select_non_conflicting};
pub use formatters::generate_sarif;
pub use gap::GapContract;
pub use linter::{LintFilesResult, Linter, MAX_FILE_SIZE};
pub use options::{
    AnalyzerOption, AnalyzerOptions, DEFAULT_MAX_LINE_LENGTH, EXTENSION_METHODS, MAX_LINE_LENGTH,
    NoOptions, OptionProvider,
};
pub use registry::RuleRegistry;
pub use result::{LintResult, LintSummary};
pub use rules::{Rule, builtin_rules};
pub use violation::{Severity, Violation};

#[cfg(test)]
mod test_utils;
