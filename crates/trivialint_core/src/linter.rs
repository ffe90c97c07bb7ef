//! Core linter engine.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use trivialint_parser::{CSharpParser, Parser};

use crate::analyzer::{Analysis, Analyzer};
use crate::cancel::CancellationToken;
use crate::context::RuleContext;
use crate::file_finder::FileFinder;
use crate::fix::{FixCoordinator, FixReport, FixResult};
use crate::fixer::FixerResult;
use crate::options::AnalyzerOptions;
use crate::registry::RuleRegistry;
use crate::{LintResult, LinterConfig, LinterError};

/// Files larger than this are refused.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Result type for lint_files and lint_patterns methods.
///
/// Contains a tuple of:
/// - Successful lint results
/// - Failed files with their errors (path and error)
pub type LintFilesResult = Result<(Vec<LintResult>, Vec<(PathBuf, LinterError)>), LinterError>;

/// The core linter engine.
///
/// Orchestrates file discovery, parsing, rule execution and fixing. One
/// linter can be shared between threads; every file gets its own document.
pub struct Linter {
    config: LinterConfig,
    registry: RuleRegistry,
    parser: CSharpParser,
    finder: FileFinder,
    cancel: CancellationToken,
}

impl Linter {
    /// Creates a new linter with the given configuration.
    pub fn new(config: LinterConfig) -> Result<Self, LinterError> {
        let parser = CSharpParser::new();
        let finder = FileFinder::new(parser.extensions(), &config.include, &config.exclude)?;
        let registry = RuleRegistry::from_config(&config);
        debug!("Linter created with {} rules", registry.len());

        Ok(Self {
            config,
            registry,
            parser,
            finder,
            cancel: CancellationToken::new(),
        })
    }

    /// Uses `cancel` to abort running analyses.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Lints files matching the given patterns.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_patterns(&self, patterns: &[String]) -> LintFilesResult {
        let files = self.discover_files(patterns)?;
        self.lint_files(&files)
    }

    /// Fixes files matching the given patterns.
    pub fn fix_patterns(&self, patterns: &[String], dry_run: bool) -> LintFilesResult {
        let files = self.discover_files(patterns)?;
        self.fix_files(&files, dry_run)
    }

    /// Discovers files matching the given patterns, relative to the
    /// configuration's base directory.
    pub fn discover_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>, LinterError> {
        let base_dir = self
            .config
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        self.finder.discover_files(patterns, &base_dir)
    }

    /// Lints a list of files in parallel using rayon.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        self.for_each_file(paths, |path| self.lint_file(path))
    }

    /// Fixes a list of files in parallel. With `dry_run` nothing is written;
    /// the results still report the fixes that would be applied.
    pub fn fix_files(&self, paths: &[PathBuf], dry_run: bool) -> LintFilesResult {
        self.for_each_file(paths, |path| self.fix_file(path, dry_run))
    }

    fn for_each_file<F>(&self, paths: &[PathBuf], run: F) -> LintFilesResult
    where
        F: Fn(&Path) -> Result<LintResult, LinterError> + Sync,
    {
        let results: Vec<Result<LintResult, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| run(path.as_path()).map_err(|e| (path.clone(), e)))
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(lint_result) => successes.push(lint_result),
                // a cancelled run fails as a whole
                Err((_, LinterError::Cancelled)) => return Err(LinterError::Cancelled),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }

        Ok((successes, failures))
    }

    /// Lints one file.
    pub fn lint_file(&self, path: &Path) -> Result<LintResult, LinterError> {
        debug!("Linting {}", path.display());
        let content = read_source(path)?;
        let analysis = self.lint_source(&content, Some(path))?;
        Ok(LintResult::new(path.to_path_buf(), analysis.violations).with_timings(analysis.timings))
    }

    /// Fixes one file, writing it back unless `dry_run` is set.
    pub fn fix_file(&self, path: &Path, dry_run: bool) -> Result<LintResult, LinterError> {
        debug!("Fixing {}", path.display());
        let content = read_source(path)?;
        let report = self.fix_source(&content, Some(path))?;

        let result = if report.modified() {
            FixerResult::new(
                report.fixes_applied,
                report.document.text().to_string(),
                true,
            )
        } else {
            FixerResult::unchanged(content)
        };

        if result.modified && !dry_run {
            fs::write(path, &result.fixed_content).map_err(|e| {
                LinterError::file(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!("Fixed {} issues in {}", result.fixes_applied, path.display());
        }

        Ok(LintResult::new(path.to_path_buf(), report.violations)
            .with_fixes_applied(result.fixes_applied))
    }

    /// Lints source text. `path` selects per-file configuration overrides.
    pub fn lint_source(&self, source: &str, path: Option<&Path>) -> Result<Analysis, LinterError> {
        let parsed = self.parser.parse(source)?;
        let options = self.options_for(path);
        let ctx = RuleContext::new(&parsed.document, &parsed.syntax, &options, &self.cancel);
        Analyzer::new(&self.registry)
            .with_timings(self.config.timings)
            .analyze(&ctx)
    }

    /// Fixes source text until no fixable violation remains.
    pub fn fix_source(&self, source: &str, path: Option<&Path>) -> Result<FixReport, LinterError> {
        let options = self.options_for(path);
        let report =
            FixCoordinator::new(&self.registry).fix(&self.parser, source, &options, &self.cancel)?;

        let name = path.map_or_else(|| "<source>".into(), |p| p.display().to_string());
        match report.result {
            FixResult::Converged { .. } => {}
            FixResult::MaxIterationsReached { remaining } => {
                warn!("{}: stopped fixing with {} fixable issues left", name, remaining);
            }
            FixResult::CycleDetected { cycle_length } => {
                warn!("{}: fixes cycle with length {}", name, cycle_length);
            }
        }
        Ok(report)
    }

    fn options_for(&self, path: Option<&Path>) -> AnalyzerOptions {
        AnalyzerOptions::resolve(&self.config, path)
    }
}

fn read_source(path: &Path) -> Result<String, LinterError> {
    let metadata = fs::metadata(path).map_err(|e| {
        LinterError::file(format!(
            "Failed to read metadata for {}: {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_file() {
        return Err(LinterError::file(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(LinterError::file(format!(
            "File size exceeds limit of {} bytes: {}",
            MAX_FILE_SIZE,
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))
}
