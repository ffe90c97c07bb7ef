//! Iterative fixing until no fixable violation remains.
//!
//! Each round re-parses the current text, analyzes it and applies a
//! conflict-free subset of the fixes as one batch. Edits deferred because
//! they conflict with a selected edit are recomputed in the next round.

use blake3::Hash;
use tracing::{debug, info};
use trivialint_ast::Document;
use trivialint_parser::{ParsedSource, Parser};

use crate::LinterError;
use crate::analyzer::Analyzer;
use crate::batch::apply_edits;
use crate::cancel::CancellationToken;
use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::fixer::{Fixer, select_non_conflicting};
use crate::options::AnalyzerOptions;
use crate::registry::RuleRegistry;
use crate::violation::Violation;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixResult {
    /// No fixable violation remains. `iterations` counts rounds that
    /// applied edits.
    Converged { iterations: usize },
    /// The round limit was hit with `remaining` fixable violations left.
    MaxIterationsReached { remaining: usize },
    /// A round reproduced the text of an earlier round.
    CycleDetected { cycle_length: usize },
}

/// Outcome of fixing one source text.
#[derive(Debug)]
pub struct FixReport {
    pub result: FixResult,
    pub document: Document,
    pub fixes_applied: usize,
    /// Violations of the final document, fixable or not.
    pub violations: Vec<Violation>,
}

impl FixReport {
    pub fn modified(&self) -> bool {
        self.fixes_applied > 0
    }
}

pub struct FixCoordinator<'r> {
    registry: &'r RuleRegistry,
    max_iterations: usize,
}

impl<'r> FixCoordinator<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn fix(
        &self,
        parser: &dyn Parser,
        source: &str,
        options: &AnalyzerOptions,
        cancel: &CancellationToken,
    ) -> Result<FixReport, LinterError> {
        let fixer = Fixer::new(self.registry);
        let mut history: Vec<Hash> = vec![hash_content(source)];
        let mut fixes_applied = 0;
        let mut iterations = 0;

        let mut parsed = parser.parse(source)?;
        let mut violations = self.analyze(&parsed, options, cancel)?;

        let result = loop {
            let edits: Vec<TextEdit> = violations
                .iter()
                .filter_map(|violation| fixer.edit_for(&parsed.document, violation))
                .collect();
            if edits.is_empty() {
                break FixResult::Converged { iterations };
            }
            if iterations == self.max_iterations {
                break FixResult::MaxIterationsReached {
                    remaining: edits.len(),
                };
            }
            cancel.check()?;

            let (selected, deferred) = select_non_conflicting(edits);
            if !deferred.is_empty() {
                debug!("Deferring {} conflicting fixes to the next round", deferred.len());
            }
            let outcome = apply_edits(&parsed.document, selected)?;
            fixes_applied += outcome.applied.len();
            iterations += 1;

            let text = outcome.document.text();
            let current_hash = hash_content(text);
            let cycle = history.iter().position(|h| *h == current_hash);
            history.push(current_hash);

            parsed = parser.parse(text)?;
            violations = self.analyze(&parsed, options, cancel)?;

            if let Some(prev_idx) = cycle {
                break FixResult::CycleDetected {
                    cycle_length: history.len() - 1 - prev_idx,
                };
            }
        };

        if fixes_applied > 0 {
            info!("Applied {} fixes in {} rounds", fixes_applied, iterations);
        }
        Ok(FixReport {
            result,
            document: parsed.document,
            fixes_applied,
            violations,
        })
    }

    fn analyze(
        &self,
        parsed: &ParsedSource,
        options: &AnalyzerOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Violation>, LinterError> {
        let ctx = RuleContext::new(&parsed.document, &parsed.syntax, options, cancel);
        Ok(Analyzer::new(self.registry).analyze(&ctx)?.violations)
    }
}

fn hash_content(content: &str) -> Hash {
    blake3::hash(content.as_bytes())
}
