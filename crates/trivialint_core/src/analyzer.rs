//! One analysis pass: dispatches nodes to rules and collects violations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::LinterError;
use crate::context::RuleContext;
use crate::registry::RuleRegistry;
use crate::rules::Rule;
use crate::violation::Violation;

/// Violations of one pass, ordered by position then rule id.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub violations: Vec<Violation>,
    /// Time spent per rule. Empty unless timings were requested.
    pub timings: HashMap<String, Duration>,
}

/// Runs the rules of a registry over one document.
pub struct Analyzer<'r> {
    registry: &'r RuleRegistry,
    timings: bool,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            timings: false,
        }
    }

    pub fn with_timings(mut self, timings: bool) -> Self {
        self.timings = timings;
        self
    }

    /// Runs every registered rule once.
    ///
    /// No rule sees another rule's output, so the result depends only on the
    /// document, the syntax tree and the options.
    pub fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Analysis, LinterError> {
        let mut analysis = Analysis::default();

        for node in ctx.syntax.nodes() {
            ctx.check_cancelled()?;
            for (rule, severity) in self.registry.node_rules(node.kind()) {
                let found = self.timed(rule, &mut analysis.timings, || {
                    Ok(rule.check_node(node, ctx))
                })?;
                analysis
                    .violations
                    .extend(found.into_iter().map(|v| v.with_severity(severity)));
            }
        }

        for (rule, severity) in self.registry.document_rules() {
            let found = self.timed(rule, &mut analysis.timings, || rule.check_document(ctx))?;
            analysis
                .violations
                .extend(found.into_iter().map(|v| v.with_severity(severity)));
        }

        analysis
            .violations
            .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        analysis.violations.dedup();

        debug!(
            "Analyzed {} nodes, {} violations",
            ctx.syntax.len(),
            analysis.violations.len()
        );
        Ok(analysis)
    }

    fn timed<T>(
        &self,
        rule: &dyn Rule,
        timings: &mut HashMap<String, Duration>,
        run: impl FnOnce() -> Result<T, LinterError>,
    ) -> Result<T, LinterError> {
        if !self.timings {
            return run();
        }
        let start = Instant::now();
        let result = run();
        *timings.entry(rule.id().to_string()).or_default() += start.elapsed();
        result
    }
}
