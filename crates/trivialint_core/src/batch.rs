//! Batch fixing: many edits, one rewrite.
//!
//! All edits of a batch are computed against the same document and applied
//! together in a single copy-on-write pass. A batch whose edit spans conflict
//! is refused as a whole; overlapping edits always mean a rule claimed trivia
//! outside its own boundary.

use tracing::{debug, warn};
use trivialint_ast::{Document, TriviaSplice};

use crate::LinterError;
use crate::edit::TextEdit;
use crate::fixer::Fixer;
use crate::violation::Violation;

/// A rewritten document and the edits that produced it.
#[derive(Debug)]
pub struct FixOutcome {
    pub document: Document,
    /// Applied edits, ordered by span start.
    pub applied: Vec<TextEdit>,
}

impl FixOutcome {
    pub fn modified(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Applies every fix of a violation list to one document at once.
pub struct BatchFixer<'f, 'r> {
    fixer: &'f Fixer<'r>,
}

impl<'f, 'r> BatchFixer<'f, 'r> {
    pub fn new(fixer: &'f Fixer<'r>) -> Self {
        Self { fixer }
    }

    /// Computes one edit per fixable violation and applies them together.
    ///
    /// Violations of analysis-only rules and violations whose fix is a no-op
    /// are skipped. Two rules may claim the same trivia (trailing whitespace
    /// on an unterminated last line is reported by both `final-newline` and
    /// `no-trailing-whitespace`); such a list fails with
    /// [`LinterError::ConflictingEdits`] and nothing is applied. Use
    /// [`FixCoordinator`](crate::FixCoordinator) to fix a mixed-rule list over
    /// several rounds.
    pub fn fix_all(
        &self,
        document: &Document,
        violations: &[Violation],
    ) -> Result<FixOutcome, LinterError> {
        let edits = violations
            .iter()
            .filter_map(|violation| self.fixer.edit_for(document, violation))
            .collect();
        apply_edits(document, edits)
    }
}

/// Applies `edits` in one pass after checking that their spans are pairwise
/// free of conflicts.
pub fn apply_edits(document: &Document, mut edits: Vec<TextEdit>) -> Result<FixOutcome, LinterError> {
    edits.retain(|edit| !edit.is_empty());
    edits.sort_by(|a, b| (a.span.start, a.span.end).cmp(&(b.span.start, b.span.end)));
    check_disjoint(&edits)?;

    if edits.is_empty() {
        return Ok(FixOutcome {
            document: document.clone(),
            applied: Vec::new(),
        });
    }

    let splices: Vec<TriviaSplice> = edits
        .iter()
        .rev()
        .inspect(|edit| {
            debug!(
                "Applying fix: {} at [{}..{}]",
                edit.rule_id, edit.span.start, edit.span.end
            )
        })
        .flat_map(|edit| edit.splices.iter().cloned())
        .collect();

    let document = document.splice(splices)?;
    Ok(FixOutcome {
        document,
        applied: edits,
    })
}

/// Fails on the first pair of conflicting edits. `edits` must be sorted by
/// span start.
fn check_disjoint(edits: &[TextEdit]) -> Result<(), LinterError> {
    for (i, current) in edits.iter().enumerate() {
        for next in &edits[i + 1..] {
            if next.span.start > current.span.end {
                break;
            }
            if current.conflicts_with(next) {
                warn!(
                    "Refusing batch: {} at [{}..{}] overlaps {} at [{}..{}]",
                    current.rule_id,
                    current.span.start,
                    current.span.end,
                    next.rule_id,
                    next.span.start,
                    next.span.end
                );
                return Err(LinterError::ConflictingEdits {
                    first_rule: current.rule_id.clone(),
                    first: current.span,
                    second_rule: next.rule_id.clone(),
                    second: next.span,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::cancel::CancellationToken;
    use crate::context::RuleContext;
    use crate::options::AnalyzerOptions;
    use crate::registry::RuleRegistry;
    use crate::test_utils::parse;
    use pretty_assertions::assert_eq;
    use trivialint_ast::{Span, TokenId, Trivia, TriviaSlot};

    fn analyze(registry: &RuleRegistry, document: &Document, source: &str) -> Vec<Violation> {
        let parsed = parse(source);
        assert_eq!(parsed.document.text(), document.text());
        let options = AnalyzerOptions::default();
        let cancel = CancellationToken::new();
        let ctx = RuleContext::new(&parsed.document, &parsed.syntax, &options, &cancel);
        Analyzer::new(registry).analyze(&ctx).unwrap().violations
    }

    #[test]
    fn test_fix_all_applies_independent_edits_in_one_pass() {
        let source = "class C {\n  void f() { g (typeof (int)); }\n}\n";
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse(source).document;
        let violations = analyze(&registry, &document, source);

        let outcome = BatchFixer::new(&fixer)
            .fix_all(&document, &violations)
            .unwrap();

        assert_eq!(
            outcome.document.text(),
            "class C {\n  void f () { g(typeof(int)); }\n}\n"
        );
        assert_eq!(outcome.applied.len(), 3);
        assert!(outcome.modified());
        assert_eq!(document.text(), source);
    }

    #[test]
    fn test_fix_all_skips_analysis_only_rules() {
        let source = "void M () { using (a) b(); }\n";
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse(source).document;
        let violations = analyze(&registry, &document, source);
        assert_eq!(violations.len(), 1);

        let outcome = BatchFixer::new(&fixer)
            .fix_all(&document, &violations)
            .unwrap();

        assert!(!outcome.modified());
        assert_eq!(outcome.document.text(), source);
    }

    #[test]
    fn test_conflicting_batch_is_refused() {
        // Trailing whitespace at end of file is claimed by two rules.
        let source = "int a;  ";
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse(source).document;
        let violations = analyze(&registry, &document, source);

        let err = BatchFixer::new(&fixer)
            .fix_all(&document, &violations)
            .unwrap_err();

        assert!(matches!(
            err,
            LinterError::ConflictingEdits { first, second, .. }
                if first == Span::new(6, 8) && second == Span::new(6, 8)
        ));
    }

    #[test]
    fn test_mixed_rules_at_end_of_file_are_refused() {
        let source = "class C{\n  void f(){}\n}  ";
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse(source).document;
        let violations = analyze(&registry, &document, source);
        assert_eq!(violations.len(), 3);

        let err = BatchFixer::new(&fixer)
            .fix_all(&document, &violations)
            .unwrap_err();

        assert!(matches!(
            err,
            LinterError::ConflictingEdits { first, second, .. }
                if first == Span::new(23, 25) && second == Span::new(23, 25)
        ));
    }

    #[test]
    fn test_adjacent_edits_do_not_conflict() {
        let document = parse("a b c").document;
        let first = TextEdit::new(
            "x",
            Span::new(1, 2),
            vec![TriviaSplice::replace_all(
                document.token(TokenId(0)),
                TriviaSlot::Trailing,
                vec![],
            )],
        );
        let second = TextEdit::new(
            "y",
            Span::new(2, 2),
            vec![TriviaSplice::replace_all(
                document.token(TokenId(1)),
                TriviaSlot::Leading,
                vec![Trivia::whitespace("  ")],
            )],
        );

        let outcome = apply_edits(&document, vec![second, first]).unwrap();
        assert_eq!(outcome.document.text(), "a  b c");
        assert_eq!(outcome.applied[0].rule_id, "x");
    }

    #[test]
    fn test_empty_batch_returns_same_text() {
        let document = parse("int a;\n").document;
        let outcome = apply_edits(&document, Vec::new()).unwrap();
        assert_eq!(outcome.document.text(), "int a;\n");
        assert!(!outcome.modified());
    }
}
