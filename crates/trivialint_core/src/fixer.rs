//! Single-violation fixing.

use tracing::debug;
use trivialint_ast::Document;

use crate::LinterError;
use crate::edit::TextEdit;
use crate::registry::RuleRegistry;
use crate::violation::Violation;

/// Result of fixing one file.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a new fixer result.
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Turns violations into edits using the rule that reported them.
pub struct Fixer<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> Fixer<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    /// The edit fixing `violation`, derived from its span alone.
    ///
    /// Returns `None` for analysis-only rules, unknown rules and fixes that
    /// would not change the document.
    pub fn edit_for(&self, document: &Document, violation: &Violation) -> Option<TextEdit> {
        let rule = self.registry.get(&violation.rule_id)?;
        if !rule.fixable() {
            return None;
        }
        let edit = rule.fix(document, violation.span)?;
        if edit.is_empty() {
            debug!(
                "Fix for {} at [{}..{}] is a no-op",
                violation.rule_id, violation.span.start, violation.span.end
            );
            return None;
        }
        Some(edit)
    }

    /// Applies the fix of one violation, returning `None` when there is
    /// nothing to apply.
    pub fn fix(
        &self,
        document: &Document,
        violation: &Violation,
    ) -> Result<Option<Document>, LinterError> {
        self.edit_for(document, violation)
            .map(|edit| edit.apply(document))
            .transpose()
    }
}

/// Splits `edits` into a conflict-free subset and the edits that must wait
/// for another round.
///
/// Edits are taken greedily in span order; an edit conflicting with an
/// already selected one is deferred, never dropped.
pub fn select_non_conflicting(mut edits: Vec<TextEdit>) -> (Vec<TextEdit>, Vec<TextEdit>) {
    edits.sort_by(|a, b| {
        (a.span.start, a.span.end, &a.rule_id).cmp(&(b.span.start, b.span.end, &b.rule_id))
    });

    let mut selected: Vec<TextEdit> = Vec::with_capacity(edits.len());
    let mut deferred = Vec::new();
    for edit in edits {
        if selected.iter().rev().any(|chosen| chosen.conflicts_with(&edit)) {
            deferred.push(edit);
        } else {
            selected.push(edit);
        }
    }
    (selected, deferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse;
    use pretty_assertions::assert_eq;
    use trivialint_ast::Span;

    #[test]
    fn test_fix_single_violation() {
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse("Run ();\n").document;
        let violation = Violation::new("no-space-before-argument-list", "", Span::new(3, 4));

        let fixed = fixer.fix(&document, &violation).unwrap().unwrap();
        assert_eq!(fixed.text(), "Run();\n");
        assert_eq!(document.text(), "Run ();\n");
    }

    #[test]
    fn test_analysis_only_rule_has_no_edit() {
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse("int a;\n").document;
        let violation = Violation::new("max-line-length", "", Span::new(0, 6));

        assert!(fixer.edit_for(&document, &violation).is_none());
        assert!(fixer.fix(&document, &violation).unwrap().is_none());
    }

    #[test]
    fn test_unknown_rule_has_no_edit() {
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse("Run ();\n").document;
        let violation = Violation::new("no-such-rule", "", Span::new(3, 4));

        assert!(fixer.edit_for(&document, &violation).is_none());
    }

    #[test]
    fn test_compliant_gap_yields_no_edit() {
        let registry = RuleRegistry::builtin();
        let fixer = Fixer::new(&registry);
        let document = parse("Run();\n").document;
        let violation = Violation::new("no-space-before-argument-list", "", Span::new(3, 3));

        assert!(fixer.edit_for(&document, &violation).is_none());
    }

    #[test]
    fn test_select_non_conflicting_defers_overlaps() {
        let edits = vec![
            TextEdit::new("b", Span::new(6, 8), vec![]),
            TextEdit::new("a", Span::new(6, 8), vec![]),
            TextEdit::new("c", Span::new(0, 2), vec![]),
            TextEdit::new("d", Span::new(8, 8), vec![]),
        ];

        let (selected, deferred) = select_non_conflicting(edits);
        let ids = |edits: &[TextEdit]| edits.iter().map(|e| e.rule_id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&selected), vec!["c", "a", "d"]);
        assert_eq!(ids(&deferred), vec!["b"]);
    }

    #[test]
    fn test_fixer_result_unchanged() {
        let result = FixerResult::unchanged("int a;\n".to_string());
        assert_eq!(result.fixes_applied, 0);
        assert!(!result.modified);
    }
}
