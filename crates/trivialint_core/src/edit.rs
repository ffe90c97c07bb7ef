//! Text edits: the trivia rewrite fixing one violation.

use trivialint_ast::{Document, Span, TokenRef, Trivia, TriviaSlot, TriviaSplice};

use crate::LinterError;

/// A minimal trivia rewrite derived from one violation.
///
/// `span` is the source region the edit owns. Two edits can be applied in the
/// same batch only if their spans do not conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub rule_id: String,
    pub span: Span,
    pub splices: Vec<TriviaSplice>,
}

impl TextEdit {
    pub fn new(rule_id: impl Into<String>, span: Span, splices: Vec<TriviaSplice>) -> Self {
        Self {
            rule_id: rule_id.into(),
            span,
            splices,
        }
    }

    /// True if the edit would leave the document unchanged.
    pub fn is_empty(&self) -> bool {
        self.splices.is_empty()
    }

    pub fn conflicts_with(&self, other: &TextEdit) -> bool {
        self.span.conflicts_with(&other.span)
    }

    /// Applies this edit alone.
    pub fn apply(&self, document: &Document) -> Result<Document, LinterError> {
        Ok(document.splice(self.splices.clone())?)
    }
}

/// Replaces a whole trivia list, or returns `None` if it already holds
/// `replacement`.
pub fn replace_list(
    token: TokenRef<'_>,
    slot: TriviaSlot,
    replacement: Vec<Trivia>,
) -> Option<TriviaSplice> {
    (token.trivia_list(slot) != replacement.as_slice())
        .then(|| TriviaSplice::replace_all(token, slot, replacement))
}

/// Splices removing every trivia element that lies inside `span` and matches
/// `filter`. Adjacent removals in one list are merged into one range.
pub fn remove_trivia_in(
    document: &Document,
    span: Span,
    filter: impl Fn(&Trivia) -> bool,
) -> Vec<TriviaSplice> {
    let mut splices: Vec<TriviaSplice> = Vec::new();
    let first = document.find_token_at(span.start);

    for token in document.tokens().skip(first.id().index()) {
        if token.full_span().start > span.end {
            break;
        }
        for trivia in token.trivia() {
            if trivia.span.is_empty() || !span.covers(&trivia.span) || !filter(trivia.trivia) {
                continue;
            }
            match splices.last_mut() {
                Some(last)
                    if last.token == trivia.token
                        && last.slot == trivia.slot
                        && last.range.end == trivia.index =>
                {
                    last.range.end += 1;
                }
                _ => splices.push(TriviaSplice::new(
                    trivia.token,
                    trivia.slot,
                    trivia.index..trivia.index + 1,
                    Vec::new(),
                )),
            }
        }
    }

    splices
}
