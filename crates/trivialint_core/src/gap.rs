//! Whitespace-gap classification between two adjacent tokens.
//!
//! The gap between `left` and `right` is exactly `left.trailing` followed by
//! `right.leading`; no other trivia sits between adjacent tokens. Both
//! contracts are pure functions of the token pair.

use trivialint_ast::{Document, Span, TokenRef, Trivia, TriviaSlot};

use crate::edit::{TextEdit, replace_list};

/// Required shape of a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapContract {
    /// Nothing at all between the tokens.
    NoWhitespace,
    /// `left.trailing` is one single-space whitespace trivia.
    SingleSpace,
}

impl GapContract {
    /// Returns the span to report if the gap breaks the contract.
    ///
    /// Returns `None` when either token is missing: a synthesized token
    /// cannot anchor a fix.
    pub fn check(self, left: TokenRef<'_>, right: TokenRef<'_>) -> Option<Span> {
        if left.is_missing() || right.is_missing() {
            return None;
        }
        match self {
            GapContract::NoWhitespace => no_whitespace(left, right),
            GapContract::SingleSpace => single_space(left, right),
        }
    }

    fn left_trailing(self) -> Vec<Trivia> {
        match self {
            GapContract::NoWhitespace => Vec::new(),
            GapContract::SingleSpace => vec![Trivia::space()],
        }
    }
}

/// The span strictly between two tokens, trivia included.
pub fn gap_span(left: TokenRef<'_>, right: TokenRef<'_>) -> Span {
    Span::new(left.span().end, right.span().start)
}

fn no_whitespace(left: TokenRef<'_>, right: TokenRef<'_>) -> Option<Span> {
    if left.trailing().is_empty() && right.leading().is_empty() {
        None
    } else {
        Some(gap_span(left, right))
    }
}

fn single_space(left: TokenRef<'_>, right: TokenRef<'_>) -> Option<Span> {
    match left.trailing() {
        // a pure omission is reported on the right token itself
        [] => Some(right.span()),
        [only] if only.is_single_space() => None,
        _ => Some(gap_span(left, right)),
    }
}

/// Builds the edit restoring `contract` for the gap reported at `span`.
///
/// The boundary tokens are re-derived from the span: the right token is the
/// first one starting at or after `span.start`, the left token its
/// predecessor. This works both for gap spans and for point spans on the
/// right token.
pub fn gap_edit(
    document: &Document,
    rule_id: &str,
    span: Span,
    contract: GapContract,
) -> Option<TextEdit> {
    let right = document.token_at_or_after(span.start);
    let left = right.previous()?;
    if left.is_missing() || right.is_missing() {
        return None;
    }

    let splices: Vec<_> = [
        replace_list(left, TriviaSlot::Trailing, contract.left_trailing()),
        replace_list(right, TriviaSlot::Leading, Vec::new()),
    ]
    .into_iter()
    .flatten()
    .collect();

    Some(TextEdit::new(rule_id, gap_span(left, right), splices))
}
