//! Checks that a document ends with exactly one line break.
//!
//! A document is valid when it is empty, or when its last line is empty and
//! the line before it is not blank. Lines that start inside the last token,
//! or inside the last comment or directive, never count as trailing blank
//! lines.

use trivialint_ast::{Document, Span, Trivia, TriviaSlot, TriviaSplice};

use crate::edit::TextEdit;

/// Why the end of a document is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalNewline {
    /// The last line has content or whitespace and no line break.
    Missing(Span),
    /// Blank lines are stacked before end of file. The span starts at the
    /// first superfluous blank line.
    Stacked(Span),
}

impl FinalNewline {
    pub fn span(self) -> Span {
        match self {
            FinalNewline::Missing(span) | FinalNewline::Stacked(span) => span,
        }
    }
}

/// Returns the violation at the end of `document`, if any.
pub fn scan(document: &Document) -> Option<FinalNewline> {
    if document.is_empty() {
        return None;
    }

    let lines = document.lines();
    let content_end = document.last_token().map_or(0, |token| token.span().end);
    let trivia_end = tail(document)
        .iter()
        .rev()
        .find(|(_, trivia)| !trivia.is_blank())
        .map_or(0, |(span, _)| span.end);
    let blank_from = content_end.max(trivia_end);

    if !lines.last().is_empty() {
        return Some(FinalNewline::Missing(Span::new(content_end, document.len())));
    }

    let mut first_blank = None;
    for line in lines.iter().rev().skip(1) {
        if !line.is_blank || line.start < blank_from {
            break;
        }
        first_blank = Some(line.start);
    }

    first_blank.map(|start| FinalNewline::Stacked(Span::new(start, document.len())))
}

/// The trivia following the last token: its trailing list, then the leading
/// list of the end-of-file token.
fn tail(document: &Document) -> Vec<(Span, &Trivia)> {
    document
        .last_token()
        .into_iter()
        .flat_map(|token| token.trailing_trivia())
        .chain(document.end_of_file().leading_trivia())
        .map(|item| (item.span, item.trivia))
        .collect()
}

/// Rewrites the trivia after the last token so the document ends with one
/// line break in the document's own style.
///
/// The trivia following the last token (its trailing list, then the leading
/// list of the end-of-file token) is cut after the last comment or directive,
/// and never before `span.start`. A single line break is appended unless the
/// kept part already ends with one. A document without any content becomes
/// empty. Returns `None` when `span` starts inside a kept comment or
/// directive, since no trivia edit can resolve it.
pub fn edit(document: &Document, rule_id: &str, span: Span) -> Option<TextEdit> {
    let last = document.last_token();
    let eof = document.end_of_file();

    let trailing: &[Trivia] = last.map_or(&[], |token| token.trailing());
    let tail = tail(document);

    let content_free = last.is_none() && tail.iter().all(|(_, trivia)| trivia.is_blank());
    let keep = if content_free {
        0
    } else {
        let after_content = tail
            .iter()
            .rposition(|(_, trivia)| !trivia.is_blank())
            .map_or(0, |i| i + 1);
        let before_span = tail
            .iter()
            .take_while(|(item_span, _)| item_span.end <= span.start)
            .count();
        after_content.max(before_span)
    };

    let spans_into_kept = tail[..keep]
        .iter()
        .any(|(item_span, _)| item_span.start < span.start && span.start < item_span.end);
    if spans_into_kept {
        return None;
    }

    let ends_with_break = keep > 0 && tail[keep - 1].1.is_end_of_line();
    let appended: Vec<Trivia> = if content_free || ends_with_break {
        Vec::new()
    } else {
        vec![Trivia::end_of_line(document.line_break())]
    };

    if keep == tail.len() && appended.is_empty() {
        return None;
    }

    let split = trailing.len();
    let splices = match last {
        Some(token) if keep <= split => vec![
            TriviaSplice::new(token.id(), TriviaSlot::Trailing, keep..split, appended),
            TriviaSplice::replace_all(eof, TriviaSlot::Leading, Vec::new()),
        ],
        _ => vec![TriviaSplice::new(
            eof.id(),
            TriviaSlot::Leading,
            keep - split..eof.leading().len(),
            appended,
        )],
    };
    let splices = splices.into_iter().filter(|s| !s.is_noop()).collect();

    Some(TextEdit::new(rule_id, span, splices))
}
