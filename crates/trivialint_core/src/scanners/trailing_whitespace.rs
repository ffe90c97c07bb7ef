//! Finds whitespace runs that end at a line break or at end of file.
//!
//! The scan walks every trivia element in document order. A run starts at a
//! whitespace trivia and grows while the following trivia is contiguous
//! whitespace. Reaching a contiguous line break reports the run. Anything
//! else cancels it. A gap between two trivia elements means a token sits in
//! between, so whitespace after the gap starts a fresh run.

use trivialint_ast::{Document, Span, Trivia};

use crate::LinterError;
use crate::cancel::CancellationToken;
use crate::edit::{TextEdit, remove_trivia_in};

#[derive(Debug, Default)]
struct Run {
    start: u32,
    active: bool,
}

/// Returns the spans of all trailing whitespace runs, in document order.
/// Empty runs are never reported.
pub fn scan(document: &Document, cancel: &CancellationToken) -> Result<Vec<Span>, LinterError> {
    let mut spans = Vec::new();
    let mut run = Run::default();
    let mut previous_end = 0u32;

    for item in document.trivia() {
        let trivia = item.trivia;
        let contiguous = item.span.start == previous_end;

        if !run.active || !contiguous {
            run.active = trivia.is_whitespace();
            run.start = item.span.start;
        } else if trivia.is_end_of_line() {
            push_run(&mut spans, run.start, item.span.start);
            run.active = false;
        } else if !trivia.is_whitespace() {
            run.active = false;
        }

        previous_end = item.span.end;
        if trivia.is_end_of_line() {
            cancel.check()?;
        }
    }

    if run.active && previous_end == document.len() {
        push_run(&mut spans, run.start, previous_end);
    }

    Ok(spans)
}

fn push_run(spans: &mut Vec<Span>, start: u32, end: u32) {
    if start < end {
        spans.push(Span::new(start, end));
    }
}

/// Removes the whitespace trivia inside a reported run.
pub fn edit(document: &Document, rule_id: &str, span: Span) -> Option<TextEdit> {
    let splices = remove_trivia_in(document, span, Trivia::is_whitespace);
    (!splices.is_empty()).then(|| TextEdit::new(rule_id, span, splices))
}
