//! Finds physical lines longer than a maximum.

use trivialint_ast::{Document, Span};

use crate::LinterError;
use crate::cancel::CancellationToken;

/// Returns the content span of every line with more than `max` characters.
/// Line breaks are not counted.
pub fn scan(
    document: &Document,
    max: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Span>, LinterError> {
    let text = document.text();
    let mut spans = Vec::new();

    for line in document.lines() {
        cancel.check()?;
        // byte length bounds the char count from above
        if (line.end - line.start) as usize > max && line.char_len(text) > max {
            spans.push(line.span());
        }
    }

    Ok(spans)
}
