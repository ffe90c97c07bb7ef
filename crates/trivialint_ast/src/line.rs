//! Line table derived from document text.

use crate::span::{Position, Span};

/// Pre-computed metadata for a single physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Byte offset of line start (inclusive).
    pub start: u32,
    /// Byte offset of the end of line content, excluding the line break.
    pub end: u32,
    /// Byte offset after the line break. Equal to `end` on the last line.
    pub break_end: u32,
    /// Whether this line contains only whitespace.
    pub is_blank: bool,
}

impl LineInfo {
    fn from_line(start: u32, line_text: &str, break_len: u32) -> Self {
        let end = start + line_text.len() as u32;
        Self {
            start,
            end,
            break_end: end + break_len,
            is_blank: line_text.trim().is_empty(),
        }
    }

    /// Span of the line content, line break excluded.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// True if the line has no characters at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn has_break(&self) -> bool {
        self.break_end > self.end
    }

    /// Returns the line content from the document text.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }

    /// Length of the line content in characters.
    pub fn char_len(&self, source: &str) -> usize {
        self.text(source).chars().count()
    }
}

/// Lines of a document, split on `\r\n`, `\n` and `\r`.
///
/// There is always at least one line. Text ending in a line break has a final
/// empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<LineInfo>,
}

impl LineTable {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut line_start = 0usize;
        let mut i = 0usize;

        while i < bytes.len() {
            let break_len = match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
                b'\r' | b'\n' => 1,
                _ => {
                    i += 1;
                    continue;
                }
            };
            lines.push(LineInfo::from_line(
                line_start as u32,
                &source[line_start..i],
                break_len,
            ));
            i += break_len as usize;
            line_start = i;
        }
        lines.push(LineInfo::from_line(line_start as u32, &source[line_start..], 0));

        Self { lines }
    }

    /// Returns the number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Never true for a constructed table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineInfo> {
        self.lines.iter()
    }

    /// Returns line information by 0-based index.
    pub fn get(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    pub fn last(&self) -> &LineInfo {
        // the constructor always pushes the final line
        &self.lines[self.lines.len() - 1]
    }

    /// Converts a byte offset to a 0-based line index.
    ///
    /// Offsets inside a line break belong to the line the break ends.
    pub fn line_index(&self, offset: u32) -> usize {
        self.lines
            .partition_point(|info| info.start <= offset)
            .saturating_sub(1)
    }

    /// Converts a byte offset to a line/column position.
    pub fn position(&self, source: &str, offset: u32) -> Position {
        let index = self.line_index(offset);
        let info = &self.lines[index];
        let column_end = (offset.min(info.end) as usize).min(source.len());
        let column = source
            .get(info.start as usize..column_end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        Position::new(index as u32 + 1, column as u32)
    }
}

impl<'a> IntoIterator for &'a LineTable {
    type Item = &'a LineInfo;
    type IntoIter = std::slice::Iter<'a, LineInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
