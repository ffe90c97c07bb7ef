//! Trivia: the non-semantic text attached to tokens.

use serde::{Deserialize, Serialize};

/// Classification of a trivia element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriviaKind {
    /// Spaces, tabs and other non-breaking blanks.
    Whitespace,
    /// A single line break (`\n`, `\r\n` or `\r`).
    EndOfLine,
    /// A line or block comment.
    Comment,
    /// Trivia with inner structure, such as documentation comments and
    /// preprocessor directives. Never includes the terminating line break.
    Structured,
    /// Anything else the producer could not classify.
    Other,
}

/// One trivia element. Its position is derived from the owning document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: String,
}

impl Trivia {
    pub fn new(kind: TriviaKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Whitespace, text)
    }

    /// The canonical single ASCII space.
    pub fn space() -> Self {
        Self::whitespace(" ")
    }

    pub fn end_of_line(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::EndOfLine, text)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Comment, text)
    }

    pub fn structured(text: impl Into<String>) -> Self {
        Self::new(TriviaKind::Structured, text)
    }

    /// Width in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TriviaKind::Whitespace
    }

    #[inline]
    pub fn is_end_of_line(&self) -> bool {
        self.kind == TriviaKind::EndOfLine
    }

    /// Whitespace or line breaks: trivia that carries no content.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.is_whitespace() || self.is_end_of_line()
    }

    /// True for exactly one Whitespace trivia holding a single ASCII space.
    #[inline]
    pub fn is_single_space(&self) -> bool {
        self.is_whitespace() && self.text == " "
    }
}

/// Total byte width of a trivia list.
pub fn width(trivia: &[Trivia]) -> u32 {
    trivia.iter().map(Trivia::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_space() {
        assert!(Trivia::space().is_single_space());
        assert!(!Trivia::whitespace("  ").is_single_space());
        assert!(!Trivia::whitespace("\t").is_single_space());
        assert!(!Trivia::end_of_line(" ").is_single_space());
    }

    #[test]
    fn test_blank() {
        assert!(Trivia::whitespace("\t").is_blank());
        assert!(Trivia::end_of_line("\r\n").is_blank());
        assert!(!Trivia::comment("// x").is_blank());
        assert!(!Trivia::structured("#region").is_blank());
    }

    #[test]
    fn test_width() {
        let list = vec![Trivia::whitespace("  "), Trivia::end_of_line("\r\n")];
        assert_eq!(width(&list), 4);
        assert_eq!(width(&[]), 0);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&TriviaKind::EndOfLine).unwrap();
        assert_eq!(json, r#""end_of_line""#);
    }
}
