//! Tokens and their attached trivia.

use serde::{Deserialize, Serialize};

use crate::trivia::{self, Trivia};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuation,
    NumericLiteral,
    StringLiteral,
    CharacterLiteral,
    /// The zero-width token closing every document.
    EndOfFile,
}

/// Index of a token within its [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An immutable leaf of source text with its leading and trailing trivia.
///
/// Tokens carry no absolute position. The owning document derives spans from
/// token order, which lets rewritten documents share untouched tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub leading: Vec<Trivia>,
    pub trailing: Vec<Trivia>,
    /// Synthesized by error recovery; has no text and no trivia.
    pub missing: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: Vec::new(),
            trailing: Vec::new(),
            missing: false,
        }
    }

    /// Creates a missing token of the given kind.
    pub fn missing(kind: TokenKind) -> Self {
        Self {
            missing: true,
            ..Self::new(kind, "")
        }
    }

    pub fn end_of_file() -> Self {
        Self::new(TokenKind::EndOfFile, "")
    }

    pub fn with_leading(mut self, leading: Vec<Trivia>) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: Vec<Trivia>) -> Self {
        self.trailing = trailing;
        self
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    #[inline]
    pub fn is_end_of_file(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    #[inline]
    pub fn text_width(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn leading_width(&self) -> u32 {
        trivia::width(&self.leading)
    }

    #[inline]
    pub fn trailing_width(&self) -> u32 {
        trivia::width(&self.trailing)
    }

    /// Width of leading trivia, text and trailing trivia together.
    #[inline]
    pub fn full_width(&self) -> u32 {
        self.leading_width() + self.text_width() + self.trailing_width()
    }

    /// Appends the full text (trivia included) to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        for t in &self.leading {
            out.push_str(&t.text);
        }
        out.push_str(&self.text);
        for t in &self.trailing {
            out.push_str(&t.text);
        }
    }
}
