//! # trivialint_ast
//!
//! The lossless token/trivia model used by trivialint.
//!
//! A [`Document`] is an ordered sequence of immutable [`Token`]s. Each token
//! carries the [`Trivia`] (whitespace, line breaks, comments) around it, so the
//! whole source text can be rebuilt from the tokens alone. Positions are
//! derived from token order rather than stored in tokens, which lets rewrites
//! share every token they leave untouched.
//!
//! ## Example
//!
//! ```rust
//! use trivialint_ast::{DocumentBuilder, TokenKind, Trivia};
//!
//! let doc = DocumentBuilder::new()
//!     .token(TokenKind::Keyword, "void")
//!     .trailing(Trivia::space())
//!     .token(TokenKind::Identifier, "f")
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(doc.text(), "void f");
//! ```

mod document;
mod line;
mod span;
mod syntax;
mod token;
mod trivia;

pub use document::{
    Document, DocumentBuilder, DocumentError, SpliceError, TokenRef, TriviaRef,
    TriviaSlot, TriviaSplice,
};
pub use line::{LineInfo, LineTable};
pub use span::{Location, Position, Span};
pub use syntax::{
    DeclarationKind, MethodDeclaration, OperatorKind, StatementKind, SyntaxKind, SyntaxNode,
    SyntaxTree, TokenRange,
};
pub use token::{Token, TokenId, TokenKind};
pub use trivia::{Trivia, TriviaKind};
