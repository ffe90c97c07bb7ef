//! # trivialint_parser
//!
//! Source parsing for trivialint.
//!
//! This crate provides:
//! - A `Parser` trait for plugging in source languages
//! - A lossless C# lexer producing a token/trivia [`Document`](trivialint_ast::Document)
//! - A shallow syntax recognizer producing the nodes rules dispatch on
//!
//! ## Example
//!
//! ```rust
//! use trivialint_parser::{CSharpParser, Parser};
//!
//! let parser = CSharpParser::new();
//! let parsed = parser.parse("void M () { }\n").unwrap();
//!
//! assert_eq!(parsed.document.text(), "void M () { }\n");
//! ```

mod csharp;
mod error;
mod lexer;
mod recognizer;
mod traits;

pub use csharp::CSharpParser;
pub use error::ParseError;
pub use lexer::{is_keyword, tokenize};
pub use recognizer::recognize;
pub use traits::{ParsedSource, Parser};
