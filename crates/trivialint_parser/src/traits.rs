//! Parser trait definition.

use trivialint_ast::{Document, SyntaxTree};

use crate::ParseError;

/// The result of parsing one source file.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub document: Document,
    pub syntax: SyntaxTree,
}

/// Trait for parsing source text into a token/trivia document.
///
/// Implementations must be lossless: the returned document's text equals the
/// input exactly.
///
/// # Example
///
/// ```rust,ignore
/// use trivialint_parser::{ParseError, ParsedSource, Parser};
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse(&self, source: &str) -> Result<ParsedSource, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["cs"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a document and its recognized syntax.
    fn parse(&self, source: &str) -> Result<ParsedSource, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
