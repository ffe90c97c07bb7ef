//! C# parser built from the lossless lexer and the syntax recognizer.

use tracing::debug;

use crate::lexer::tokenize;
use crate::recognizer::recognize;
use crate::{ParseError, ParsedSource, Parser};

/// C# source parser.
///
/// Produces a lossless [`Document`](trivialint_ast::Document) and the shallow
/// syntax tree the node rules consume. Malformed input never fails to parse;
/// unrecognized shapes simply produce no nodes.
pub struct CSharpParser;

impl CSharpParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CSharpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CSharpParser {
    fn name(&self) -> &str {
        "csharp"
    }

    fn extensions(&self) -> &[&str] {
        &["cs", "csx"]
    }

    fn parse(&self, source: &str) -> Result<ParsedSource, ParseError> {
        let document = tokenize(source)?;
        let syntax = recognize(&document);
        debug!(
            tokens = document.token_count(),
            nodes = syntax.len(),
            "parsed C# source"
        );
        Ok(ParsedSource { document, syntax })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivialint_ast::SyntaxKind;

    #[test]
    fn test_parse_is_lossless() {
        let parser = CSharpParser::new();
        let source = "class C\r\n{\r\n    void M () { }  \r\n}\r\n";

        let parsed = parser.parse(source).unwrap();

        assert_eq!(parsed.document.text(), source);
        assert_eq!(parsed.syntax.of_kind(SyntaxKind::ParameterList).count(), 1);
    }

    #[test]
    fn test_parse_empty_source() {
        let parsed = CSharpParser::new().parse("").unwrap();

        assert!(parsed.document.is_empty());
        assert!(parsed.syntax.is_empty());
    }

    #[test]
    fn test_extensions() {
        let parser = CSharpParser::new();
        assert!(parser.can_parse("cs"));
        assert!(parser.can_parse("CS"));
        assert!(!parser.can_parse("md"));
    }
}
