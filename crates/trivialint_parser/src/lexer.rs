//! Lossless C# lexer.
//!
//! Trivia attachment follows the usual compiler convention: a token's trailing
//! trivia is everything after it on the same line, up to and including the
//! first line break. Everything else before the next token is that token's
//! leading trivia. Trivia after the last token belongs to the end-of-file
//! token.

use trivialint_ast::{Document, Token, TokenKind, Trivia, TriviaKind};

use crate::ParseError;

/// Reserved words, sorted for binary search.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Multi-character punctuators, longest first. `>` is always lexed alone
/// (except in `>=`) so nested generic argument lists close cleanly, and `?.`
/// is lexed as `?` followed by `.`.
const PUNCTUATORS: &[&str] = &[
    "??=", "<<=", "??", "=>", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "<<", "->", "::", "..",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.binary_search(&text).is_ok()
}

/// Lexes `source` into a [`Document`].
pub fn tokenize(source: &str) -> Result<Document, ParseError> {
    Lexer::new(source).tokenize()
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    /// Only whitespace has been seen since the last line break.
    line_start: bool,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            line_start: true,
        }
    }

    fn tokenize(mut self) -> Result<Document, ParseError> {
        if self.source.len() > u32::MAX as usize {
            return Err(ParseError::invalid_source(format!(
                "source is {} bytes, the limit is {}",
                self.source.len(),
                u32::MAX
            )));
        }

        let mut tokens = Vec::new();
        loop {
            let leading = self.leading_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token::end_of_file().with_leading(leading));
                break;
            }
            let (kind, len) = scan_token(self.rest());
            let text = self.take(len);
            let trailing = self.trailing_trivia();
            tokens.push(
                Token::new(kind, text)
                    .with_leading(leading)
                    .with_trailing(trailing),
            );
        }

        Ok(Document::new(tokens)?)
    }

    #[inline]
    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn take(&mut self, len: usize) -> &'s str {
        let text = &self.source[self.pos..self.pos + len];
        self.pos += len;
        text
    }

    fn leading_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = Vec::new();
        while let Some(t) = self.scan_trivia(true) {
            trivia.push(t);
        }
        trivia
    }

    fn trailing_trivia(&mut self) -> Vec<Trivia> {
        self.line_start = false;
        let mut trivia = Vec::new();
        while let Some(t) = self.scan_trivia(false) {
            let is_break = t.is_end_of_line();
            trivia.push(t);
            if is_break {
                break;
            }
        }
        trivia
    }

    fn scan_trivia(&mut self, leading: bool) -> Option<Trivia> {
        let rest = self.rest();
        let c = rest.chars().next()?;

        if c == '\r' || c == '\n' {
            let len = if rest.starts_with("\r\n") { 2 } else { 1 };
            self.line_start = true;
            return Some(Trivia::end_of_line(self.take(len)));
        }

        if is_blank(c) {
            let len = rest.find(|c: char| !is_blank(c)).unwrap_or(rest.len());
            return Some(Trivia::whitespace(self.take(len)));
        }

        let (kind, len) = if rest.starts_with("//") {
            let kind = if rest.starts_with("///") && !rest.starts_with("////") {
                TriviaKind::Structured
            } else {
                TriviaKind::Comment
            };
            (kind, line_len(rest))
        } else if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
            let kind = if rest.starts_with("/**") && !rest.starts_with("/**/") {
                TriviaKind::Structured
            } else {
                TriviaKind::Comment
            };
            (kind, len)
        } else if leading && self.line_start && c == '#' {
            (TriviaKind::Structured, line_len(rest))
        } else {
            return None;
        };

        self.line_start = false;
        Some(Trivia::new(kind, self.take(len)))
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() && c != '\r' && c != '\n'
}

fn line_len(rest: &str) -> usize {
    rest.find(['\r', '\n']).unwrap_or(rest.len())
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn ident_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|(_, c)| !is_ident_continue(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len())
}

/// Scans one token at the start of `rest`, which is never empty.
fn scan_token(rest: &str) -> (TokenKind, usize) {
    if let Some(len) = string_literal_len(rest) {
        return (TokenKind::StringLiteral, len);
    }

    let mut chars = rest.chars();
    let c = chars.next().unwrap_or('\0');
    let next = chars.next();

    if c == '\'' {
        return (TokenKind::CharacterLiteral, char_literal_len(rest));
    }
    if c == '@' && next.is_some_and(is_ident_start) {
        return (TokenKind::Identifier, 1 + ident_len(&rest[1..]));
    }
    if is_ident_start(c) {
        let len = ident_len(rest);
        let kind = if is_keyword(&rest[..len]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        return (kind, len);
    }
    if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
        return (TokenKind::NumericLiteral, number_len(rest));
    }

    let len = PUNCTUATORS
        .iter()
        .find(|p| rest.starts_with(**p))
        .map(|p| p.len())
        .unwrap_or(c.len_utf8());
    (TokenKind::Punctuation, len)
}

fn number_len(rest: &str) -> usize {
    let b = rest.as_bytes();
    let hex = rest.starts_with("0x") || rest.starts_with("0X");
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            c if c.is_ascii_alphanumeric() || c == b'_' => i += 1,
            b'.' if b.get(i + 1).is_some_and(u8::is_ascii_digit) => i += 1,
            b'+' | b'-' if !hex && i > 0 && matches!(b[i - 1], b'e' | b'E') => i += 1,
            _ => break,
        }
    }
    i
}

fn char_literal_len(rest: &str) -> usize {
    let b = rest.as_bytes();
    let mut i = 1;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'\'' => return i + 1,
            b'\r' | b'\n' => return i,
            _ => i += 1,
        }
    }
    b.len()
}

/// Length of a string literal starting at `rest`, including `$`/`@` prefixes,
/// raw `"""` strings and a `u8` suffix. Unterminated regular strings stop at
/// the end of the line.
fn string_literal_len(rest: &str) -> Option<usize> {
    let b = rest.as_bytes();
    let mut i = 0;
    let mut interpolated = false;
    let mut verbatim = false;
    loop {
        match b.get(i) {
            Some(b'$') => interpolated = true,
            Some(b'@') if !verbatim => verbatim = true,
            _ => break,
        }
        i += 1;
    }
    if b.get(i) != Some(&b'"') {
        return None;
    }

    let quotes = b[i..].iter().take_while(|&&c| c == b'"').count();
    let mut end = if quotes >= 3 {
        let body = i + quotes;
        let fence = "\"".repeat(quotes);
        rest[body..]
            .find(&fence)
            .map(|at| body + at + quotes)
            .unwrap_or(b.len())
    } else {
        string_body_end(rest, i + 1, verbatim, interpolated)
    };

    if rest[end..].starts_with("u8") || rest[end..].starts_with("U8") {
        end += 2;
    }
    Some(end)
}

fn string_body_end(s: &str, mut j: usize, verbatim: bool, interpolated: bool) -> usize {
    let b = s.as_bytes();
    let mut holes = 0usize;
    while j < b.len() {
        let c = b[j];
        if holes > 0 {
            match c {
                b'{' => holes += 1,
                b'}' => holes -= 1,
                b'"' | b'$' | b'@' => {
                    if let Some(len) = string_literal_len(&s[j..]) {
                        j += len;
                        continue;
                    }
                }
                b'\'' => {
                    j += char_literal_len(&s[j..]);
                    continue;
                }
                _ => {}
            }
            j += 1;
            continue;
        }
        match c {
            b'"' if verbatim && b.get(j + 1) == Some(&b'"') => j += 2,
            b'"' => return j + 1,
            b'\\' if !verbatim => j += 2,
            b'\r' | b'\n' if !verbatim => return j,
            b'{' if interpolated && b.get(j + 1) == Some(&b'{') => j += 2,
            b'{' if interpolated => {
                holes = 1;
                j += 1;
            }
            _ => j += 1,
        }
    }
    b.len()
}
