//! The Document: an ordered token sequence with derived positions.
//!
//! A document owns its tokens through `Arc`, so a rewrite produced by
//! [`Document::splice`] shares every token it does not touch with the
//! original. Concatenating each token's leading trivia, text and trailing
//! trivia in order reproduces the source text exactly.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::line::LineTable;
use crate::span::{Location, Position, Span};
use crate::token::{Token, TokenId, TokenKind};
use crate::trivia::Trivia;

/// Errors raised while assembling a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document must end with exactly one end-of-file token")]
    MissingEndOfFile,

    #[error("end-of-file token at index {0} is not the last token")]
    MisplacedEndOfFile(usize),

    #[error("missing token at index {0} carries text or trivia")]
    NonEmptyMissingToken(usize),

    #[error("document exceeds {} bytes", u32::MAX)]
    TooLarge,
}

/// Errors raised by [`Document::splice`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("token {0} does not exist")]
    UnknownToken(u32),

    #[error("token {0} is missing and cannot carry trivia")]
    MissingToken(u32),

    #[error("trivia range {start}..{end} is out of bounds for token {token} ({len} elements)")]
    RangeOutOfBounds {
        token: u32,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("overlapping trivia splices on token {0}")]
    Overlapping(u32),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Which trivia list of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriviaSlot {
    Leading,
    Trailing,
}

/// Replaces `range` of one token's trivia list with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaSplice {
    pub token: TokenId,
    pub slot: TriviaSlot,
    pub range: Range<usize>,
    pub replacement: Vec<Trivia>,
}

impl TriviaSplice {
    pub fn new(
        token: TokenId,
        slot: TriviaSlot,
        range: Range<usize>,
        replacement: Vec<Trivia>,
    ) -> Self {
        Self {
            token,
            slot,
            range,
            replacement,
        }
    }

    /// Replaces the whole list.
    pub fn replace_all(token: TokenRef<'_>, slot: TriviaSlot, replacement: Vec<Trivia>) -> Self {
        let len = token.trivia_list(slot).len();
        Self::new(token.id(), slot, 0..len, replacement)
    }

    /// True if applying the splice would not change anything.
    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.replacement.is_empty()
    }
}

/// One trivia element together with its absolute position.
#[derive(Debug, Clone, Copy)]
pub struct TriviaRef<'a> {
    pub token: TokenId,
    pub slot: TriviaSlot,
    pub index: usize,
    pub trivia: &'a Trivia,
    pub span: Span,
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    tokens: Vec<Arc<Token>>,
    full_starts: Vec<u32>,
    text: String,
    lines: LineTable,
}

impl Document {
    /// Creates a document from tokens. The last token must be the only
    /// end-of-file token.
    pub fn new(tokens: Vec<Token>) -> Result<Self, DocumentError> {
        Self::from_shared(tokens.into_iter().map(Arc::new).collect())
    }

    fn from_shared(tokens: Vec<Arc<Token>>) -> Result<Self, DocumentError> {
        match tokens.last() {
            Some(last) if last.is_end_of_file() => {}
            _ => return Err(DocumentError::MissingEndOfFile),
        }

        let mut full_starts = Vec::with_capacity(tokens.len());
        let mut offset: u64 = 0;
        for (index, token) in tokens.iter().enumerate() {
            if token.is_end_of_file() && index + 1 != tokens.len() {
                return Err(DocumentError::MisplacedEndOfFile(index));
            }
            if token.is_missing()
                && (!token.text.is_empty() || !token.leading.is_empty() || !token.trailing.is_empty())
            {
                return Err(DocumentError::NonEmptyMissingToken(index));
            }
            full_starts.push(offset as u32);
            offset += token.full_width() as u64;
            if offset > u32::MAX as u64 {
                return Err(DocumentError::TooLarge);
            }
        }

        let mut text = String::with_capacity(offset as usize);
        for token in &tokens {
            token.write_full_text(&mut text);
        }
        let lines = LineTable::new(&text);

        Ok(Self {
            tokens,
            full_starts,
            text,
            lines,
        })
    }

    /// Length of the document in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The full source text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn lines(&self) -> &LineTable {
        &self.lines
    }

    /// Number of tokens, end-of-file token included.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Returns the token with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    pub fn token(&self, id: TokenId) -> TokenRef<'_> {
        TokenRef {
            document: self,
            id,
            token: &self.tokens[id.index()],
            full_start: self.full_starts[id.index()],
        }
    }

    pub fn get(&self, id: TokenId) -> Option<TokenRef<'_>> {
        (id.index() < self.tokens.len()).then(|| self.token(id))
    }

    /// The shared handle of a token, for identity comparisons.
    pub fn shared_token(&self, id: TokenId) -> &Arc<Token> {
        &self.tokens[id.index()]
    }

    /// Iterates over all tokens in source order.
    pub fn tokens(&self) -> impl DoubleEndedIterator<Item = TokenRef<'_>> + '_ {
        (0..self.tokens.len()).map(move |i| self.token(TokenId(i as u32)))
    }

    pub fn end_of_file(&self) -> TokenRef<'_> {
        self.token(TokenId(self.tokens.len() as u32 - 1))
    }

    /// The last token before end-of-file that is not missing.
    pub fn last_token(&self) -> Option<TokenRef<'_>> {
        self.tokens()
            .rev()
            .skip(1)
            .find(|token| !token.is_missing())
    }

    /// Returns the token whose full span (trivia included) contains `offset`.
    ///
    /// Offsets at or past the end resolve to the end-of-file token.
    pub fn find_token_at(&self, offset: u32) -> TokenRef<'_> {
        if offset >= self.len() {
            return self.end_of_file();
        }
        let index = self
            .full_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        self.token(TokenId(index as u32))
    }

    /// Returns the first token whose text starts at or after `offset`.
    pub fn token_at_or_after(&self, offset: u32) -> TokenRef<'_> {
        let mut low = 0usize;
        let mut high = self.tokens.len() - 1;
        while low < high {
            let mid = (low + high) / 2;
            if self.token(TokenId(mid as u32)).span().start < offset {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        self.token(TokenId(low as u32))
    }

    /// Iterates over every trivia element in document order.
    pub fn trivia(&self) -> impl Iterator<Item = TriviaRef<'_>> + '_ {
        self.tokens().flat_map(|token| token.trivia())
    }

    /// Converts a byte offset to a line/column position.
    pub fn position(&self, offset: u32) -> Position {
        self.lines.position(&self.text, offset)
    }

    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position(span.start), self.position(span.end))
    }

    /// Returns the line break used by the document: the first end-of-line
    /// trivia found, or `\n` when there is none.
    pub fn line_break(&self) -> &str {
        self.trivia()
            .find(|t| t.trivia.is_end_of_line())
            .map(|t| t.trivia.text.as_str())
            .unwrap_or("\n")
    }

    /// Produces a new document with the given trivia splices applied.
    ///
    /// Tokens without splices are shared with `self`. Splices on the same
    /// trivia list must not overlap, and two insertions at the same index
    /// count as overlapping.
    pub fn splice(&self, splices: Vec<TriviaSplice>) -> Result<Document, SpliceError> {
        let mut by_token: BTreeMap<TokenId, Vec<TriviaSplice>> = BTreeMap::new();
        for splice in splices {
            if splice.token.index() >= self.tokens.len() {
                return Err(SpliceError::UnknownToken(splice.token.0));
            }
            by_token.entry(splice.token).or_default().push(splice);
        }

        let mut tokens = self.tokens.clone();
        for (id, group) in by_token {
            let original = &self.tokens[id.index()];
            if original.is_missing() {
                return Err(SpliceError::MissingToken(id.0));
            }
            let mut token = Token::clone(original);
            for slot in [TriviaSlot::Leading, TriviaSlot::Trailing] {
                let list = match slot {
                    TriviaSlot::Leading => &mut token.leading,
                    TriviaSlot::Trailing => &mut token.trailing,
                };
                let mut edits: Vec<&TriviaSplice> = group.iter().filter(|s| s.slot == slot).collect();
                edits.sort_by_key(|s| (Reverse(s.range.start), Reverse(s.range.end)));
                check_ranges(id, list.len(), &edits)?;
                for edit in edits {
                    list.splice(edit.range.clone(), edit.replacement.iter().cloned());
                }
            }
            tokens[id.index()] = Arc::new(token);
        }

        Ok(Document::from_shared(tokens)?)
    }
}

/// Validates splices sorted by descending start.
fn check_ranges(id: TokenId, len: usize, edits: &[&TriviaSplice]) -> Result<(), SpliceError> {
    for edit in edits {
        if edit.range.start > edit.range.end || edit.range.end > len {
            return Err(SpliceError::RangeOutOfBounds {
                token: id.0,
                start: edit.range.start,
                end: edit.range.end,
                len,
            });
        }
    }
    for pair in edits.windows(2) {
        let (later, earlier) = (&pair[0].range, &pair[1].range);
        if earlier.end > later.start || earlier.start == later.start {
            return Err(SpliceError::Overlapping(id.0));
        }
    }
    Ok(())
}

/// A borrowed view of one token with its absolute position.
#[derive(Debug, Clone, Copy)]
pub struct TokenRef<'a> {
    document: &'a Document,
    id: TokenId,
    token: &'a Token,
    full_start: u32,
}

impl<'a> TokenRef<'a> {
    #[inline]
    pub fn id(&self) -> TokenId {
        self.id
    }

    #[inline]
    pub fn token(&self) -> &'a Token {
        self.token
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    #[inline]
    pub fn text(&self) -> &'a str {
        &self.token.text
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.token.is_missing()
    }

    #[inline]
    pub fn is_end_of_file(&self) -> bool {
        self.token.is_end_of_file()
    }

    #[inline]
    pub fn leading(&self) -> &'a [Trivia] {
        &self.token.leading
    }

    #[inline]
    pub fn trailing(&self) -> &'a [Trivia] {
        &self.token.trailing
    }

    pub fn trivia_list(&self, slot: TriviaSlot) -> &'a [Trivia] {
        match slot {
            TriviaSlot::Leading => self.leading(),
            TriviaSlot::Trailing => self.trailing(),
        }
    }

    /// Span of the token text, trivia excluded.
    pub fn span(&self) -> Span {
        let start = self.full_start + self.token.leading_width();
        Span::new(start, start + self.token.text_width())
    }

    /// Span of the token including its leading and trailing trivia.
    pub fn full_span(&self) -> Span {
        Span::new(self.full_start, self.full_start + self.token.full_width())
    }

    pub fn location(&self) -> Location {
        self.document.location(self.span())
    }

    pub fn previous(&self) -> Option<TokenRef<'a>> {
        (self.id.0 > 0).then(|| self.document.token(TokenId(self.id.0 - 1)))
    }

    pub fn next(&self) -> Option<TokenRef<'a>> {
        self.document.get(TokenId(self.id.0 + 1))
    }

    pub fn leading_trivia(self) -> impl Iterator<Item = TriviaRef<'a>> + 'a {
        self.slot_trivia(TriviaSlot::Leading)
    }

    pub fn trailing_trivia(self) -> impl Iterator<Item = TriviaRef<'a>> + 'a {
        self.slot_trivia(TriviaSlot::Trailing)
    }

    /// Leading then trailing trivia.
    pub fn trivia(self) -> impl Iterator<Item = TriviaRef<'a>> + 'a {
        self.leading_trivia().chain(self.trailing_trivia())
    }

    fn slot_trivia(self, slot: TriviaSlot) -> impl Iterator<Item = TriviaRef<'a>> + 'a {
        let id = self.id;
        let mut offset = match slot {
            TriviaSlot::Leading => self.full_start,
            TriviaSlot::Trailing => self.span().end,
        };
        self.trivia_list(slot)
            .iter()
            .enumerate()
            .map(move |(index, trivia)| {
                let start = offset;
                offset += trivia.len();
                TriviaRef {
                    token: id,
                    slot,
                    index,
                    trivia,
                    span: Span::new(start, offset),
                }
            })
    }
}

/// Incremental construction of a [`Document`].
///
/// Leading trivia pushed before a token attaches to that token. Trailing
/// trivia attaches to the last real token. Whatever is pending at
/// [`finish`](Self::finish) becomes the leading trivia of the end-of-file
/// token.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    tokens: Vec<Token>,
    pending: Vec<Trivia>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leading(mut self, trivia: Trivia) -> Self {
        self.pending.push(trivia);
        self
    }

    pub fn token(self, kind: TokenKind, text: impl Into<String>) -> Self {
        self.push(Token::new(kind, text))
    }

    /// Pushes a complete token. Pending leading trivia is prepended to its own.
    pub fn push(mut self, mut token: Token) -> Self {
        if !self.pending.is_empty() {
            let mut leading = std::mem::take(&mut self.pending);
            leading.append(&mut token.leading);
            token.leading = leading;
        }
        self.tokens.push(token);
        self
    }

    pub fn trailing(mut self, trivia: Trivia) -> Self {
        match self.tokens.iter_mut().rev().find(|t| !t.is_missing()) {
            Some(token) if self.pending.is_empty() => token.trailing.push(trivia),
            _ => self.pending.push(trivia),
        }
        self
    }

    /// Pushes a zero-width token synthesized by error recovery.
    pub fn missing(mut self, kind: TokenKind) -> Self {
        self.tokens.push(Token::missing(kind));
        self
    }

    pub fn finish(mut self) -> Result<Document, DocumentError> {
        let eof = Token::end_of_file().with_leading(std::mem::take(&mut self.pending));
        self.tokens.push(eof);
        Document::new(self.tokens)
    }
}
