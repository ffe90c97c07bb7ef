//! Per-analysis context handed to rules.

use trivialint_ast::{Document, Span, SyntaxTree, TokenId, TokenRef};

use crate::LinterError;
use crate::cancel::CancellationToken;
use crate::options::AnalyzerOptions;
use crate::violation::Violation;

/// Everything a rule may read while analyzing one document.
///
/// The context is shared by all rules of one pass and is never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub syntax: &'a SyntaxTree,
    pub options: &'a AnalyzerOptions,
    cancel: &'a CancellationToken,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        document: &'a Document,
        syntax: &'a SyntaxTree,
        options: &'a AnalyzerOptions,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            document,
            syntax,
            options,
            cancel,
        }
    }

    #[inline]
    pub fn token(&self, id: TokenId) -> TokenRef<'a> {
        self.document.token(id)
    }

    pub fn cancellation(&self) -> &'a CancellationToken {
        self.cancel
    }

    /// Fails with [`LinterError::Cancelled`] once cancellation was requested.
    #[inline]
    pub fn check_cancelled(&self) -> Result<(), LinterError> {
        self.cancel.check()
    }

    /// Builds a violation with its line/column location resolved.
    pub fn violation(&self, rule_id: &str, message: impl Into<String>, span: Span) -> Violation {
        Violation::new(rule_id, message, span).with_location(self.document.location(span))
    }
}
