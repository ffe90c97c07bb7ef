//! Built-in rules and the contract they implement.
//!
//! A rule is either node-oriented, receiving the recognized syntax nodes of
//! the kinds it declares, or document-oriented, scanning the whole document
//! once. Rules are stateless and shared between threads.

mod final_newline;
mod max_line_length;
mod no_space_after_keyword;
mod no_space_before_argument_list;
mod no_space_in_attribute;
mod no_space_in_cast;
mod no_trailing_whitespace;
mod operator_at_line_start;
mod separate_exit_conditions;
mod space_before_parameter_list;
mod using_requires_braces;

pub use extension_method_call_in_tests::ExtensionMethodCallInTests;
pub use final_newline::FinalNewlineRule;
pub use max_line_length::MaxLineLength;
pub use no_space_after_keyword::NoSpaceAfterKeyword;
pub use no_space_before_argument_list::NoSpaceBeforeArgumentList;
pub use no_space_in_attribute::NoSpaceInAttribute;
pub use no_space_in_cast::NoSpaceInCast;
pub use no_trailing_whitespace::NoTrailingWhitespace;
pub use operator_at_line_start::OperatorAtLineStart;
pub use separate_exit_conditions::SeparateExitConditions;
pub use space_before_parameter_list::SpaceBeforeParameterList;
pub use using_requires_braces::UsingRequiresBraces;

use trivialint_ast::{Document, Span, SyntaxKind, SyntaxNode};

use crate::LinterError;
use crate::context::RuleContext;
use crate::edit::TextEdit;
use crate::violation::Violation;

/// A formatting or structural rule.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `no-trailing-whitespace`.
    fn id(&self) -> &'static str;

    /// One-line description for rule listings.
    fn description(&self) -> &'static str;

    /// Whether [`Rule::fix`] can produce edits. Analysis-only rules return
    /// `false` and never produce edits.
    fn fixable(&self) -> bool {
        false
    }

    /// Node kinds routed to [`Rule::check_node`].
    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[]
    }

    /// Checks one node of a kind listed in [`Rule::node_kinds`].
    fn check_node(&self, _node: &SyntaxNode, _ctx: &RuleContext<'_>) -> Vec<Violation> {
        Vec::new()
    }

    /// Checks the whole document. Called once per analysis.
    fn check_document(&self, _ctx: &RuleContext<'_>) -> Result<Vec<Violation>, LinterError> {
        Ok(Vec::new())
    }

    /// Computes the edit fixing a violation reported at `span`.
    ///
    /// Only the span is used: boundary tokens are re-derived from the
    /// document, so the edit stays valid after unrelated edits elsewhere.
    fn fix(&self, _document: &Document, _span: Span) -> Option<TextEdit> {
        None
    }
}

/// Every built-in rule, in catalogue order.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SpaceBeforeParameterList),
        Box::new(NoSpaceBeforeArgumentList),
        Box::new(NoSpaceAfterKeyword),
        Box::new(NoTrailingWhitespace),
        Box::new(FinalNewlineRule),
        Box::new(MaxLineLength),
        Box::new(NoSpaceInCast),
        Box::new(NoSpaceInAttribute),
        Box::new(UsingRequiresBraces),
        Box::new(SeparateExitConditions),
        Box::new(ExtensionMethodCallInTests),
        Box::new(OperatorAtLineStart),
    ]
}
