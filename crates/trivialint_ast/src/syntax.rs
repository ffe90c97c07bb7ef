//! A closed set of syntax shapes consumed by node rules.
//!
//! The tree is shallow: every node names the few tokens a rule needs, by
//! [`TokenId`] into the document it was recognized from. Trivia rewrites
//! never add or remove tokens, so a tree stays valid for every document
//! derived from the original through [`Document::splice`](crate::Document::splice).

use serde::{Deserialize, Serialize};

use crate::token::TokenId;

/// Node kind tags used to dispatch nodes to rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    ParameterList,
    Invocation,
    ObjectCreation,
    KeywordExpression,
    CastExpression,
    Attribute,
    UsingStatement,
    IfStatement,
    OperatorToken,
    MethodDeclaration,
    MemberInvocation,
}

impl SyntaxKind {
    pub const ALL: [SyntaxKind; 11] = [
        SyntaxKind::ParameterList,
        SyntaxKind::Invocation,
        SyntaxKind::ObjectCreation,
        SyntaxKind::KeywordExpression,
        SyntaxKind::CastExpression,
        SyntaxKind::Attribute,
        SyntaxKind::UsingStatement,
        SyntaxKind::IfStatement,
        SyntaxKind::OperatorToken,
        SyntaxKind::MethodDeclaration,
        SyntaxKind::MemberInvocation,
    ];
}

/// What declares a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Method,
    Constructor,
    LocalFunction,
    Delegate,
    AnonymousMethod,
}

/// Role of an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// Arithmetic, relational, equality, logical and bitwise operators.
    Binary,
    /// `is` in a type test or pattern.
    Is,
    /// `and` / `or` pattern combinators.
    Pattern,
    /// `??`
    Coalesce,
    /// `?` of `?.` / `?[`
    ConditionalAccess,
    /// `.` following a conditional access `?`
    MemberBinding,
    /// `.` of a member access
    MemberAccess,
    /// `?` of a conditional expression
    ConditionalQuestion,
    /// `:` of a conditional expression
    ConditionalColon,
}

/// Coarse classification of an embedded statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Block,
    Using,
    Other,
}

/// An inclusive run of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRange {
    pub first: TokenId,
    pub last: TokenId,
}

impl TokenRange {
    pub const fn new(first: TokenId, last: TokenId) -> Self {
        Self { first, last }
    }

    #[inline]
    pub fn contains(&self, id: TokenId) -> bool {
        self.first <= id && id <= self.last
    }
}

/// A method declaration, with what test and extension-method rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: TokenId,
    /// Attribute names as written, e.g. `Test` or `NUnit.Framework.Test`.
    pub attributes: Vec<String>,
    /// The first parameter carries the `this` modifier.
    pub is_extension: bool,
    /// Name of the innermost enclosing type declaration.
    pub container: Option<String>,
    /// Block or expression body.
    pub body: Option<TokenRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum SyntaxNode {
    /// `name (` of a declaration. `name` is the closing `>` of a type
    /// parameter list, or the `delegate` keyword of an anonymous method.
    ParameterList {
        declaration: DeclarationKind,
        name: TokenId,
        open: TokenId,
    },
    /// `callee (` where `callee` is the last token of the invoked expression.
    Invocation { callee: TokenId, open: TokenId },
    /// `new Type (`
    ObjectCreation { type_end: TokenId, open: TokenId },
    /// `typeof (`, `sizeof (`, `default (`, `checked (`, `unchecked (`,
    /// `nameof (`, `: this (`, `: base (` and target-typed `new (`.
    KeywordExpression { keyword: TokenId, open: TokenId },
    /// `(Type) operand`
    CastExpression { close: TokenId, operand: TokenId },
    /// `[Name (` inside an attribute list.
    Attribute { name_end: TokenId, open: TokenId },
    /// `using (...) statement`
    UsingStatement {
        keyword: TokenId,
        body: TokenRange,
        body_kind: StatementKind,
    },
    /// `if (...) statement [else ...]`
    IfStatement {
        /// From `if` through the end of the whole else chain.
        extent: TokenRange,
        /// The condition is a top-level `||` or `or` pattern.
        disjunction: bool,
        /// First token of the body, or of the first statement of a block body.
        body_first: TokenId,
        /// The else chain ends with a plain `else`.
        ends_with_else: bool,
    },
    OperatorToken { operator: TokenId, kind: OperatorKind },
    MethodDeclaration(MethodDeclaration),
    /// `receiver.Name(...)`
    MemberInvocation {
        receiver: TokenRange,
        name: TokenId,
        open: TokenId,
        close: TokenId,
    },
}

impl SyntaxNode {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxNode::ParameterList { .. } => SyntaxKind::ParameterList,
            SyntaxNode::Invocation { .. } => SyntaxKind::Invocation,
            SyntaxNode::ObjectCreation { .. } => SyntaxKind::ObjectCreation,
            SyntaxNode::KeywordExpression { .. } => SyntaxKind::KeywordExpression,
            SyntaxNode::CastExpression { .. } => SyntaxKind::CastExpression,
            SyntaxNode::Attribute { .. } => SyntaxKind::Attribute,
            SyntaxNode::UsingStatement { .. } => SyntaxKind::UsingStatement,
            SyntaxNode::IfStatement { .. } => SyntaxKind::IfStatement,
            SyntaxNode::OperatorToken { .. } => SyntaxKind::OperatorToken,
            SyntaxNode::MethodDeclaration(_) => SyntaxKind::MethodDeclaration,
            SyntaxNode::MemberInvocation { .. } => SyntaxKind::MemberInvocation,
        }
    }

    /// The token the node is anchored on, used for ordering.
    pub fn anchor(&self) -> TokenId {
        match self {
            SyntaxNode::ParameterList { name, .. } => *name,
            SyntaxNode::Invocation { callee, .. } => *callee,
            SyntaxNode::ObjectCreation { type_end, .. } => *type_end,
            SyntaxNode::KeywordExpression { keyword, .. } => *keyword,
            SyntaxNode::CastExpression { close, .. } => *close,
            SyntaxNode::Attribute { name_end, .. } => *name_end,
            SyntaxNode::UsingStatement { keyword, .. } => *keyword,
            SyntaxNode::IfStatement { extent, .. } => extent.first,
            SyntaxNode::OperatorToken { operator, .. } => *operator,
            SyntaxNode::MethodDeclaration(method) => method.name,
            SyntaxNode::MemberInvocation { receiver, .. } => receiver.first,
        }
    }
}

/// The recognized nodes of one document, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    /// Namespaces imported with `using` directives.
    imports: Vec<String>,
}

impl SyntaxTree {
    pub fn new(mut nodes: Vec<SyntaxNode>, imports: Vec<String>) -> Self {
        nodes.sort_by_key(SyntaxNode::anchor);
        Self { nodes, imports }
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxNode> + '_ {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn imports_namespace(&self, namespace: &str) -> bool {
        self.imports.iter().any(|import| import == namespace)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
