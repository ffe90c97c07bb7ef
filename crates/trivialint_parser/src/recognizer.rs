//! Shallow syntax recognition over a token stream.
//!
//! This is not a parser. It finds the handful of shapes the node rules care
//! about (declarations, invocations, casts, attributes, `using` and `if`
//! statements, operators) from token patterns, bracket matching and a little
//! scope tracking, and records them as [`SyntaxNode`]s.

use std::collections::{HashMap, HashSet};

use trivialint_ast::{
    DeclarationKind, Document, MethodDeclaration, OperatorKind, StatementKind, SyntaxNode,
    SyntaxTree, TokenId, TokenKind, TokenRange,
};

const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object", "sbyte",
    "short", "string", "uint", "ulong", "ushort", "void",
];

const MODIFIERS: &[&str] = &[
    "abstract", "async", "const", "extern", "file", "internal", "new", "override", "partial",
    "private", "protected", "public", "readonly", "ref", "required", "sealed", "static",
    "unsafe", "virtual", "volatile",
];

/// Contextual keywords that never name a type or a callee.
const CONTEXTUAL: &[&str] = &[
    "and", "ascending", "await", "by", "descending", "equals", "from", "group", "into", "join",
    "let", "nameof", "not", "on", "or", "orderby", "select", "var", "when", "where", "with",
    "yield",
];

/// Tokens whose `(` opens a statement header or keyword operand, never a cast.
const PAREN_HEADS: &[&str] = &[
    "catch", "checked", "default", "fixed", "for", "foreach", "if", "lock", "nameof", "sizeof",
    "switch", "typeof", "unchecked", "using", "when", "while",
];

const KEYWORD_EXPRESSIONS: &[&str] = &["checked", "default", "sizeof", "typeof", "unchecked"];

const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "<", "<=", ">=", ">", "==", "!=", "||", "&&", "|", "&", "^",
];

const ASSIGNMENTS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", "??=", "=>",
];

/// Recognizes syntax nodes in `document`.
pub fn recognize(document: &Document) -> SyntaxTree {
    Recognizer::new(document).run()
}

struct Recognizer<'d> {
    texts: Vec<&'d str>,
    kinds: Vec<TokenKind>,
    /// Partner of each bracket, brace and parenthesis.
    matching: Vec<Option<usize>>,
    /// Innermost `{` enclosing each token.
    enclosing: Vec<Option<usize>>,
    /// Token is a generic `<` or `>`.
    generic: Vec<bool>,
    generic_open_of: HashMap<usize, usize>,
    generic_close_of: HashMap<usize, usize>,
    /// Token belongs to a `using` directive or a namespace header.
    in_directive: Vec<bool>,
    type_bodies: HashMap<usize, String>,
    namespace_bodies: HashSet<usize>,
    /// `(` tokens already owned by a recognized construct.
    claimed: HashSet<usize>,
    declaration_opens: HashSet<usize>,
    declaration_names: HashSet<usize>,
    /// `]` of an attribute list -> attribute names.
    attribute_lists: HashMap<usize, Vec<String>>,
    roles: HashMap<usize, OperatorKind>,
    nodes: Vec<SyntaxNode>,
    imports: Vec<String>,
}

#[inline]
fn id(index: usize) -> TokenId {
    TokenId(index as u32)
}

impl<'d> Recognizer<'d> {
    fn new(document: &'d Document) -> Self {
        let texts: Vec<&'d str> = document.tokens().map(|t| t.text()).collect();
        let kinds: Vec<TokenKind> = document.tokens().map(|t| t.kind()).collect();
        let len = texts.len();

        let mut matching = vec![None; len];
        let mut enclosing = vec![None; len];
        let mut open: Vec<usize> = Vec::new();
        let mut braces: Vec<usize> = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            enclosing[i] = braces.last().copied();
            match *text {
                "(" | "[" | "{" => {
                    open.push(i);
                    if *text == "{" {
                        braces.push(i);
                    }
                }
                ")" | "]" | "}" => {
                    let opener = match *text {
                        ")" => "(",
                        "]" => "[",
                        _ => "{",
                    };
                    if let Some(pos) = open.iter().rposition(|&o| texts[o] == opener) {
                        let o = open[pos];
                        open.truncate(pos);
                        matching[o] = Some(i);
                        matching[i] = Some(o);
                        if *text == "}" {
                            if let Some(pos) = braces.iter().rposition(|&b| b == o) {
                                braces.truncate(pos);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            texts,
            kinds,
            matching,
            enclosing,
            generic: vec![false; len],
            generic_open_of: HashMap::new(),
            generic_close_of: HashMap::new(),
            in_directive: vec![false; len],
            type_bodies: HashMap::new(),
            namespace_bodies: HashSet::new(),
            claimed: HashSet::new(),
            declaration_opens: HashSet::new(),
            declaration_names: HashSet::new(),
            attribute_lists: HashMap::new(),
            roles: HashMap::new(),
            nodes: Vec::new(),
            imports: Vec::new(),
        }
    }

    fn run(mut self) -> SyntaxTree {
        self.find_generics();
        self.find_type_declarations();
        self.find_directives();
        self.find_attribute_lists(false);
        self.find_declarations();
        self.find_attribute_lists(true);
        self.find_keyword_expressions();
        self.find_object_creations();
        self.find_invocations();
        self.find_casts();
        self.find_operators();
        self.find_using_statements();
        self.find_if_statements();
        SyntaxTree::new(self.nodes, self.imports)
    }

    // ---- token predicates ----

    /// Index of the end-of-file token.
    #[inline]
    fn eof(&self) -> usize {
        self.texts.len() - 1
    }

    /// Index of the last token before end-of-file.
    #[inline]
    fn last_real(&self) -> usize {
        self.eof().saturating_sub(1)
    }

    #[inline]
    fn text(&self, i: usize) -> &'d str {
        self.texts.get(i).copied().unwrap_or("")
    }

    #[inline]
    fn kind(&self, i: usize) -> TokenKind {
        self.kinds.get(i).copied().unwrap_or(TokenKind::EndOfFile)
    }

    #[inline]
    fn partner(&self, i: usize) -> Option<usize> {
        self.matching.get(i).copied().flatten()
    }

    fn is_keyword(&self, i: usize, text: &str) -> bool {
        self.kind(i) == TokenKind::Keyword && self.text(i) == text
    }

    /// An identifier that can name a type, member or local.
    fn is_name(&self, i: usize) -> bool {
        self.kind(i) == TokenKind::Identifier && !CONTEXTUAL.contains(&self.text(i))
    }

    fn is_predefined(&self, i: usize) -> bool {
        self.kind(i) == TokenKind::Keyword && PREDEFINED_TYPES.contains(&self.text(i))
    }

    fn is_modifier(&self, i: usize) -> bool {
        MODIFIERS.contains(&self.text(i))
    }

    fn is_literal(&self, i: usize) -> bool {
        matches!(
            self.kind(i),
            TokenKind::NumericLiteral | TokenKind::StringLiteral | TokenKind::CharacterLiteral
        ) || (self.kind(i) == TokenKind::Keyword
            && matches!(self.text(i), "true" | "false" | "null"))
    }

    fn is_generic_close(&self, i: usize) -> bool {
        self.text(i) == ">" && self.generic[i]
    }

    /// The token can end an operand of a binary operator.
    fn is_operand_end(&self, i: usize) -> bool {
        self.is_name(i)
            || self.is_literal(i)
            || (self.kind(i) == TokenKind::Identifier && self.text(i) == "value")
            || (self.kind(i) == TokenKind::Keyword && matches!(self.text(i), "this" | "base"))
            || matches!(self.text(i), ")" | "]" | "++" | "--")
    }

    /// The token can start a primary expression in a member-access chain.
    fn is_primary(&self, i: usize) -> bool {
        self.kind(i) == TokenKind::Identifier
            || self.is_literal(i)
            || self.is_predefined(i)
            || (self.kind(i) == TokenKind::Keyword && matches!(self.text(i), "this" | "base"))
    }

    /// The token can precede `(` or `[` as the target of a call or index.
    fn is_postfix_target(&self, i: usize) -> bool {
        self.kind(i) == TokenKind::Identifier
            || self.is_generic_close(i)
            || matches!(self.text(i), ")" | "]")
            || (self.kind(i) == TokenKind::Keyword && matches!(self.text(i), "this" | "base"))
    }

    fn in_type_body(&self, i: usize) -> bool {
        self.enclosing[i].is_some_and(|b| self.type_bodies.contains_key(&b))
    }

    fn in_namespace_scope(&self, i: usize) -> bool {
        self.enclosing[i].is_none_or(|b| self.namespace_bodies.contains(&b))
    }

    fn container_of(&self, i: usize) -> Option<String> {
        let mut current = self.enclosing[i];
        while let Some(brace) = current {
            if let Some(name) = self.type_bodies.get(&brace) {
                return Some(name.clone());
            }
            current = self.enclosing[brace];
        }
        None
    }

    fn joined(&self, first: usize, last: usize) -> String {
        (first..=last).map(|k| self.text(k)).collect()
    }

    // ---- generic argument lists ----

    fn find_generics(&mut self) {
        for i in 1..self.eof() {
            if self.text(i) != "<" || self.kind(i - 1) != TokenKind::Identifier {
                continue;
            }
            let Some(close) = self.match_angle(i) else {
                continue;
            };
            if !self.follows_generic(close + 1) {
                continue;
            }
            self.generic[i] = true;
            self.generic[close] = true;
            self.generic_open_of.insert(close, i);
            self.generic_close_of.insert(i, close);
        }
    }

    fn match_angle(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let limit = (open + 128).min(self.eof());
        for j in open..limit {
            match self.text(j) {
                "<" => depth += 1,
                ">" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(j);
                    }
                }
                "," | "." | "::" | "?" | "[" | "]" | "(" | ")" | "*" => {}
                _ if self.kind(j) == TokenKind::Identifier || self.is_predefined(j) => {}
                "in" | "out" => {}
                _ => return None,
            }
        }
        None
    }

    fn follows_generic(&self, i: usize) -> bool {
        matches!(
            self.text(i),
            "(" | ")" | "]" | "}" | ":" | ";" | "," | "." | "?" | "==" | "!=" | "{" | "=>" | "["
                | ">" | ""
        ) || self.kind(i) == TokenKind::Identifier
    }

    // ---- scopes and directives ----

    fn find_type_declarations(&mut self) {
        for i in 0..self.eof() {
            let name = match self.text(i) {
                "class" | "struct" | "interface" | "enum" if self.kind(i) == TokenKind::Keyword => {
                    i + 1
                }
                "record" if self.kind(i) == TokenKind::Identifier => {
                    let n = if matches!(self.text(i + 1), "class" | "struct") {
                        i + 2
                    } else {
                        i + 1
                    };
                    if !matches!(self.text(n + 1), "(" | "{" | ":" | "<" | ";") {
                        continue;
                    }
                    n
                }
                "namespace" if self.kind(i) == TokenKind::Keyword => {
                    let (end, body) = self.header_end(i + 1);
                    for k in i..end {
                        self.in_directive[k] = true;
                    }
                    if let Some(brace) = body {
                        self.namespace_bodies.insert(brace);
                    }
                    continue;
                }
                _ => continue,
            };
            if !self.is_name(name) {
                continue;
            }
            if let (_, Some(brace)) = self.header_end(name + 1) {
                let type_name = self.text(name).to_string();
                self.type_bodies.insert(brace, type_name);
            }
        }
    }

    /// Scans a declaration header to its `{` or `;`. Returns the stopping
    /// index and the body brace, if any.
    fn header_end(&self, mut j: usize) -> (usize, Option<usize>) {
        while j < self.eof() {
            match self.text(j) {
                "{" => return (j, Some(j)),
                ";" | "}" => return (j, None),
                "(" | "[" => match self.partner(j) {
                    Some(close) => j = close + 1,
                    None => return (j, None),
                },
                _ => j += 1,
            }
        }
        (j, None)
    }

    fn find_directives(&mut self) {
        for i in 0..self.eof() {
            if !self.is_keyword(i, "using")
                || self.text(i + 1) == "("
                || !self.in_namespace_scope(i)
                || self.text(i.wrapping_sub(1)) == "await"
            {
                continue;
            }
            let mut end = i + 1;
            while end < self.eof() && !matches!(self.text(end), ";" | "{" | "}") {
                end += 1;
            }
            if self.text(end) != ";" {
                continue;
            }
            for k in i..=end {
                self.in_directive[k] = true;
            }
            let mut first = i + 1;
            if self.is_keyword(first, "static") {
                first += 1;
            }
            if (first..end).any(|k| self.text(k) == "=") || first >= end {
                continue;
            }
            let import = self.joined(first, end - 1);
            self.imports.push(import);
        }
    }

    // ---- attributes ----

    fn find_attribute_lists(&mut self, in_parameters: bool) {
        for i in 0..self.eof() {
            if self.text(i) != "[" {
                continue;
            }
            if self.partner(i).is_some_and(|close| self.attribute_lists.contains_key(&close)) {
                continue;
            }
            let prev = i.checked_sub(1).map(|p| self.text(p));
            let context = if in_parameters {
                matches!(prev, Some("(" | ","))
                    && self
                        .enclosing_paren(i)
                        .is_some_and(|p| self.declaration_opens.contains(&p))
            } else {
                matches!(prev, None | Some(";" | "{" | "}" | "]"))
            };
            if !context {
                continue;
            }
            let Some((close, names, arguments)) = self.parse_attribute_list(i) else {
                continue;
            };
            for (name_end, open) in arguments {
                self.claimed.insert(open);
                self.nodes.push(SyntaxNode::Attribute {
                    name_end: id(name_end),
                    open: id(open),
                });
            }
            self.attribute_lists.insert(close, names);
        }
    }

    /// Parses `[target: A(...), B.C, D<T>(...)]`.
    fn parse_attribute_list(&self, open: usize) -> Option<(usize, Vec<String>, Vec<(usize, usize)>)> {
        let close = self.partner(open)?;
        let mut j = open + 1;
        if matches!(self.kind(j), TokenKind::Identifier | TokenKind::Keyword) && self.text(j + 1) == ":" {
            j += 2;
        }
        let mut names = Vec::new();
        let mut arguments = Vec::new();
        loop {
            if self.kind(j) != TokenKind::Identifier {
                return None;
            }
            let start = j;
            while matches!(self.text(j + 1), "." | "::") && self.kind(j + 2) == TokenKind::Identifier {
                j += 2;
            }
            if let Some(&angle_close) = self.generic_close_of.get(&(j + 1)) {
                j = angle_close;
            }
            names.push(self.joined(start, j));
            j += 1;
            if self.text(j) == "(" {
                let paren_close = self.partner(j)?;
                arguments.push((j - 1, j));
                j = paren_close + 1;
            }
            match self.text(j) {
                "," => j += 1,
                "]" if j == close => return Some((close, names, arguments)),
                _ => return None,
            }
        }
    }

    fn enclosing_paren(&self, i: usize) -> Option<usize> {
        let mut j = i;
        while j > 0 {
            j -= 1;
            match self.text(j) {
                ")" | "]" | "}" => {
                    if let Some(o) = self.partner(j) {
                        j = o;
                    }
                }
                "(" => return Some(j),
                "{" | ";" => return None,
                _ => {}
            }
        }
        None
    }

    // ---- declarations ----

    fn find_declarations(&mut self) {
        for i in 1..self.eof() {
            if self.text(i) != "(" || self.claimed.contains(&i) {
                continue;
            }
            let p = i - 1;
            if self.is_keyword(p, "delegate") {
                self.push_parameter_list(DeclarationKind::AnonymousMethod, p, i);
                continue;
            }
            let name = if self.is_generic_close(p) {
                match self.generic_open_of[&p].checked_sub(1) {
                    Some(n) if self.is_name(n) => n,
                    _ => continue,
                }
            } else if self.is_name(p) {
                p
            } else {
                continue;
            };
            let Some(close) = self.partner(i) else {
                continue;
            };
            let after = self.text(close + 1);
            let before = name.checked_sub(1);
            let member = self.in_type_body(name);

            let constructor = member
                && p == name
                && self.container_of(name).as_deref() == Some(self.text(name))
                && before.is_none_or(|b| {
                    self.is_modifier(b) || matches!(self.text(b), "{" | "}" | ";" | "]")
                })
                && matches!(after, "{" | ":" | "=>" | ";");
            if constructor {
                self.declaration_names.insert(name);
                self.push_parameter_list(DeclarationKind::Constructor, p, i);
                continue;
            }

            let Some(before) = before else {
                continue;
            };
            if !self.is_type_end(before) || !matches!(after, "{" | "=>" | ";" | "where") {
                continue;
            }
            let Some(type_start) = self.type_start(before) else {
                continue;
            };
            self.declaration_names.insert(name);
            let kind = if type_start > 0 && self.is_keyword(type_start - 1, "delegate") {
                DeclarationKind::Delegate
            } else if member {
                DeclarationKind::Method
            } else {
                DeclarationKind::LocalFunction
            };
            self.push_parameter_list(kind, p, i);
            if kind == DeclarationKind::Method {
                let method = MethodDeclaration {
                    name: id(name),
                    attributes: self.attributes_before(type_start),
                    is_extension: self.first_parameter_is_this(i),
                    container: self.container_of(name),
                    body: self.method_body(close + 1),
                };
                self.nodes.push(SyntaxNode::MethodDeclaration(method));
            }
        }
    }

    fn push_parameter_list(&mut self, declaration: DeclarationKind, name: usize, open: usize) {
        self.claimed.insert(open);
        self.declaration_opens.insert(open);
        self.nodes.push(SyntaxNode::ParameterList {
            declaration,
            name: id(name),
            open: id(open),
        });
    }

    /// The token can end a type in declaration position.
    fn is_type_end(&self, i: usize) -> bool {
        if self.is_name(i) || self.is_predefined(i) || self.is_generic_close(i) {
            return true;
        }
        match self.text(i) {
            "]" => self.is_rank_specifier(i),
            "?" | "*" => i > 0 && self.is_type_end(i - 1),
            _ => false,
        }
    }

    /// `[]` or `[,]`
    fn is_rank_specifier(&self, close: usize) -> bool {
        self.partner(close)
            .is_some_and(|o| o < close && (o + 1..close).all(|k| self.text(k) == ","))
    }

    /// First token of the type ending at `end`.
    fn type_start(&self, end: usize) -> Option<usize> {
        let mut j = end;
        loop {
            match self.text(j) {
                "?" | "*" => {
                    j = j.checked_sub(1)?;
                    continue;
                }
                "]" if self.is_rank_specifier(j) => {
                    j = self.partner(j)?.checked_sub(1)?;
                    continue;
                }
                _ => {}
            }
            if self.is_generic_close(j) {
                j = self.generic_open_of[&j].checked_sub(1)?;
            }
            if !(self.kind(j) == TokenKind::Identifier || self.is_predefined(j)) {
                return None;
            }
            if j >= 2 && matches!(self.text(j - 1), "." | "::") {
                j -= 2;
                continue;
            }
            return Some(j);
        }
    }

    /// Attribute names from the lists in front of a member's modifiers.
    fn attributes_before(&self, type_start: usize) -> Vec<String> {
        let mut names = Vec::new();
        let mut k = type_start.checked_sub(1);
        while let Some(j) = k {
            if self.is_modifier(j) {
                k = j.checked_sub(1);
            } else if let Some(list) = self.attribute_lists.get(&j) {
                names.extend(list.iter().rev().cloned());
                k = self.partner(j).and_then(|o| o.checked_sub(1));
            } else {
                break;
            }
        }
        names.reverse();
        names
    }

    fn first_parameter_is_this(&self, open: usize) -> bool {
        let mut j = open + 1;
        while self.text(j) == "[" {
            match self.partner(j) {
                Some(close) => j = close + 1,
                None => return false,
            }
        }
        self.is_keyword(j, "this")
    }

    fn method_body(&self, mut j: usize) -> Option<TokenRange> {
        while j < self.eof() {
            match self.text(j) {
                "{" => return Some(TokenRange::new(id(j), id(self.partner(j)?))),
                "=>" => {
                    let end = self.expression_end(j + 1);
                    return Some(TokenRange::new(id(j), id(end)));
                }
                ";" | "}" => return None,
                "(" | "[" => j = self.partner(j)? + 1,
                _ => j += 1,
            }
        }
        None
    }

    // ---- expressions ----

    fn find_keyword_expressions(&mut self) {
        for i in 0..self.eof() {
            let open = i + 1;
            if self.text(open) != "(" || self.claimed.contains(&open) {
                continue;
            }
            let text = self.text(i);
            let keyword = match self.kind(i) {
                TokenKind::Keyword => {
                    KEYWORD_EXPRESSIONS.contains(&text)
                        || (matches!(text, "this" | "base") && i > 0 && self.text(i - 1) == ":")
                        || (text == "new" && !self.is_new_constraint(i))
                }
                TokenKind::Identifier => text == "nameof",
                _ => false,
            };
            if keyword {
                self.claimed.insert(open);
                self.nodes.push(SyntaxNode::KeywordExpression {
                    keyword: id(i),
                    open: id(open),
                });
            }
        }
    }

    /// `where T : new()`
    fn is_new_constraint(&self, new: usize) -> bool {
        if self.text(new + 2) != ")" {
            return false;
        }
        let mut j = new;
        while j > 0 {
            j -= 1;
            match self.text(j) {
                "where" if self.kind(j) == TokenKind::Identifier => return true,
                ";" | "{" | "}" | "=" | "=>" | "(" | "return" => return false,
                _ => {}
            }
        }
        false
    }

    fn find_object_creations(&mut self) {
        for i in 0..self.eof() {
            if !self.is_keyword(i, "new") || matches!(self.text(i + 1), "(" | "[" | "{") {
                continue;
            }
            let Some(end) = self.type_end_forward(i + 1) else {
                continue;
            };
            let open = end + 1;
            if self.text(open) == "(" && !self.claimed.contains(&open) {
                self.claimed.insert(open);
                self.nodes.push(SyntaxNode::ObjectCreation {
                    type_end: id(end),
                    open: id(open),
                });
            }
        }
    }

    /// Last token of a (possibly qualified, generic or nullable) type name
    /// starting at `start`.
    fn type_end_forward(&self, start: usize) -> Option<usize> {
        let mut j = start;
        if self.text(j) == "global" && self.text(j + 1) == "::" {
            j += 2;
        }
        if !(self.kind(j) == TokenKind::Identifier || self.is_predefined(j)) {
            return None;
        }
        loop {
            if let Some(&close) = self.generic_close_of.get(&(j + 1)) {
                j = close;
            }
            if matches!(self.text(j + 1), "." | "::") && self.kind(j + 2) == TokenKind::Identifier {
                j += 2;
                continue;
            }
            break;
        }
        while self.text(j + 1) == "?" {
            j += 1;
        }
        Some(j)
    }

    fn find_invocations(&mut self) {
        for i in 1..self.eof() {
            if self.text(i) != "(" || self.claimed.contains(&i) {
                continue;
            }
            let p = i - 1;
            let head = if self.is_generic_close(p) {
                match self.generic_open_of[&p].checked_sub(1) {
                    Some(n) if self.is_name(n) => n,
                    _ => continue,
                }
            } else if self.is_name(p) {
                p
            } else {
                continue;
            };
            if self.declaration_names.contains(&head) {
                continue;
            }
            if head > 0
                && matches!(
                    self.text(head - 1),
                    "class" | "struct" | "record" | "interface" | "operator" | "enum"
                )
            {
                continue;
            }

            self.claimed.insert(i);
            self.nodes.push(SyntaxNode::Invocation {
                callee: id(p),
                open: id(i),
            });

            if head >= 2 && self.text(head - 1) == "." {
                if let Some(first) = self.receiver_start(head - 1) {
                    let close = self.partner(i).unwrap_or(i);
                    self.nodes.push(SyntaxNode::MemberInvocation {
                        receiver: TokenRange::new(id(first), id(head - 2)),
                        name: id(head),
                        open: id(i),
                        close: id(close),
                    });
                }
            }
        }
    }

    /// First token of the receiver expression of the member access at `dot`.
    fn receiver_start(&self, dot: usize) -> Option<usize> {
        let mut j = dot.checked_sub(1)?;
        loop {
            if self.text(j) == "?" {
                j = j.checked_sub(1)?;
                continue;
            }
            let first = if matches!(self.text(j), ")" | "]") {
                let o = self.partner(j)?;
                if o > 0 && self.is_postfix_target(o - 1) {
                    j = o - 1;
                    continue;
                }
                o
            } else if self.is_generic_close(j) {
                j = self.generic_open_of[&j].checked_sub(1)?;
                continue;
            } else if self.is_primary(j) {
                j
            } else {
                return None;
            };
            let first = if first > 0 && self.is_keyword(first - 1, "new") {
                first - 1
            } else {
                first
            };
            if first >= 2 && self.text(first - 1) == "." {
                j = first - 2;
                continue;
            }
            return Some(first);
        }
    }

    fn find_casts(&mut self) {
        for i in 0..self.eof() {
            if self.text(i) != "(" || self.claimed.contains(&i) {
                continue;
            }
            if let Some(p) = i.checked_sub(1) {
                if self.is_name(p)
                    || matches!(self.text(p), ")" | "]")
                    || self.is_generic_close(p)
                    || PAREN_HEADS.contains(&self.text(p))
                {
                    continue;
                }
            }
            let Some(close) = self.partner(i) else {
                continue;
            };
            let Some(end) = self.cast_type_end(i + 1) else {
                continue;
            };
            if end + 1 != close {
                continue;
            }
            let predefined = end == i + 1 && self.is_predefined(end);
            if self.starts_cast_operand(close + 1, predefined) {
                self.nodes.push(SyntaxNode::CastExpression {
                    close: id(close),
                    operand: id(close + 1),
                });
            }
        }
    }

    fn cast_type_end(&self, start: usize) -> Option<usize> {
        let mut end = self.type_end_forward(start)?;
        loop {
            match self.text(end + 1) {
                "*" | "?" => end += 1,
                "[" => match self.partner(end + 1) {
                    Some(close) if self.is_rank_specifier(close) => end = close,
                    _ => return Some(end),
                },
                _ => return Some(end),
            }
        }
    }

    fn starts_cast_operand(&self, o: usize, predefined: bool) -> bool {
        match self.kind(o) {
            TokenKind::Identifier => !matches!(self.text(o), "and" | "or" | "not" | "when" | "with"),
            TokenKind::NumericLiteral | TokenKind::StringLiteral | TokenKind::CharacterLiteral => {
                true
            }
            TokenKind::Keyword => matches!(
                self.text(o),
                "this"
                    | "base"
                    | "new"
                    | "typeof"
                    | "sizeof"
                    | "default"
                    | "checked"
                    | "unchecked"
                    | "true"
                    | "false"
                    | "null"
                    | "stackalloc"
                    | "delegate"
            ) || (predefined && self.is_predefined(o)),
            TokenKind::Punctuation => {
                matches!(self.text(o), "(" | "!" | "~")
                    || (predefined && matches!(self.text(o), "-" | "+" | "++" | "--" | "&" | "*"))
            }
            TokenKind::EndOfFile => false,
        }
    }

    // ---- operators ----

    fn find_operators(&mut self) {
        let mut depth = 0usize;
        let mut ternaries: Vec<usize> = Vec::new();
        let mut pattern_depth: Option<usize> = None;

        for i in 0..self.eof() {
            let text = self.text(i);
            match text {
                "(" | "[" | "{" => {
                    depth += 1;
                    continue;
                }
                ")" | "]" | "}" => {
                    ternaries.retain(|&d| d < depth);
                    if pattern_depth.is_some_and(|d| d >= depth) {
                        pattern_depth = None;
                    }
                    depth = depth.saturating_sub(1);
                    continue;
                }
                ";" => {
                    ternaries.retain(|&d| d < depth);
                    pattern_depth = None;
                    continue;
                }
                _ => {}
            }
            if matches!(text, "," | "=>" | "&&" | "||" | ":") && pattern_depth.is_some_and(|d| d >= depth) {
                pattern_depth = None;
            }

            let kind = match text {
                "?" => {
                    if matches!(self.text(i + 1), "." | "[") && i > 0 && self.is_operand_end(i - 1) {
                        Some(OperatorKind::ConditionalAccess)
                    } else if self.is_nullable_marker(i) {
                        None
                    } else {
                        ternaries.push(depth);
                        Some(OperatorKind::ConditionalQuestion)
                    }
                }
                ":" if ternaries.last() == Some(&depth) => {
                    ternaries.pop();
                    Some(OperatorKind::ConditionalColon)
                }
                "." => self.member_dot_role(i),
                "??" => Some(OperatorKind::Coalesce),
                "is" if self.kind(i) == TokenKind::Keyword => {
                    pattern_depth = Some(depth);
                    Some(OperatorKind::Is)
                }
                "case" if self.kind(i) == TokenKind::Keyword => {
                    pattern_depth = Some(depth);
                    None
                }
                "and" | "or"
                    if self.kind(i) == TokenKind::Identifier
                        && pattern_depth.is_some_and(|d| d <= depth)
                        && i > 0
                        && (self.is_operand_end(i - 1) || self.is_predefined(i - 1)) =>
                {
                    Some(OperatorKind::Pattern)
                }
                _ if BINARY_OPERATORS.contains(&text)
                    && !self.generic[i]
                    && i > 0
                    && self.is_operand_end(i - 1) =>
                {
                    Some(OperatorKind::Binary)
                }
                _ => None,
            };

            if let Some(kind) = kind {
                self.roles.insert(i, kind);
                self.nodes.push(SyntaxNode::OperatorToken {
                    operator: id(i),
                    kind,
                });
            }
        }
    }

    fn member_dot_role(&self, i: usize) -> Option<OperatorKind> {
        let prev = i.checked_sub(1)?;
        if self.roles.get(&prev) == Some(&OperatorKind::ConditionalAccess) {
            return Some(OperatorKind::MemberBinding);
        }
        if self.in_directive[i] {
            return None;
        }
        let receiver = self.is_operand_end(prev)
            || self.is_predefined(prev)
            || self.is_generic_close(prev)
            || self.kind(prev) == TokenKind::Identifier
            || self.text(prev) == "!";
        receiver.then_some(OperatorKind::MemberAccess)
    }

    /// `int?`, `Foo?`, `List<T>?` in type position.
    fn is_nullable_marker(&self, i: usize) -> bool {
        let Some(prev) = i.checked_sub(1) else {
            return false;
        };
        if self.is_predefined(prev) || self.is_generic_close(prev) {
            return true;
        }
        if self.kind(prev) != TokenKind::Identifier {
            return false;
        }
        let next = self.text(i + 1);
        matches!(next, ")" | ">" | "," | "]" | ";" | "=" | "")
            || (self.kind(i + 1) == TokenKind::Identifier
                && (matches!(self.text(i + 2), "=" | ";" | "," | ")" | "=>" | "{" | "in")
                    || self.declaration_names.contains(&(i + 1))))
    }

    // ---- statements ----

    fn find_using_statements(&mut self) {
        for i in 0..self.eof() {
            if !self.is_keyword(i, "using") || self.text(i + 1) != "(" {
                continue;
            }
            let Some(close) = self.partner(i + 1) else {
                continue;
            };
            let body = close + 1;
            if body >= self.eof() {
                continue;
            }
            let body_kind = match self.text(body) {
                "{" => StatementKind::Block,
                "using" => StatementKind::Using,
                _ => StatementKind::Other,
            };
            let end = self.statement_end(body);
            self.nodes.push(SyntaxNode::UsingStatement {
                keyword: id(i),
                body: TokenRange::new(id(body), id(end)),
                body_kind,
            });
        }
    }

    fn find_if_statements(&mut self) {
        for i in 0..self.eof() {
            if !self.is_keyword(i, "if") || self.text(i + 1) != "(" {
                continue;
            }
            let Some(close) = self.partner(i + 1) else {
                continue;
            };
            let body = close + 1;
            if body >= self.eof() {
                continue;
            }
            let body_first = if self.text(body) == "{" { body + 1 } else { body };

            let mut end = self.statement_end(body);
            let mut ends_with_else = false;
            while self.is_keyword(end + 1, "else") {
                let branch = end + 2;
                if self.is_keyword(branch, "if") && self.text(branch + 1) == "(" {
                    match self.partner(branch + 1) {
                        Some(c) => end = self.statement_end(c + 1),
                        None => break,
                    }
                } else {
                    ends_with_else = true;
                    end = self.statement_end(branch);
                    break;
                }
            }

            let disjunction = self.is_disjunction(i + 1, close);
            self.nodes.push(SyntaxNode::IfStatement {
                extent: TokenRange::new(id(i), id(end)),
                disjunction,
                body_first: id(body_first),
                ends_with_else,
            });
        }
    }

    /// The condition between `open` and `close` is, after removing enclosing
    /// parentheses, a `||` expression or an `or` pattern.
    fn is_disjunction(&self, open: usize, close: usize) -> bool {
        let (mut a, mut b) = (open + 1, close);
        while a < b && self.text(a) == "(" && self.partner(a) == Some(b - 1) {
            a += 1;
            b -= 1;
        }

        let mut depth = 0usize;
        let (mut or, mut and, mut pattern_or, mut blocked) = (false, false, false, false);
        for k in a..b {
            match self.text(k) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ if depth > 0 => {}
                "||" => or = true,
                "&&" => and = true,
                "??" => blocked = true,
                t if ASSIGNMENTS.contains(&t) => blocked = true,
                _ => match self.roles.get(&k) {
                    Some(OperatorKind::ConditionalQuestion) => blocked = true,
                    Some(OperatorKind::Pattern) if self.text(k) == "or" => pattern_or = true,
                    _ => {}
                },
            }
        }
        !blocked && (or || (pattern_or && !and))
    }

    /// Index of the last token of the statement starting at `s`.
    fn statement_end(&self, s: usize) -> usize {
        self.try_statement_end(s).unwrap_or_else(|| self.last_real())
    }

    fn try_statement_end(&self, s: usize) -> Option<usize> {
        if s >= self.eof() {
            return Some(self.last_real());
        }
        let keyword = self.kind(s) == TokenKind::Keyword;
        match self.text(s) {
            "{" => self.partner(s),
            "if" if keyword => {
                let mut s = s;
                loop {
                    if self.text(s + 1) != "(" {
                        return None;
                    }
                    let end = self.statement_end(self.partner(s + 1)? + 1);
                    if !self.is_keyword(end + 1, "else") {
                        return Some(end);
                    }
                    if self.is_keyword(end + 2, "if") {
                        s = end + 2;
                        continue;
                    }
                    return Some(self.statement_end(end + 2));
                }
            }
            "for" | "foreach" | "while" | "using" | "lock" | "fixed"
                if keyword && self.text(s + 1) == "(" =>
            {
                Some(self.statement_end(self.partner(s + 1)? + 1))
            }
            "do" if keyword => {
                let body_end = self.statement_end(s + 1);
                if self.is_keyword(body_end + 1, "while") {
                    let close = self.partner(body_end + 2)?;
                    return Some(if self.text(close + 1) == ";" { close + 1 } else { close });
                }
                Some(body_end)
            }
            "try" if keyword => {
                let mut end = self.partner(s + 1)?;
                loop {
                    match self.text(end + 1) {
                        "catch" => {
                            let mut j = end + 2;
                            if self.text(j) == "(" {
                                j = self.partner(j)? + 1;
                            }
                            if self.text(j) == "when" && self.text(j + 1) == "(" {
                                j = self.partner(j + 1)? + 1;
                            }
                            if self.text(j) != "{" {
                                return Some(end);
                            }
                            end = self.partner(j)?;
                        }
                        "finally" if self.text(end + 2) == "{" => {
                            return self.partner(end + 2);
                        }
                        _ => return Some(end),
                    }
                }
            }
            "switch" if keyword && self.text(s + 1) == "(" => {
                let close = self.partner(s + 1)?;
                if self.text(close + 1) == "{" {
                    self.partner(close + 1)
                } else {
                    Some(close)
                }
            }
            "checked" | "unchecked" | "unsafe" if keyword && self.text(s + 1) == "{" => {
                self.partner(s + 1)
            }
            _ => Some(self.expression_end(s)),
        }
    }

    /// Index of the `;` ending the expression statement starting at `s`, or
    /// of the last token before an unbalanced `}`.
    fn expression_end(&self, s: usize) -> usize {
        let mut j = s;
        while j < self.eof() {
            match self.text(j) {
                ";" => return j,
                "(" | "[" | "{" => match self.partner(j) {
                    Some(close) => j = close + 1,
                    None => return self.last_real(),
                },
                ")" | "]" | "}" => return if j > s { j - 1 } else { s },
                _ => j += 1,
            }
        }
        self.last_real()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;
    use trivialint_ast::SyntaxKind;

    fn parse(source: &str) -> (Document, SyntaxTree) {
        let doc = tokenize(source).unwrap();
        let tree = recognize(&doc);
        (doc, tree)
    }

    /// Renders `(left text, right text)` for the nodes of one kind.
    fn pairs(source: &str, kind: SyntaxKind) -> Vec<(String, String)> {
        let (doc, tree) = parse(source);
        let text = |t: TokenId| doc.token(t).text().to_string();
        tree.of_kind(kind)
            .map(|node| match node {
                SyntaxNode::ParameterList { name, open, .. } => (text(*name), text(*open)),
                SyntaxNode::Invocation { callee, open } => (text(*callee), text(*open)),
                SyntaxNode::ObjectCreation { type_end, open } => (text(*type_end), text(*open)),
                SyntaxNode::KeywordExpression { keyword, open } => (text(*keyword), text(*open)),
                SyntaxNode::CastExpression { close, operand } => (text(*close), text(*operand)),
                SyntaxNode::Attribute { name_end, open } => (text(*name_end), text(*open)),
                SyntaxNode::OperatorToken { operator, .. } => (text(*operator), String::new()),
                other => panic!("unexpected node {other:?}"),
            })
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_method_and_constructor_parameter_lists() {
        let source = "class C {\n  public C () {}\n  void f(){}\n  List<int> g<T> (T x) => x;\n  int h();\n}";
        let (doc, tree) = parse(source);
        let decls: Vec<(DeclarationKind, String)> = tree
            .of_kind(SyntaxKind::ParameterList)
            .map(|n| match n {
                SyntaxNode::ParameterList { declaration, name, .. } => {
                    (*declaration, doc.token(*name).text().to_string())
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            decls,
            vec![
                (DeclarationKind::Constructor, "C".to_string()),
                (DeclarationKind::Method, "f".to_string()),
                (DeclarationKind::Method, ">".to_string()),
                (DeclarationKind::Method, "h".to_string()),
            ]
        );
        assert_eq!(tree.of_kind(SyntaxKind::Invocation).count(), 0);
    }

    #[test]
    fn test_local_function_delegate_and_anonymous_method() {
        let source = "delegate void D (int x);\nclass C { void M () { int Add(int a) => a; var d = delegate(int y) { }; } }";
        let (_, tree) = parse(source);
        let kinds: Vec<DeclarationKind> = tree
            .of_kind(SyntaxKind::ParameterList)
            .map(|n| match n {
                SyntaxNode::ParameterList { declaration, .. } => *declaration,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                DeclarationKind::Delegate,
                DeclarationKind::Method,
                DeclarationKind::LocalFunction,
                DeclarationKind::AnonymousMethod,
            ]
        );
    }

    #[test]
    fn test_invocations_and_object_creation() {
        let source = "void M() { Foo (1); a.Bar<int>(2); var x = new List<int> (); await Baz(); }";
        assert_eq!(
            pairs(source, SyntaxKind::Invocation),
            vec![pair("Foo", "("), pair(">", "("), pair("Baz", "(")]
        );
        assert_eq!(pairs(source, SyntaxKind::ObjectCreation), vec![pair(">", "(")]);
    }

    #[test]
    fn test_keyword_expressions() {
        let source = "class C : B { C() : base (1) {} void M() { var t = typeof (C); var n = nameof(t); C c = new (); } void G<T>() where T : new() {} }";
        assert_eq!(
            pairs(source, SyntaxKind::KeywordExpression),
            vec![
                pair("base", "("),
                pair("typeof", "("),
                pair("nameof", "("),
                pair("new", "("),
            ]
        );
    }

    #[test]
    fn test_casts() {
        let source = "void M() { var a = (int) x; var b = (Foo)-y; var c = (int)-y; if (a) b(); var d = (a) + b; }";
        assert_eq!(
            pairs(source, SyntaxKind::CastExpression),
            vec![pair(")", "x"), pair(")", "-")]
        );
    }

    #[test]
    fn test_attributes() {
        let source = "[Test, Category (\"x\")]\n[assembly: Foo.Bar(1)]\nclass C { [Obsolete] void M([NotNull (1)] int x) {} }";
        assert_eq!(
            pairs(source, SyntaxKind::Attribute),
            vec![pair("Category", "("), pair("Bar", "("), pair("NotNull", "(")]
        );
    }

    #[test]
    fn test_method_declaration_details() {
        let source = "using NUnit.Framework;\nstatic class Ext { public static int Twice(this int x) => x * 2; }\nclass T { [Test] public void Check() { 2.Twice(); } }";
        let (doc, tree) = parse(source);
        assert_eq!(tree.imports(), ["NUnit.Framework".to_string()]);
        let methods: Vec<&MethodDeclaration> = tree
            .of_kind(SyntaxKind::MethodDeclaration)
            .map(|n| match n {
                SyntaxNode::MethodDeclaration(m) => m,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(methods.len(), 2);
        assert!(methods[0].is_extension);
        assert_eq!(methods[0].container.as_deref(), Some("Ext"));
        assert_eq!(methods[1].attributes, vec!["Test".to_string()]);
        assert!(methods[1].body.is_some());

        let invocation = tree.of_kind(SyntaxKind::MemberInvocation).next().unwrap();
        match invocation {
            SyntaxNode::MemberInvocation { receiver, name, .. } => {
                assert_eq!(doc.token(receiver.first).text(), "2");
                assert_eq!(doc.token(*name).text(), "Twice");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_using_statements() {
        let source = "void M() { using (a) b(); using (c) using (d) { } }";
        let (_, tree) = parse(source);
        let kinds: Vec<StatementKind> = tree
            .of_kind(SyntaxKind::UsingStatement)
            .map(|n| match n {
                SyntaxNode::UsingStatement { body_kind, .. } => *body_kind,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![StatementKind::Other, StatementKind::Using, StatementKind::Block]
        );
    }

    fn if_flags(source: &str) -> Vec<(bool, String, bool)> {
        let (doc, tree) = parse(source);
        tree.of_kind(SyntaxKind::IfStatement)
            .map(|n| match n {
                SyntaxNode::IfStatement {
                    disjunction,
                    body_first,
                    ends_with_else,
                    ..
                } => (*disjunction, doc.token(*body_first).text().to_string(), *ends_with_else),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_if_statement_shapes() {
        assert_eq!(
            if_flags("if (a || b) return;"),
            vec![(true, "return".to_string(), false)]
        );
        assert_eq!(
            if_flags("if ((a || b)) { return; } else { x(); }"),
            vec![(true, "return".to_string(), true)]
        );
        assert_eq!(
            if_flags("if ((a || b) && c) return;"),
            vec![(false, "return".to_string(), false)]
        );
        assert_eq!(
            if_flags("if (x is 1 or 2) return;"),
            vec![(true, "return".to_string(), false)]
        );
        assert_eq!(
            if_flags("if (f(a || b)) return;"),
            vec![(false, "return".to_string(), false)]
        );
    }

    #[test]
    fn test_else_if_chain() {
        let flags = if_flags("if (a) x(); else if (b || c) return; else y();");
        assert_eq!(
            flags,
            vec![
                (false, "x".to_string(), true),
                (true, "return".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_operators() {
        let source = "var a = b +\n c; var n = x?.y ?? z; var t = p ? q : r; int? k = null; if (v is > 1 and < 5) { } List<int> l;";
        let (doc, tree) = parse(source);
        let ops: Vec<(String, OperatorKind)> = tree
            .of_kind(SyntaxKind::OperatorToken)
            .map(|n| match n {
                SyntaxNode::OperatorToken { operator, kind } => {
                    (doc.token(*operator).text().to_string(), *kind)
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                ("+".to_string(), OperatorKind::Binary),
                ("?".to_string(), OperatorKind::ConditionalAccess),
                (".".to_string(), OperatorKind::MemberBinding),
                ("??".to_string(), OperatorKind::Coalesce),
                ("?".to_string(), OperatorKind::ConditionalQuestion),
                (":".to_string(), OperatorKind::ConditionalColon),
                ("is".to_string(), OperatorKind::Is),
                ("and".to_string(), OperatorKind::Pattern),
            ]
        );
    }

    #[test]
    fn test_using_directive_dots_are_not_member_access() {
        let (_, tree) = parse("using System.Linq;\nnamespace A.B { }\nclass C { void M() { a.b(); } }");
        assert_eq!(tree.of_kind(SyntaxKind::OperatorToken).count(), 1);
    }
}
