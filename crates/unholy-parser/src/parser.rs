//! The [`Parser`]: token-consumption primitives, the context-flag stack, and
//! the parent chain that `grammar.rs`'s productions are built on.
//!
//! `self.current` always holds the last token fetched from the scanner --
//! either pre-fetched by an enclosing production before it dispatches (the
//! way `parse_statement` expects its caller to have already landed on the
//! dispatch token), or left resting on a production's own last token once
//! that production returns. Every `finish` call uses `self.current.end()` as
//! the node's end boundary, which is only correct because of that
//! discipline -- never call `consume` "just to see what's next" without
//! being ready for `current` to move.

use unholy_common::{LexicalError, SemanticElement, SyntaxKind};
use unholy_lexer::Scanner;

use crate::ast::{AstBuilder, NodeArray, NodeData, NodeId};
use crate::context::{ContextFlags, ContextStack};
use crate::error::{FrontendError, ParseError};

pub struct Parser<'src> {
    scanner: Scanner<'src>,
    file_name: String,
    current: SemanticElement,
    context: ContextStack,
    builder: AstBuilder,
    parent_stack: Vec<NodeId>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, file_name: impl Into<String>) -> Self {
        Self {
            scanner: Scanner::new(source),
            file_name: file_name.into(),
            current: SemanticElement::new(SyntaxKind::Unknown, 1, 1, 0, String::new()),
            context: ContextStack::new(),
            builder: AstBuilder::new(),
            parent_stack: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn current(&self) -> &SemanticElement {
        &self.current
    }

    pub fn into_ast(self, root: NodeId) -> crate::ast::Ast {
        self.builder.into_ast(root)
    }

    // ── Token-consumption primitives (spec 4.2.1) ────────────────────────

    fn advance(&mut self) -> Result<(), LexicalError> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }

    /// Fetch the next token; if `expected` is non-empty and its kind is not
    /// in it, raise a parse error naming the first expected kind.
    pub fn consume(&mut self, expected: &[SyntaxKind]) -> Result<SemanticElement, FrontendError> {
        self.advance()?;
        if !expected.is_empty() && !expected.contains(&self.current.kind) {
            return Err(self.error_unexpected(expected).into());
        }
        Ok(self.current.clone())
    }

    /// Peek the next token; if its kind is in `kinds`, commit (advancing
    /// `current`) and return it, otherwise leave `current` untouched.
    pub fn consume_optional(&mut self, kinds: &[SyntaxKind]) -> Result<Option<SemanticElement>, FrontendError> {
        self.speculate(|tok| kinds.contains(&tok.kind))
    }

    /// Peek the next token; commit iff `pred` is true of it.
    pub fn speculate(
        &mut self,
        pred: impl Fn(&SemanticElement) -> bool,
    ) -> Result<Option<SemanticElement>, FrontendError> {
        let peeked = self.scanner.look_ahead(|s| s.next_token())?;
        if !pred(&peeked) {
            return Ok(None);
        }
        self.advance()?;
        Ok(Some(self.current.clone()))
    }

    /// Peek one token ahead without ever committing.
    pub fn peek(&mut self) -> Result<SemanticElement, LexicalError> {
        self.scanner.look_ahead(|s| s.next_token())
    }

    /// Check `current` against `expected` without advancing.
    pub fn assert_kind(&self, expected: &[SyntaxKind]) -> Result<(), FrontendError> {
        if expected.is_empty() || expected.contains(&self.current.kind) {
            Ok(())
        } else {
            Err(self.error_unexpected(expected).into())
        }
    }

    // ── Context-flag state machine (spec 4.2.2) ──────────────────────────

    pub fn push_context(&mut self, extra: ContextFlags) {
        self.context.push(self.context.current().union(extra));
    }

    pub fn pop_context(&mut self) {
        self.context.pop();
    }

    /// `loose`: at least one of `required` must be set. Strict: the context
    /// must equal `required` exactly.
    pub fn assert_context(
        &self,
        required: ContextFlags,
        loose: bool,
        construct: &str,
    ) -> Result<(), FrontendError> {
        let ok = if loose { self.context.current().contains_any(required) } else { self.context.current() == required };
        if ok {
            Ok(())
        } else {
            Err(self.error_not_allowed_in_context(construct).into())
        }
    }

    // ── Parent chain (spec 4.2.3) ─────────────────────────────────────────

    pub fn push_parent(&mut self, id: NodeId) {
        self.parent_stack.push(id);
    }

    pub fn pop_parent(&mut self) {
        self.parent_stack.pop();
    }

    fn current_parent(&self) -> Option<NodeId> {
        self.parent_stack.last().copied()
    }

    /// Open a node starting at the current token.
    pub fn begin(&mut self, kind: SyntaxKind) -> NodeId {
        let t = &self.current;
        self.builder.begin(kind, t.line, t.column, t.pos)
    }

    /// Open a node retroactively starting at an already-opened child.
    pub fn begin_before(&mut self, child: NodeId, kind: SyntaxKind) -> NodeId {
        self.builder.begin_before(child, kind)
    }

    /// Fix up a node's parent once the node that wraps it exists.
    pub fn reparent(&mut self, id: NodeId, parent: NodeId) {
        self.builder.reparent(id, parent)
    }

    /// Close a node: end position is `current`'s end, parent is whatever is
    /// on top of the parent stack.
    pub fn finish(&mut self, id: NodeId, data: NodeData) -> NodeId {
        let end = self.current.end();
        let parent = self.current_parent();
        self.builder.finalize(id, data, parent, end);
        id
    }

    /// Open a child-node array, its position captured at the current token
    /// (typically the opening bracket).
    pub fn begin_array(&self) -> NodeArray {
        let t = &self.current;
        NodeArray { items: Vec::new(), pos: t.pos, length: 0, line: t.line, column: t.column }
    }

    /// Close a child-node array, its length computed up to `current`'s end
    /// (typically the closing bracket).
    pub fn finish_array(&self, mut array: NodeArray) -> NodeArray {
        array.length = self.current.end() - array.pos;
        array
    }

    // ── Error construction ────────────────────────────────────────────────

    fn error_unexpected(&self, expected: &[SyntaxKind]) -> ParseError {
        let found = describe(self.current.kind);
        if self.current.kind == SyntaxKind::EndOfFileToken {
            return ParseError::new("Unexpected end of file", self.current.clone());
        }
        let message = match expected {
            [single] => format!("expected {}, found {found}", describe(*single)),
            _ => {
                let wanted: Vec<_> = expected.iter().map(|k| describe(*k)).collect();
                format!("expected one of {}, found {found}", wanted.join(", "))
            }
        };
        ParseError::new(message, self.current.clone())
    }

    pub fn error_expected_expression(&self) -> ParseError {
        if self.current.kind == SyntaxKind::EndOfFileToken {
            ParseError::new("Unexpected end of file", self.current.clone())
        } else {
            ParseError::new(format!("expected expression, found {}", describe(self.current.kind)), self.current.clone())
        }
    }

    pub fn error_not_a_statement(&self) -> ParseError {
        if self.current.kind == SyntaxKind::EndOfFileToken {
            ParseError::new("Unexpected end of file", self.current.clone())
        } else {
            ParseError::new(format!("\"{}\" is not a statement", self.current.raw_text), self.current.clone())
        }
    }

    fn error_not_allowed_in_context(&self, construct: &str) -> ParseError {
        ParseError::new(format!("\"{construct}\" is not allowed in this context"), self.current.clone())
    }

    /// An unexpected end of file, pointing back at a second location (e.g.
    /// the brace that opened the construct that never closed).
    pub fn error_unexpected_eof_related(
        &self,
        related_message: impl Into<String>,
        related_element: SemanticElement,
    ) -> ParseError {
        ParseError::with_related("Unexpected end of file", self.current.clone(), related_message, related_element)
    }
}

/// True for tokens that may begin an expression. `+`/`-` are included here
/// even though `parse_primary_expression` does not yet have a unary-operator
/// arm: a leading `+x;`/`-x;` is routed into `ExpressionStatement` by this
/// check and then fails inside primary parsing.
pub fn starts_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::IntegerLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
    )
}

fn describe(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::Unknown => "an unknown character",
        SyntaxKind::EndOfFileToken => "end of file",
        SyntaxKind::OpenBraceToken => "'{'",
        SyntaxKind::CloseBraceToken => "'}'",
        SyntaxKind::OpenParenToken => "'('",
        SyntaxKind::CloseParenToken => "')'",
        SyntaxKind::SemicolonToken => "';'",
        SyntaxKind::CommaToken => "','",
        SyntaxKind::ColonToken => "':'",
        SyntaxKind::PlusToken => "'+'",
        SyntaxKind::MinusToken => "'-'",
        SyntaxKind::AsteriskToken => "'*'",
        SyntaxKind::SlashToken => "'/'",
        SyntaxKind::PercentToken => "'%'",
        SyntaxKind::LessThanToken => "'<'",
        SyntaxKind::GreaterThanToken => "'>'",
        SyntaxKind::EqualsToken => "'='",
        SyntaxKind::EqualsEqualsToken => "'=='",
        SyntaxKind::Identifier => "an identifier",
        SyntaxKind::IntegerLiteral => "an integer literal",
        SyntaxKind::BoolKeyword => "'bool'",
        SyntaxKind::ElseKeyword => "'else'",
        SyntaxKind::FalseKeyword => "'false'",
        SyntaxKind::FuncKeyword => "'func'",
        SyntaxKind::IfKeyword => "'if'",
        SyntaxKind::IntKeyword => "'int'",
        SyntaxKind::LetKeyword => "'let'",
        SyntaxKind::ReturnKeyword => "'return'",
        SyntaxKind::TrueKeyword => "'true'",
        SyntaxKind::VoidKeyword => "'void'",
        _ => "an unexpected token",
    }
}
