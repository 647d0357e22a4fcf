//! The grammar productions themselves.
//!
//! Two calling conventions are used, chosen per production:
//!
//! - **Dispatch-style** (`parse_statement`, `parse_block_statement`,
//!   `parse_primary_expression`): the caller has already landed `current` on
//!   the production's first token before calling in, because the set of
//!   tokens that can start the production is large or context-dependent.
//! - **Self-fetching** (`parse_var_declaration`, `parse_parameter_declaration`,
//!   `parse_type`, `parse_func_declaration`): the production's first token is
//!   a fixed, already-known keyword or punctuation mark, so the production
//!   consumes it itself as its very first action.
//!
//! Every production, on success, leaves `current` resting on its own last
//! token (never advanced past it) -- that token's end position is what
//! `Parser::finish` uses to compute the node's length.

use unholy_common::SyntaxKind;
use unholy_common::SyntaxKind::*;

use crate::ast::{Ast, NodeArray, NodeData, NodeId};
use crate::context::ContextFlags;
use crate::error::FrontendError;
use crate::parser::{starts_expression, Parser};

/// Scan and parse `source` in full, producing a linked `SourceFile` or the
/// first fatal error encountered.
pub fn parse_file(source: &str, file_name: impl Into<String>) -> Result<Ast, FrontendError> {
    let mut p = Parser::new(source, file_name);
    let root = parse_source_file(&mut p)?;
    Ok(p.into_ast(root))
}

fn parse_source_file(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.push_context(ContextFlags::SOURCE_ELEMENTS);
    let root_id = p.begin(SourceFile);
    p.push_parent(root_id);

    let mut statements = p.begin_array();
    loop {
        p.consume(&[])?;
        if p.current().kind == EndOfFileToken {
            break;
        }
        let stmt = parse_statement(p)?;
        statements.items.push(stmt);
    }
    let statements = p.finish_array(statements);

    p.pop_parent();
    p.pop_context();
    let file_name = p.file_name().to_string();
    Ok(p.finish(root_id, NodeData::SourceFile { file_name, statements }))
}

fn parse_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    match p.current().kind {
        OpenBraceToken => parse_block_statement(p),
        LetKeyword => parse_var_declaration_statement(p),
        FuncKeyword => parse_func_declaration_statement(p),
        IfKeyword => parse_if_statement(p),
        ReturnKeyword => parse_return_statement(p),
        kind if starts_expression(kind) => parse_expression_statement(p),
        _ => Err(p.error_not_a_statement().into()),
    }
}

fn parse_block_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    let open_brace = p.current().clone();
    let id = p.begin(BlockStatement);
    p.push_parent(id);
    p.push_context(ContextFlags::BLOCK_STATEMENTS);

    let mut statements = p.begin_array();
    loop {
        p.consume(&[])?;
        if p.current().kind == CloseBraceToken {
            break;
        }
        if p.current().kind == EndOfFileToken {
            return Err(p.error_unexpected_eof_related("block opened here", open_brace).into());
        }
        let stmt = parse_statement(p)?;
        statements.items.push(stmt);
    }
    let statements = p.finish_array(statements);

    p.pop_context();
    p.pop_parent();
    Ok(p.finish(id, NodeData::BlockStatement { statements }))
}

fn parse_var_declaration_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::SOURCE_ELEMENTS.union(ContextFlags::BLOCK_STATEMENTS), true, "let")?;
    let stmt_id = p.begin(VarDeclarationStatement);
    p.push_parent(stmt_id);
    p.push_context(ContextFlags::VAR_DECLARATIONS);

    let declaration = parse_var_declaration(p)?;
    p.consume(&[SemicolonToken])?;

    p.pop_context();
    p.pop_parent();
    Ok(p.finish(stmt_id, NodeData::VarDeclarationStatement { declaration }))
}

fn parse_var_declaration(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.consume(&[Identifier])?;
    let decl_id = p.begin(VarDeclaration);
    p.push_parent(decl_id);
    let name_id = build_identifier(p);

    let ty = if p.consume_optional(&[ColonToken])?.is_some() { Some(parse_type(p)?) } else { None };

    let initializer = if p.consume_optional(&[EqualsToken])?.is_some() {
        p.consume(&[])?;
        Some(parse_expression(p)?)
    } else {
        None
    };

    p.pop_parent();
    Ok(p.finish(decl_id, NodeData::VarDeclaration { name: name_id, ty, initializer }))
}

fn parse_type(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.consume(&[BoolKeyword, IntKeyword, VoidKeyword])?;
    let kind = p.current().kind;
    let id = p.begin(KeywordTypeNode);
    Ok(p.finish(id, NodeData::KeywordTypeNode { kind }))
}

fn parse_func_declaration_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::SOURCE_ELEMENTS, false, "func")?;
    let stmt_id = p.begin(FuncDeclarationStatement);
    p.push_parent(stmt_id);
    p.push_context(ContextFlags::FUNC_DECLARATIONS);

    let declaration = parse_func_declaration(p)?;

    p.pop_context();
    p.pop_parent();
    Ok(p.finish(stmt_id, NodeData::FuncDeclarationStatement { declaration }))
}

fn parse_func_declaration(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.consume(&[Identifier])?;
    let decl_id = p.begin(FuncDeclaration);
    p.push_parent(decl_id);
    let name_id = build_identifier(p);

    p.consume(&[OpenParenToken])?;
    let params = parse_parameter_list(p)?;
    p.consume(&[ColonToken])?;
    let ty = parse_type(p)?;
    p.consume(&[OpenBraceToken])?;
    let body = parse_block_statement(p)?;

    p.pop_parent();
    Ok(p.finish(decl_id, NodeData::FuncDeclaration { name: name_id, params, ty, body }))
}

/// `current` is the `(` that opens the list on entry; `current` rests on
/// the matching `)` on return.
fn parse_parameter_list(p: &mut Parser) -> Result<NodeArray, FrontendError> {
    p.push_context(ContextFlags::PARAMETER_DECLARATIONS);
    let mut params = p.begin_array();

    if p.consume_optional(&[CloseParenToken])?.is_none() {
        loop {
            let param = parse_parameter_declaration(p)?;
            params.items.push(param);
            if p.consume_optional(&[CommaToken])?.is_none() {
                break;
            }
        }
        p.consume(&[CloseParenToken])?;
    }

    p.pop_context();
    Ok(p.finish_array(params))
}

fn parse_parameter_declaration(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::PARAMETER_DECLARATIONS, true, "parameter declaration")?;
    p.consume(&[Identifier])?;
    let id = p.begin(ParameterDeclaration);
    p.push_parent(id);
    let name_id = build_identifier(p);

    p.consume(&[ColonToken])?;
    let ty = parse_type(p)?;

    p.pop_parent();
    Ok(p.finish(id, NodeData::ParameterDeclaration { name: name_id, ty }))
}

fn parse_if_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::BLOCK_STATEMENTS, true, "if")?;
    let id = p.begin(IfStatement);
    p.push_parent(id);

    p.consume(&[OpenParenToken])?;
    p.consume(&[])?;
    let condition = parse_expression(p)?;
    p.consume(&[CloseParenToken])?;

    p.consume(&[])?;
    let then_statement = parse_statement(p)?;

    let else_statement = if p.consume_optional(&[ElseKeyword])?.is_some() {
        p.consume(&[])?;
        Some(parse_statement(p)?)
    } else {
        None
    };

    p.pop_parent();
    Ok(p.finish(id, NodeData::IfStatement { condition, then_statement, else_statement }))
}

fn parse_return_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::FUNC_DECLARATIONS.union(ContextFlags::BLOCK_STATEMENTS), false, "return")?;
    p.assert_kind(&[ReturnKeyword])?;
    let id = p.begin(ReturnStatement);
    p.push_parent(id);

    p.consume(&[])?;
    let expression = if p.current().kind == SemicolonToken {
        None
    } else {
        Some(parse_expression(p)?)
    };
    p.consume(&[SemicolonToken])?;

    p.pop_parent();
    Ok(p.finish(id, NodeData::ReturnStatement { expression }))
}

fn parse_expression_statement(p: &mut Parser) -> Result<NodeId, FrontendError> {
    p.assert_context(ContextFlags::BLOCK_STATEMENTS, true, "expression statement")?;
    let id = p.begin(ExpressionStatement);
    p.push_parent(id);

    let expression = parse_expression(p)?;
    p.consume(&[SemicolonToken])?;

    p.pop_parent();
    Ok(p.finish(id, NodeData::ExpressionStatement { expression }))
}

fn parse_expression(p: &mut Parser) -> Result<NodeId, FrontendError> {
    parse_assignment_or_higher(p)
}

fn parse_assignment_or_higher(p: &mut Parser) -> Result<NodeId, FrontendError> {
    let left = parse_binary_or_higher(p, 0)?;

    if p.speculate(|tok| tok.kind == EqualsToken)?.is_none() {
        return Ok(left);
    }
    let operator_id = build_token_node(p, EqualsToken);
    p.consume(&[])?;

    let bin_id = p.begin_before(left, BinaryExpression);
    p.reparent(left, bin_id);
    p.reparent(operator_id, bin_id);
    p.push_parent(bin_id);
    let right = parse_assignment_or_higher(p)?;
    p.pop_parent();

    Ok(p.finish(bin_id, NodeData::BinaryExpression { left, operator_token: operator_id, right }))
}

fn parse_binary_or_higher(p: &mut Parser, min_precedence: i32) -> Result<NodeId, FrontendError> {
    let mut left = parse_primary_expression(p)?;

    loop {
        let precedence = p.peek()?.kind.binary_precedence();
        if precedence <= min_precedence {
            break;
        }
        p.consume(&[])?;
        let operator_kind = p.current().kind;
        let operator_id = build_token_node(p, operator_kind);
        p.consume(&[])?;

        let bin_id = p.begin_before(left, BinaryExpression);
        p.reparent(left, bin_id);
        p.reparent(operator_id, bin_id);
        p.push_parent(bin_id);
        let right = parse_binary_or_higher(p, precedence)?;
        p.pop_parent();

        left = p.finish(bin_id, NodeData::BinaryExpression { left, operator_token: operator_id, right });
    }

    Ok(left)
}

fn parse_primary_expression(p: &mut Parser) -> Result<NodeId, FrontendError> {
    match p.current().kind {
        Identifier => {
            let ident_id = build_identifier(p);
            if p.consume_optional(&[OpenParenToken])?.is_none() {
                return Ok(ident_id);
            }
            let call_id = p.begin_before(ident_id, CallExpression);
            p.reparent(ident_id, call_id);
            p.push_parent(call_id);
            let args = parse_argument_list(p)?;
            p.pop_parent();
            Ok(p.finish(call_id, NodeData::CallExpression { callee: ident_id, args }))
        }
        IntegerLiteral => {
            let text = p.current().raw_text.clone();
            let id = p.begin(IntegerLiteral);
            Ok(p.finish(id, NodeData::IntegerLiteral { text }))
        }
        TrueKeyword | FalseKeyword => {
            let kind = p.current().kind;
            let id = p.begin(BoolLiteral);
            Ok(p.finish(id, NodeData::BoolLiteral { kind }))
        }
        _ => Err(p.error_expected_expression().into()),
    }
}

/// `current` is the `(` that opens the list on entry; `current` rests on
/// the matching `)` on return.
fn parse_argument_list(p: &mut Parser) -> Result<NodeArray, FrontendError> {
    p.push_context(ContextFlags::ARG_EXPRESSIONS);
    let mut args = p.begin_array();

    if p.consume_optional(&[CloseParenToken])?.is_none() {
        p.consume(&[])?;
        loop {
            p.assert_context(ContextFlags::ARG_EXPRESSIONS, true, "argument expression")?;
            let arg = parse_expression(p)?;
            args.items.push(arg);
            if p.consume_optional(&[CommaToken])?.is_none() {
                break;
            }
            p.consume(&[])?;
        }
        p.consume(&[CloseParenToken])?;
    }

    p.pop_context();
    Ok(p.finish_array(args))
}

/// `current` must already be an `Identifier` token.
fn build_identifier(p: &mut Parser) -> NodeId {
    let name = p.current().raw_text.clone();
    let id = p.begin(Identifier);
    p.finish(id, NodeData::Identifier { name })
}

/// `current` must already be the operator token.
fn build_token_node(p: &mut Parser, kind: SyntaxKind) -> NodeId {
    let id = p.begin(TokenNode);
    p.finish(id, NodeData::TokenNode { kind })
}
