use unholy_common::SyntaxKind;
use unholy_parser::{parse_file, Ast, FrontendError, NodeData, NodeId};

fn parse(src: &str) -> Ast {
    parse_file(src, "test.un").expect("expected a successful parse")
}

fn statements_of<'a>(ast: &'a Ast, id: NodeId) -> &'a [NodeId] {
    match &ast.get(id).data {
        NodeData::SourceFile { statements, .. } => &statements.items,
        NodeData::BlockStatement { statements } => &statements.items,
        other => panic!("expected a statement container, found {other:?}"),
    }
}

fn first_statement(ast: &Ast) -> NodeId {
    statements_of(ast, ast.root())[0]
}

#[test]
fn var_declaration_with_precedence() {
    // S1
    let ast = parse("let x: int = 1 + 2 * 3;");
    let stmt_id = first_statement(&ast);
    let stmt = ast.get(stmt_id);
    let NodeData::VarDeclarationStatement { declaration } = &stmt.data else { panic!() };
    let decl = ast.get(*declaration);
    let NodeData::VarDeclaration { name, ty, initializer } = &decl.data else { panic!() };

    let NodeData::Identifier { name } = &ast.get(*name).data else { panic!() };
    assert_eq!(name, "x");

    let ty = ty.expect("declared type");
    let NodeData::KeywordTypeNode { kind } = &ast.get(ty).data else { panic!() };
    assert_eq!(*kind, SyntaxKind::IntKeyword);

    let init = initializer.expect("initializer");
    let NodeData::BinaryExpression { left, operator_token, right } = &ast.get(init).data else { panic!() };
    let NodeData::TokenNode { kind } = &ast.get(*operator_token).data else { panic!() };
    assert_eq!(*kind, SyntaxKind::PlusToken);
    assert!(matches!(ast.get(*left).data, NodeData::IntegerLiteral { .. }));
    assert!(matches!(ast.get(*right).data, NodeData::BinaryExpression { .. }));

    let NodeData::BinaryExpression { operator_token, .. } = &ast.get(*right).data else { panic!() };
    let NodeData::TokenNode { kind } = &ast.get(*operator_token).data else { panic!() };
    assert_eq!(*kind, SyntaxKind::AsteriskToken);

    // invariant 3: a child's span is contained in its parent's span.
    let stmt_meta = &ast.get(stmt_id).meta;
    let init_meta = &ast.get(init).meta;
    assert!(stmt_meta.pos <= init_meta.pos);
    assert!(init_meta.pos + init_meta.length <= stmt_meta.pos + stmt_meta.length);
}

#[test]
fn func_declaration_with_params_and_return() {
    // S2
    let ast = parse("func f(a: int, b: int): int { return a + b; }");
    let stmt = ast.get(first_statement(&ast));
    let NodeData::FuncDeclarationStatement { declaration } = &stmt.data else { panic!() };
    let decl = ast.get(*declaration);
    let NodeData::FuncDeclaration { name, params, ty, body } = &decl.data else { panic!() };

    let NodeData::Identifier { name } = &ast.get(*name).data else { panic!() };
    assert_eq!(name, "f");
    assert_eq!(params.items.len(), 2);
    for (param_id, expected_name) in params.items.iter().zip(["a", "b"]) {
        let NodeData::ParameterDeclaration { name, ty } = &ast.get(*param_id).data else { panic!() };
        let NodeData::Identifier { name } = &ast.get(*name).data else { panic!() };
        assert_eq!(name, expected_name);
        assert!(matches!(ast.get(*ty).data, NodeData::KeywordTypeNode { kind: SyntaxKind::IntKeyword }));
    }
    assert!(matches!(ast.get(*ty).data, NodeData::KeywordTypeNode { kind: SyntaxKind::IntKeyword }));

    let body = ast.get(*body);
    let NodeData::BlockStatement { statements } = &body.data else { panic!() };
    assert_eq!(statements.items.len(), 1);
    let ret = ast.get(statements.items[0]);
    let NodeData::ReturnStatement { expression } = &ret.data else { panic!() };
    let NodeData::BinaryExpression { operator_token, .. } = &ast.get(expression.unwrap()).data else { panic!() };
    let NodeData::TokenNode { kind } = &ast.get(*operator_token).data else { panic!() };
    assert_eq!(*kind, SyntaxKind::PlusToken);
}

#[test]
fn if_else_inside_function_body() {
    // S3
    let ast = parse("func f(): void { if (a == 0) { return; } else { return a; } }");
    let stmt = ast.get(first_statement(&ast));
    let NodeData::FuncDeclarationStatement { declaration } = &stmt.data else { panic!() };
    let NodeData::FuncDeclaration { body, .. } = &ast.get(*declaration).data else { panic!() };
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };
    let if_stmt = ast.get(statements.items[0]);
    let NodeData::IfStatement { condition, then_statement, else_statement } = &if_stmt.data else { panic!() };

    let NodeData::BinaryExpression { operator_token, .. } = &ast.get(*condition).data else { panic!() };
    let NodeData::TokenNode { kind } = &ast.get(*operator_token).data else { panic!() };
    assert_eq!(*kind, SyntaxKind::EqualsEqualsToken);

    let NodeData::BlockStatement { statements: then_stmts } = &ast.get(*then_statement).data else { panic!() };
    let NodeData::ReturnStatement { expression } = &ast.get(then_stmts.items[0]).data else { panic!() };
    assert!(expression.is_none());

    let else_block = ast.get(else_statement.expect("else branch"));
    let NodeData::BlockStatement { statements: else_stmts } = &else_block.data else { panic!() };
    let NodeData::ReturnStatement { expression } = &ast.get(else_stmts.items[0]).data else { panic!() };
    let NodeData::Identifier { name } = &ast.get(expression.unwrap()).data else { panic!() };
    assert_eq!(name, "a");
}

#[test]
fn return_at_top_level_is_rejected() {
    // S4
    let err = parse_file("return;", "test.un").unwrap_err();
    assert!(err.to_string().contains("not allowed in this context"), "{err}");
}

#[test]
fn expression_statement_at_top_level_is_rejected() {
    let err = parse_file("1 + 1;", "test.un").unwrap_err();
    assert!(err.to_string().contains("not allowed in this context"), "{err}");
}

#[test]
fn assignment_is_right_associative() {
    // invariant 6
    let ast = parse("func f(): void { a = b = c; }");
    let NodeData::FuncDeclarationStatement { declaration } = &ast.get(first_statement(&ast)).data else { panic!() };
    let NodeData::FuncDeclaration { body, .. } = &ast.get(*declaration).data else { panic!() };
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };
    let NodeData::ExpressionStatement { expression } = &ast.get(statements.items[0]).data else { panic!() };

    let NodeData::BinaryExpression { left, right, .. } = &ast.get(*expression).data else { panic!() };
    let NodeData::Identifier { name } = &ast.get(*left).data else { panic!() };
    assert_eq!(name, "a");
    assert!(matches!(ast.get(*right).data, NodeData::BinaryExpression { .. }));
}

#[test]
fn subtraction_is_left_associative() {
    // invariant 6
    let ast = parse("func f(): void { a - b - c; }");
    let NodeData::FuncDeclarationStatement { declaration } = &ast.get(first_statement(&ast)).data else { panic!() };
    let NodeData::FuncDeclaration { body, .. } = &ast.get(*declaration).data else { panic!() };
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };
    let NodeData::ExpressionStatement { expression } = &ast.get(statements.items[0]).data else { panic!() };

    // (a - b) - c: the outer node's left side is itself a BinaryExpression.
    let NodeData::BinaryExpression { left, right, .. } = &ast.get(*expression).data else { panic!() };
    assert!(matches!(ast.get(*left).data, NodeData::BinaryExpression { .. }));
    let NodeData::Identifier { name } = &ast.get(*right).data else { panic!() };
    assert_eq!(name, "c");
}

#[test]
fn call_expression_with_arguments() {
    let ast = parse("func f(): void { g(1, x); }");
    let NodeData::FuncDeclarationStatement { declaration } = &ast.get(first_statement(&ast)).data else { panic!() };
    let NodeData::FuncDeclaration { body, .. } = &ast.get(*declaration).data else { panic!() };
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };
    let NodeData::ExpressionStatement { expression } = &ast.get(statements.items[0]).data else { panic!() };
    let NodeData::CallExpression { callee, args } = &ast.get(*expression).data else { panic!() };

    let NodeData::Identifier { name } = &ast.get(*callee).data else { panic!() };
    assert_eq!(name, "g");
    assert_eq!(args.items.len(), 2);
    assert!(matches!(ast.get(args.items[0]).data, NodeData::IntegerLiteral { .. }));
    assert!(matches!(ast.get(args.items[1]).data, NodeData::Identifier { .. }));
}

#[test]
fn bool_literals_parse() {
    let ast = parse("func f(): void { true; false; }");
    let NodeData::FuncDeclarationStatement { declaration } = &ast.get(first_statement(&ast)).data else { panic!() };
    let NodeData::FuncDeclaration { body, .. } = &ast.get(*declaration).data else { panic!() };
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };

    let NodeData::ExpressionStatement { expression } = &ast.get(statements.items[0]).data else { panic!() };
    assert!(matches!(ast.get(*expression).data, NodeData::BoolLiteral { kind: SyntaxKind::TrueKeyword }));
    let NodeData::ExpressionStatement { expression } = &ast.get(statements.items[1]).data else { panic!() };
    assert!(matches!(ast.get(*expression).data, NodeData::BoolLiteral { kind: SyntaxKind::FalseKeyword }));
}

#[test]
fn empty_params_and_empty_body_parse() {
    let ast = parse("func f(): void {}");
    let NodeData::FuncDeclarationStatement { declaration } = &ast.get(first_statement(&ast)).data else { panic!() };
    let NodeData::FuncDeclaration { params, body, .. } = &ast.get(*declaration).data else { panic!() };
    assert!(params.items.is_empty());
    let NodeData::BlockStatement { statements } = &ast.get(*body).data else { panic!() };
    assert!(statements.items.is_empty());
}

#[test]
fn unterminated_block_is_unexpected_eof() {
    let err = parse_file("func f(): void { ", "test.un").unwrap_err();
    assert!(err.to_string().contains("Unexpected end of file"), "{err}");
    let FrontendError::Parse(parse_err) = err else { panic!("expected a ParseError") };
    let (related_message, related_element) = parse_err.related.expect("related location");
    assert_eq!(related_message, "block opened here");
    assert_eq!(related_element.kind, SyntaxKind::OpenBraceToken);
}

#[test]
fn unrecognized_statement_start_is_reported() {
    let err = parse_file(")", "test.un").unwrap_err();
    assert!(err.to_string().contains("is not a statement"), "{err}");
}

#[test]
fn root_has_no_parent() {
    let ast = parse("let x = 1;");
    assert!(ast.get(ast.root()).meta.parent.is_none());
}

#[test]
fn multiple_top_level_declarations_parse_in_order() {
    let ast = parse("let x = 1; let y = 2; func f(): void {}");
    let stmts = statements_of(&ast, ast.root());
    assert_eq!(stmts.len(), 3);
    assert!(matches!(ast.get(stmts[0]).data, NodeData::VarDeclarationStatement { .. }));
    assert!(matches!(ast.get(stmts[1]).data, NodeData::VarDeclarationStatement { .. }));
    assert!(matches!(ast.get(stmts[2]).data, NodeData::FuncDeclarationStatement { .. }));
}
