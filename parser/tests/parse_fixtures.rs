//! Fixture-style integration tests: parse a whole source string through the
//! crate's public surface and assert the resulting AST/token shape, as
//! opposed to the accept/reject unit tests colocated with each parser stage.

use esparse_ast::{BinaryOp, Decl, Expr, LiteralValue, ModuleItem, Stmt, TokenKind, VarKind};
use esparse_parser::options::SourceType;
use esparse_parser::{parse, tokenize, ParserOptions};

fn only_stmt(program: &esparse_ast::Program) -> &Stmt {
    assert_eq!(program.body.len(), 1, "expected exactly one top-level item");
    match &program.body[0] {
        ModuleItem::Stmt(stmt) => stmt,
        other => panic!("expected a statement, got {other:?}"),
    }
}

#[test]
fn variable_declaration_with_binary_initializer() {
    let program = parse("let total = 1 + 2 * 3;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    assert_eq!(decl.kind, VarKind::Let);
    assert_eq!(decl.declarations.len(), 1);
    let init = decl.declarations[0].init.as_ref().expect("declarator has an initializer");
    let Expr::BinaryExpression { operator: BinaryOp::Add, right, .. } = init else {
        panic!("expected the outer operator to be `+`, got {init:?}");
    };
    assert!(matches!(**right, Expr::BinaryExpression { operator: BinaryOp::Mul, .. }), "`*` should bind tighter than `+`");
}

#[test]
fn arrow_function_with_destructured_parameter() {
    let program = parse("const f = ({a, b}) => a + b;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    assert!(matches!(init, Expr::ArrowFunctionExpression(f) if f.params.len() == 1));
}

#[test]
fn division_after_object_literal_is_not_a_regexp() {
    // Regression fixture for the context-stack bug where `{` following `=`
    // pushed a statement context, making the tokenizer misread the `/` that
    // follows a brace-closed object literal as the start of a regexp.
    let program = parse("var x = {a:1} / 2;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    assert!(matches!(init, Expr::BinaryExpression { operator: BinaryOp::Div, .. }), "expected `/` to parse as division, got {init:?}");
}

#[test]
fn decrement_then_greater_than_is_not_a_legacy_comment() {
    // Regression fixture: `-->` must only open a legacy HTML comment at the
    // start of a line; `x-->0` is `(x--) > 0`.
    let program = parse("var x = 1; while (x-->0) { x = x - 1; }", &ParserOptions::default()).unwrap();
    assert_eq!(program.body.len(), 2, "the `while` loop must survive as its own statement, not be commented out");
    let ModuleItem::Stmt(Stmt::WhileStatement { test, .. }) = &program.body[1] else {
        panic!("expected a while statement, got {:?}", program.body[1]);
    };
    assert!(matches!(**test, Expr::BinaryExpression { operator: BinaryOp::Greater, .. }));
}

#[test]
fn legacy_html_comments_are_not_recognized_in_module_code() {
    // In module code neither legacy form is a comment at all, so `-->` just
    // falls through to ordinary tokenizing: `x`, `--`, `>`.
    let options = ParserOptions::default().with_source_type(SourceType::Module);
    let program = parse("x --> y;", &options).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::ExpressionStatement { expression, .. } = stmt else {
        panic!("expected an expression statement, got {stmt:?}");
    };
    assert!(
        matches!(expression, Expr::BinaryExpression { operator: BinaryOp::Greater, .. }),
        "expected `x-- > y`, got {expression:?}"
    );
}

#[test]
fn hex_bigint_round_trips_through_raw() {
    let program = parse("const x = 0x1An;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    let Expr::Literal(lit) = init else {
        panic!("expected a literal, got {init:?}");
    };
    let LiteralValue::BigInt(digits) = &lit.value else {
        panic!("expected a BigInt literal value, got {:?}", lit.value);
    };
    assert_eq!(digits, "0x1A");
    assert_eq!(lit.raw, "0x1An");
}

#[test]
fn regexp_literal_compiles_a_value_when_supported() {
    let program = parse("const r = /ab+c/i;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    let Expr::RegExpLiteral { pattern, flags, value, .. } = init else {
        panic!("expected a regexp literal, got {init:?}");
    };
    assert_eq!(pattern, "ab+c");
    assert_eq!(flags, "i");
    let value = value.as_ref().expect("`ab+c` is within the `regex` crate's supported grammar");
    assert!(value.is_match("ABC"));
}

#[test]
fn regexp_literal_with_backreference_has_no_compiled_value() {
    // `regex` has no backreference support; the pattern is still a valid
    // ECMAScript regexp, so parsing succeeds and `value` is simply `None`.
    let program = parse(r"const r = /(a)\1/;", &ParserOptions::default()).unwrap();
    let stmt = only_stmt(&program);
    let Stmt::Declaration(Decl::VariableDeclaration(decl)) = stmt else {
        panic!("expected a variable declaration, got {stmt:?}");
    };
    let init = decl.declarations[0].init.as_ref().unwrap();
    let Expr::RegExpLiteral { value, .. } = init else {
        panic!("expected a regexp literal, got {init:?}");
    };
    assert!(value.is_none());
}

#[test]
fn diagnostic_renders_line_and_column() {
    let err = parse("function (", &ParserOptions::default()).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains(&format!("({}:{})", err.loc.start.line, err.loc.start.column)), "rendered diagnostic `{rendered}` should end with its (line:column)");
}

#[test]
fn tokenize_yields_tokens_ending_in_eof() {
    let tokens = tokenize("let x = 1;", &ParserOptions::default()).unwrap();
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Name, TokenKind::Name, TokenKind::Eq, TokenKind::Num, TokenKind::Semi, TokenKind::Eof]
    );
}
