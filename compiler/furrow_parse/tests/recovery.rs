//! Error recovery through an `error ';'` production.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use common::{lex, list_tables, reduce_list, support, Node};
use furrow_diagnostic::ErrorCode;
use furrow_ir::Span;
use furrow_parse::{
    reducer_fn, ParseError, ParseResult, Parser, ParserConfig, RecordingTrace, TraceEvent,
};
use pretty_assertions::assert_eq;

fn parse(src: &str) -> Result<ParseResult<Node>, ParseError> {
    parse_with(src, ParserConfig::default())
}

fn parse_with(src: &str, config: ParserConfig) -> Result<ParseResult<Node>, ParseError> {
    let tables = list_tables();
    furrow_parse::parse(
        &tables,
        config,
        furrow_ir::SharedInterner::new(),
        &mut lex(src),
        &mut reducer_fn(reduce_list),
    )
}

fn stmt(name: &str) -> Node {
    Node::Stmt(name.to_string())
}

#[test]
fn valid_input_has_no_diagnostics() {
    let result = parse("a; b; c;").unwrap();
    assert_eq!(result.root, Node::List(vec![stmt("a"), stmt("b"), stmt("c")]));
    assert!(!result.has_errors());
}

#[test]
fn empty_input_accepts_the_empty_list() {
    let result = parse("").unwrap();
    assert_eq!(result.root, Node::List(Vec::new()));
}

#[test]
fn one_bad_token_resynchronizes() {
    let result = parse("x; ) y; z;").unwrap();
    // `)` starts the error window; `y` is discarded up to the `;`.
    assert_eq!(result.root, Node::List(vec![stmt("x"), Node::Error, stmt("z")]));

    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::E1001);
    assert_eq!(errors[0].message, "syntax error");
    assert_eq!(errors[0].primary_span(), Some(Span::new(3, 4)));
    assert_eq!(errors[0].labels[0].message, "unexpected `')'`");
    assert_eq!(errors[0].notes, vec!["expected `tIDENTIFIER`"]);
}

#[test]
fn missing_semicolon_reports_the_expected_token() {
    let result = parse("x y; z;").unwrap();
    assert_eq!(result.root, Node::List(vec![Node::Error, stmt("z")]));
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].notes, vec!["expected `';'`"]);
}

#[test]
fn errors_inside_the_window_are_not_reported_again() {
    let result = parse("a; ) ; ) ;").unwrap();
    assert_eq!(result.root, Node::List(vec![stmt("a"), Node::Error, Node::Error]));
    assert_eq!(result.errors().count(), 1);
}

#[test]
fn errors_after_the_window_are_reported() {
    let result = parse(") ; a ; b ; ) ;").unwrap();
    assert_eq!(
        result.root,
        Node::List(vec![Node::Error, stmt("a"), stmt("b"), Node::Error])
    );
    assert_eq!(result.errors().count(), 2);
}

#[test]
fn input_invalid_to_the_end_fails_at_end_of_file() {
    let err = parse("a a a a").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1003);
    assert_eq!(err.to_string(), "irrecoverable syntax error at end-of-file");
}

#[test]
fn error_limit_caps_reported_errors() {
    let src = ") ; a ; b ; ) ; c ; d ; ) ;";
    let result = parse_with(src, ParserConfig::default().with_error_limit(2)).unwrap();
    let codes: Vec<_> = result.errors().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E1001, ErrorCode::E1001, ErrorCode::E9003]);
}

#[test]
fn recovery_is_visible_in_the_trace() {
    let tables = list_tables();
    let log = RecordingTrace::new();
    let mut parser = Parser::new(&tables).with_trace(Box::new(log.clone()));
    parser
        .parse(
            &mut lex("x ) ;"),
            &mut reducer_fn(reduce_list),
            &mut support(ParserConfig::default()),
        )
        .unwrap();

    let events = log.events();
    let error_at = events
        .iter()
        .position(|e| matches!(e, TraceEvent::Error { .. }))
        .unwrap();
    let after: Vec<_> = events[error_at..]
        .iter()
        .filter(|e| matches!(e, TraceEvent::Pop { .. } | TraceEvent::Discard { .. }))
        .collect();
    // Unwind pops state 2, then `)` is discarded in state 3.
    assert_eq!(after.len(), 2);
    assert!(matches!(after[0], TraceEvent::Pop { .. }));
    assert!(matches!(after[1], TraceEvent::Discard { .. }));
    assert_eq!(events.last(), Some(&TraceEvent::Accept));
}
