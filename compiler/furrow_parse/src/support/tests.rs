use super::*;
use furrow_scope::ScopeError;
use pretty_assertions::assert_eq;

fn support(config: ParserConfig) -> ParserSupport<&'static str> {
    ParserSupport::new(config, SharedInterner::new()).unwrap()
}

#[test]
fn outer_variables_seed_the_root() {
    let mut s = support(ParserConfig::default().with_outer_variables(["a", "b"]));
    let b = s.intern("b");
    assert_eq!(
        s.declare_identifier(b),
        Resolution::Variable(VarAddress::new(0, 1))
    );

    let c = s.intern("c");
    assert_eq!(s.assignable(c).unwrap(), (VarAddress::new(0, 2), true));
    assert_eq!(s.finish("root").top_variables, vec!["a", "b", "c"]);
}

#[test]
fn eval_parse_writes_into_the_eval_scope() {
    let mut s = support(
        ParserConfig::default()
            .with_outer_variables(["a"])
            .with_eval_parse(true),
    );
    let a = s.intern("a");
    let z = s.intern("z");
    assert_eq!(s.assignable(a).unwrap(), (VarAddress::new(1, 0), false));
    assert_eq!(s.assignable(z).unwrap(), (VarAddress::new(0, 0), true));
    // The eval scope is the base of the chain.
    assert!(matches!(
        s.pop_current_scope(),
        Err(ParseError::Scope(ScopeError::PopBase(_)))
    ));
    assert_eq!(s.finish("root").top_variables, vec!["z"]);
}

#[test]
fn scope_pushes_and_pops() {
    let mut s = support(ParserConfig::default());
    let x = s.intern("x");
    s.assignable(x).unwrap();

    let block = s.push_block_scope().unwrap();
    assert_eq!(s.current_scope(), block);
    assert_eq!(
        s.declare_identifier(x),
        Resolution::Variable(VarAddress::new(1, 0))
    );

    s.push_local_scope().unwrap();
    assert_eq!(s.declare_identifier(x), Resolution::ImplicitSelfCall);
    s.pop_current_scope().unwrap();

    assert_eq!(s.pop_current_scope().unwrap(), block);
    assert!(s.pop_current_scope().is_err());
}

#[test]
fn declare_local_binds_at_the_method_boundary() {
    let mut s = support(ParserConfig::default());
    let method = s.push_local_scope().unwrap();
    s.push_block_scope().unwrap();
    let rest = s.intern("rest");
    assert_eq!(s.declare_local(rest).unwrap(), 0);
    assert_eq!(s.scopes().scope(method).variables(), &[rest]);
    assert!(s.scopes().current_scope().is_empty());
}

#[test]
fn repeated_underscore_arguments_get_hidden_names() {
    let mut s = support(ParserConfig::default());
    s.push_local_scope().unwrap();
    let underscore = s.intern("_");
    assert_eq!(s.arg_var(underscore).unwrap(), 0);
    assert_eq!(s.arg_var(underscore).unwrap(), 1);
    assert_eq!(s.arg_var(underscore).unwrap(), 2);

    let names: Vec<_> = s
        .scopes()
        .current_scope()
        .variables()
        .iter()
        .map(|&n| s.name_str(n))
        .collect();
    assert_eq!(names, vec!["_", "_$0", "_$1"]);
}

#[test]
fn duplicated_argument_is_fatal() {
    let mut s = support(ParserConfig::default());
    s.push_local_scope().unwrap();
    let a = s.intern("a");
    assert_eq!(s.shadowing_lvar(a, Span::new(4, 5)).unwrap(), a);
    s.arg_var(a).unwrap();

    let err = s.shadowing_lvar(a, Span::new(7, 8)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.to_string(), "duplicated argument name");
    assert_eq!(err.span(), Some(Span::new(7, 8)));

    // Underscore-prefixed names are exempt.
    let skip = s.intern("_skip");
    s.arg_var(skip).unwrap();
    assert!(s.shadowing_lvar(skip, Span::DUMMY).is_ok());
}

#[test]
fn shadowing_warns_only_when_verbose() {
    for verbose in [false, true] {
        let mut s = support(ParserConfig::default().with_verbose(verbose));
        let x = s.intern("x");
        s.assignable(x).unwrap();
        s.push_block_scope().unwrap();
        assert!(s.shadowing_lvar(x, Span::new(10, 11)).is_ok());

        let warnings: Vec<_> = s.diagnostics().peek().cloned().collect();
        if verbose {
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].code, ErrorCode::W2001);
            assert_eq!(warnings[0].message, "shadowing outer local variable - x");
        } else {
            assert!(warnings.is_empty());
        }
        assert!(!s.has_errors());
    }
}

#[test]
fn formal_arguments_must_be_local_names() {
    let mut s = support(ParserConfig::default());
    s.push_local_scope().unwrap();
    for (text, kind) in [
        ("Const", "a constant"),
        ("@ivar", "an instance variable"),
        ("@@cvar", "a class variable"),
        ("$gvar", "a global variable"),
    ] {
        let name = s.intern(text);
        let err = s.formal_argument(name, Span::DUMMY).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2002);
        assert_eq!(err.to_string(), format!("formal argument cannot be {kind}"));
    }
    let ok = s.intern("value");
    assert_eq!(s.formal_argument(ok, Span::DUMMY).unwrap(), ok);
}

#[test]
fn new_bv_declares_in_the_block() {
    let mut s = support(ParserConfig::default());
    s.push_block_scope().unwrap();
    let v = s.intern("v");
    assert_eq!(s.new_bv(v, Span::DUMMY).unwrap(), 0);
    assert!(s.new_bv(v, Span::DUMMY).is_err());
}

#[test]
fn nesting_counters() {
    let mut s = support(ParserConfig::default());
    assert!(!s.in_def());
    assert!(!s.in_single());
    s.set_in_def(true);
    s.set_in_single(2);
    assert!(s.in_def());
    assert!(s.in_single());
    assert_eq!(s.in_single_count(), 2);
}

#[test]
fn warnings_and_errors() {
    let mut s = support(ParserConfig::new("t.rb"));
    s.warning("only in verbose", Span::DUMMY);
    s.warn("always", Span::new(1, 2));
    s.report_syntax_error("syntax error", "'}'", &["';'".to_string()], Span::new(5, 6));
    assert!(s.has_errors());

    let result = s.finish("root");
    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.warnings().count(), 1);
    assert_eq!(result.warnings().next().unwrap().notes, vec!["in t.rb"]);
    let error = result.errors().next().unwrap();
    assert_eq!(error.code, ErrorCode::E1001);
    assert_eq!(error.notes, vec!["expected `';'`"]);
    assert!(result.has_errors());
}

#[test]
fn yyerror_and_compile_error_are_fatal_values() {
    let s = support(ParserConfig::default());
    let err = s.yyerror("void value expression", Span::new(2, 3));
    assert_eq!(err.code(), ErrorCode::E1001);
    let err = s.compile_error("dynamic constant assignment", Span::new(2, 3));
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.to_string(), "dynamic constant assignment");
}

#[test]
fn begin_end_blocks_and_reset() {
    let mut s = support(ParserConfig::default().with_outer_variables(["o"]));
    s.add_begin_block("b1");
    s.add_end_block("e1");
    s.add_begin_block("b2");
    let n = s.intern("n");
    s.assignable(n).unwrap();
    s.push_block_scope().unwrap();
    s.set_in_def(true);
    s.warn("w", Span::DUMMY);

    s.reset().unwrap();
    assert_eq!(s.scopes().nesting(), 0);
    assert!(!s.in_def());
    assert_eq!(s.diagnostics().peek().count(), 0);

    let result = s.finish("root");
    assert!(result.begin_blocks.is_empty());
    assert!(result.end_blocks.is_empty());
    assert_eq!(result.top_variables, vec!["o"]);
}

#[test]
fn finish_hands_over_side_results() {
    let mut s = support(ParserConfig::default());
    s.add_begin_block("b1");
    s.add_end_block("e1");
    s.add_begin_block("b2");
    let result = s.finish("root");
    assert_eq!(result.root, "root");
    assert_eq!(result.begin_blocks, vec!["b1", "b2"]);
    assert_eq!(result.end_blocks, vec!["e1"]);

    let mapped = result.map(str::len);
    assert_eq!(mapped.root, 4);
    assert_eq!(mapped.begin_blocks, vec![2, 2]);
}
