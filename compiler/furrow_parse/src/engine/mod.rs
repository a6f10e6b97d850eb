//! The LALR automaton.
//!
//! One loop drives everything: apply the state's default reduction if it has
//! one, otherwise read a lookahead and shift, reduce, or recover. Values are
//! opaque; a [`Reducer`] computes each nonterminal's value.

use furrow_ir::{Span, TokenKind};
use tracing::{debug, trace};

use crate::recovery::{Recovery, Tier};
use crate::stack::ParseStack;
use crate::tables::{ParseTables, RuleId, StateId};
use crate::trace::{ParseTrace, TracingTrace};
use crate::{
    ParseError, ParserConfig, ParserSupport, Production, Reducer, SyntaxError, TableError,
    TokenSource,
};

/// A reusable parser over one set of tables.
///
/// Parses are sequential; [`parse`](Self::parse) starts by resetting.
pub struct Parser<'t, V> {
    tables: &'t ParseTables,
    stack: ParseStack<V>,
    /// Kind of the buffered lookahead; the source holds its payload.
    lookahead: Option<TokenKind>,
    recovery: Recovery,
    trace: Option<Box<dyn ParseTrace>>,
}

impl<'t, V> Parser<'t, V> {
    pub fn new(tables: &'t ParseTables) -> Self {
        Parser {
            tables,
            stack: ParseStack::new(),
            lookahead: None,
            recovery: Recovery::default(),
            trace: None,
        }
    }

    /// Parser with the trace hook `config` asks for.
    pub fn with_config(tables: &'t ParseTables, config: &ParserConfig) -> Self {
        let mut parser = Self::new(tables);
        if config.debug {
            parser.set_trace(Some(Box::new(TracingTrace)));
        }
        parser
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Box<dyn ParseTrace>) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn set_trace(&mut self, trace: Option<Box<dyn ParseTrace>>) {
        self.trace = trace;
    }

    pub fn tables(&self) -> &'t ParseTables {
        self.tables
    }

    /// Drop the stack, lookahead and recovery state of a previous parse.
    pub fn reset(&mut self) {
        self.stack.reset();
        self.lookahead = None;
        self.recovery.reset();
    }

    /// Run the automaton until it accepts or fails.
    ///
    /// Recoverable syntax errors are reported to `support`; the returned
    /// error is always fatal.
    pub fn parse<S, R>(
        &mut self,
        source: &mut S,
        reducer: &mut R,
        support: &mut ParserSupport<V>,
    ) -> Result<V, ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
        R: Reducer<V> + ?Sized,
    {
        self.reset();
        debug!(file = %support.config().file_name, "parse start");
        self.hook(|t| t.push(StateId::START, 0));

        let result = self.run(source, reducer, support);
        match &result {
            Ok(_) => debug!(errors = support.diagnostics().error_count(), "parse accepted"),
            Err(err) => debug!(code = %err.code(), "parse failed: {err}"),
        }
        result
    }

    fn run<S, R>(
        &mut self,
        source: &mut S,
        reducer: &mut R,
        support: &mut ParserSupport<V>,
    ) -> Result<V, ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
        R: Reducer<V> + ?Sized,
    {
        let tables = self.tables;
        loop {
            let state = self.stack.top_state();
            let rule = match tables.default_reduction(state) {
                Some(rule) => rule,
                None => {
                    let token = self.lookahead(source)?;
                    if let Some(target) = tables.shift_target(state, token) {
                        let remaining = self.recovery.remaining();
                        self.hook(|t| t.shift(state, target, remaining));
                        self.push(target, source.value(), source.span());
                        self.lookahead = None;
                        self.recovery.shifted();
                        continue;
                    }
                    match tables.reduce_rule(state, token) {
                        Some(rule) => rule,
                        None => {
                            self.recover(token, source, support)?;
                            continue;
                        }
                    }
                }
            };

            if let Some(root) = self.reduce(rule, source, reducer, support)? {
                return Ok(root);
            }
        }
    }

    /// Pop the rule's frames, compute its value and take the goto.
    ///
    /// Returns the value when the reduction completes the input.
    fn reduce<S, R>(
        &mut self,
        rule: RuleId,
        source: &mut S,
        reducer: &mut R,
        support: &mut ParserSupport<V>,
    ) -> Result<Option<V>, ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
        R: Reducer<V> + ?Sized,
    {
        let tables = self.tables;
        let unknown = || TableError::UnknownRule(rule.raw());
        let len = tables.rule_len(rule).ok_or_else(unknown)?;
        let lhs = tables.rule_lhs(rule).ok_or_else(unknown)?;

        let from = self.stack.top_state();
        let depth = self.stack.depth();
        let (values, spans) = self.stack.take(len).ok_or(TableError::StackUnderflow {
            rule: rule.raw(),
            len,
            depth,
        })?;
        let under = self.stack.top_state();
        self.hook(|t| t.reduce(from, under, rule, tables.rule_text(rule), len));

        let span = match (spans.first(), spans.last()) {
            (Some(first), Some(last)) => first.merge(*last),
            _ => Span::point(self.stack.end_offset()),
        };
        let production = Production::new(values, spans, span, self.stack.top_value());
        let value = reducer.reduce(rule, production, support)?;

        if under == StateId::START && lhs == 0 {
            let accept = tables.final_state();
            self.hook(|t| t.shift(under, accept, 0));
            if self.lookahead(source)?.is_eof() {
                self.hook(|t| t.accept());
                return Ok(Some(value));
            }
            self.push(accept, value, span);
            return Ok(None);
        }

        let target = tables
            .goto(under, lhs)
            .ok_or(TableError::MissingGoto {
                state: under.raw(),
                nonterminal: lhs,
            })?;
        self.hook(|t| t.shift(under, target, 0));
        self.push(target, value, span);
        Ok(None)
    }

    /// Handle a token with no action in the current state.
    fn recover<S>(
        &mut self,
        token: TokenKind,
        source: &mut S,
        support: &mut ParserSupport<V>,
    ) -> Result<(), ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
    {
        let tables = self.tables;
        let state = self.stack.top_state();
        match self.recovery.tier() {
            Tier::Report => {
                let expected = tables.expected_names(state);
                let found = tables.token_name(token);
                debug!(?state, found, "syntax error");
                support.report_syntax_error("syntax error", found, &expected, source.span());
                self.hook(|t| t.error("syntax error", &expected));
                self.unwind(source)
            }
            Tier::Unwind => self.unwind(source),
            Tier::Discard => {
                if token.is_eof() {
                    self.hook(|t| t.reject());
                    return Err(SyntaxError::irrecoverable_at_eof(source.span()).into());
                }
                let name = tables.token_name(token);
                trace!(?state, name, "discard");
                self.hook(|t| t.discard(state, token, name));
                self.lookahead = None;
                Ok(())
            }
        }
    }

    /// Pop frames until one can shift `error`, then shift it.
    fn unwind<S>(&mut self, source: &mut S) -> Result<(), ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
    {
        let tables = self.tables;
        let error = tables.error_token();
        self.recovery.enter();
        loop {
            let state = self.stack.top_state();
            if let Some(target) = tables.shift_target(state, error) {
                debug!(?state, ?target, "recovered on error token");
                let remaining = self.recovery.remaining();
                self.hook(|t| t.shift(state, target, remaining));
                self.push(target, source.value(), source.span());
                return Ok(());
            }
            self.hook(|t| t.pop(state));
            if self.stack.pop().is_none() {
                self.hook(|t| t.reject());
                return Err(SyntaxError::irrecoverable(source.span()).into());
            }
        }
    }

    /// The buffered lookahead, reading one if needed.
    fn lookahead<S>(&mut self, source: &mut S) -> Result<TokenKind, ParseError>
    where
        S: TokenSource<Value = V> + ?Sized,
    {
        if let Some(token) = self.lookahead {
            return Ok(token);
        }
        let token = if source.advance()? {
            source.kind()
        } else {
            TokenKind::EOF
        };
        self.lookahead = Some(token);
        let tables = self.tables;
        let state = self.stack.top_state();
        let name = tables.token_name(token);
        self.hook(|t| t.lex(state, token, name));
        Ok(token)
    }

    fn push(&mut self, state: StateId, value: V, span: Span) {
        self.stack.push(state, value, span);
        let depth = self.stack.depth();
        self.hook(|t| t.push(state, depth));
    }

    #[inline]
    fn hook(&mut self, f: impl FnOnce(&mut dyn ParseTrace)) {
        if let Some(trace) = self.trace.as_deref_mut() {
            f(trace);
        }
    }
}
