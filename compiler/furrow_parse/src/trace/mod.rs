//! Engine trace hook.
//!
//! Every callback defaults to a no-op, so an implementation only overrides
//! what it cares about.

use std::sync::Arc;

use furrow_ir::TokenKind;
use parking_lot::Mutex;
use tracing::trace;

use crate::tables::{RuleId, StateId};

/// Observer of engine actions.
pub trait ParseTrace: Send {
    /// A frame was pushed; `depth` counts frames above the bottom one.
    fn push(&mut self, _state: StateId, _depth: usize) {}

    /// A lookahead token was read in `state`.
    fn lex(&mut self, _state: StateId, _token: TokenKind, _name: &str) {}

    /// A transition from `from` to `to`, on a token or after a reduction.
    /// `recovering` is the remaining error-recovery budget.
    fn shift(&mut self, _from: StateId, _to: StateId, _recovering: u8) {}

    /// `rule` is about to be reduced; `under` is the state uncovered by
    /// popping its `len` frames.
    fn reduce(&mut self, _from: StateId, _under: StateId, _rule: RuleId, _text: &str, _len: usize) {
    }

    /// Recovery popped a frame in `state`.
    fn pop(&mut self, _state: StateId) {}

    /// Recovery discarded the lookahead.
    fn discard(&mut self, _state: StateId, _token: TokenKind, _name: &str) {}

    /// A syntax error was reported.
    fn error(&mut self, _message: &str, _expected: &[String]) {}

    /// The parse failed irrecoverably.
    fn reject(&mut self) {}

    /// The parse succeeded.
    fn accept(&mut self) {}
}

/// Forwards every event to `tracing` at trace level.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingTrace;

impl ParseTrace for TracingTrace {
    fn push(&mut self, state: StateId, depth: usize) {
        trace!(?state, depth, "push");
    }

    fn lex(&mut self, state: StateId, token: TokenKind, name: &str) {
        trace!(?state, ?token, name, "lex");
    }

    fn shift(&mut self, from: StateId, to: StateId, recovering: u8) {
        trace!(?from, ?to, recovering, "shift");
    }

    fn reduce(&mut self, from: StateId, under: StateId, rule: RuleId, text: &str, len: usize) {
        trace!(?from, ?under, ?rule, text, len, "reduce");
    }

    fn pop(&mut self, state: StateId) {
        trace!(?state, "pop");
    }

    fn discard(&mut self, state: StateId, token: TokenKind, name: &str) {
        trace!(?state, ?token, name, "discard");
    }

    fn error(&mut self, message: &str, expected: &[String]) {
        trace!(message, ?expected, "error");
    }

    fn reject(&mut self) {
        trace!("reject");
    }

    fn accept(&mut self) {
        trace!("accept");
    }
}

/// A recorded engine action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    Push { state: StateId, depth: usize },
    Lex { state: StateId, token: TokenKind },
    Shift { from: StateId, to: StateId },
    Reduce { from: StateId, under: StateId, rule: RuleId, len: usize },
    Pop { state: StateId },
    Discard { state: StateId, token: TokenKind },
    Error { message: String },
    Reject,
    Accept,
}

/// Records events into a shared log.
///
/// Clones share the log, so a test can keep one handle and give the other
/// to the parser.
#[derive(Clone, Debug, Default)]
pub struct RecordingTrace {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    fn record(&self, event: TraceEvent) {
        self.events.lock().push(event);
    }
}

impl ParseTrace for RecordingTrace {
    fn push(&mut self, state: StateId, depth: usize) {
        self.record(TraceEvent::Push { state, depth });
    }

    fn lex(&mut self, state: StateId, token: TokenKind, _name: &str) {
        self.record(TraceEvent::Lex { state, token });
    }

    fn shift(&mut self, from: StateId, to: StateId, _recovering: u8) {
        self.record(TraceEvent::Shift { from, to });
    }

    fn reduce(&mut self, from: StateId, under: StateId, rule: RuleId, _text: &str, len: usize) {
        self.record(TraceEvent::Reduce {
            from,
            under,
            rule,
            len,
        });
    }

    fn pop(&mut self, state: StateId) {
        self.record(TraceEvent::Pop { state });
    }

    fn discard(&mut self, state: StateId, token: TokenKind, _name: &str) {
        self.record(TraceEvent::Discard { state, token });
    }

    fn error(&mut self, message: &str, _expected: &[String]) {
        self.record(TraceEvent::Error {
            message: message.to_string(),
        });
    }

    fn reject(&mut self) {
        self.record(TraceEvent::Reject);
    }

    fn accept(&mut self) {
        self.record(TraceEvent::Accept);
    }
}
