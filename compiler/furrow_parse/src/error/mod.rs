//! Parser errors.
//!
//! Recoverable syntax errors become diagnostics and parsing continues; the
//! types here are what ends a parse.

use std::io;

use furrow_diagnostic::{Diagnostic, ErrorCode};
use furrow_ir::Span;
use furrow_scope::ScopeError;
use thiserror::Error;

/// Malformed or conflicting parse tables.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table has no {0} entries")]
    Empty(&'static str),

    #[error("`{what}` has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("state {0} is out of range")]
    StateOutOfRange(u32),

    #[error("rule {rule} has negative length {len}")]
    NegativeRuleLength { rule: usize, len: i32 },

    #[error("conflicting actions in state {state} on token {token}")]
    Conflict { state: u32, token: u16 },

    #[error("value {0} does not fit in a table entry")]
    TooLarge(usize),

    #[error("rule {0} cannot be reduced")]
    UnknownRule(u32),

    #[error("no goto from state {state} on nonterminal {nonterminal}")]
    MissingGoto { state: u32, nonterminal: u32 },

    #[error("reduction of rule {rule} needs {len} frames but the stack holds {depth}")]
    StackUnderflow { rule: u32, len: usize, depth: usize },
}

/// A syntax error that ended the parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Display name of the offending token, when there was one.
    pub found: Option<String>,
    /// Tokens that would have been accepted, by display name.
    pub expected: Vec<String>,
}

impl SyntaxError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        SyntaxError {
            code,
            message: message.into(),
            span,
            found: None,
            expected: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    #[must_use]
    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    /// Recovery popped every frame without finding an `error` shift.
    pub fn irrecoverable(span: Span) -> Self {
        SyntaxError::new(ErrorCode::E1002, "irrecoverable syntax error", span)
    }

    /// Recovery reached end of input while discarding tokens.
    pub fn irrecoverable_at_eof(span: Span) -> Self {
        SyntaxError::new(
            ErrorCode::E1003,
            "irrecoverable syntax error at end-of-file",
            span,
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(
                self.span,
                match &self.found {
                    Some(found) => format!("unexpected `{found}`"),
                    None => "here".to_string(),
                },
            );
        if !self.expected.is_empty() {
            diag = diag.with_note(format!("expected {}", format_expected(&self.expected)));
        }
        diag
    }
}

/// Everything that can end a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("token source failed: {0}")]
    Source(#[from] io::Error),

    #[error("malformed parse tables: {0}")]
    Tables(#[from] TableError),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Syntax(err) => err.code,
            ParseError::Source(_) => ErrorCode::E1004,
            ParseError::Tables(_) => ErrorCode::E9001,
            ParseError::Scope(_) => ErrorCode::E9002,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax(err) => Some(err.span),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Syntax(err) => err.to_diagnostic(),
            other => Diagnostic::error(other.code()).with_message(other.to_string()),
        }
    }
}

/// "`a`", "`a` or `b`", "`a`, `b`, or `c`".
pub fn format_expected(names: &[String]) -> String {
    match names {
        [] => "nothing".to_string(),
        [only] => format!("`{only}`"),
        [first, second] => format!("`{first}` or `{second}`"),
        [init @ .., last] => {
            let mut out = String::new();
            for name in init {
                out.push('`');
                out.push_str(name);
                out.push_str("`, ");
            }
            out.push_str("or `");
            out.push_str(last);
            out.push('`');
            out
        }
    }
}
