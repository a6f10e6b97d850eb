//! Error codes for all front-end diagnostics.
//!
//! Format: E#### / W#### where the first digit indicates the phase:
//! - E1xxx: Parser (automaton) errors
//! - E2xxx: Semantic errors raised while reducing (scope, arguments)
//! - E9xxx: Internal errors (bad tables, unbalanced scopes)
//! - W1xxx / W2xxx: Parser and semantic warnings

use std::fmt;

/// Error codes for all front-end diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parser Errors (E1xxx)
    /// Syntax error; the parser attempts recovery
    E1001,
    /// Irrecoverable syntax error: recovery exhausted the state stack
    E1002,
    /// Irrecoverable syntax error at end-of-file
    E1003,
    /// Token source failure
    E1004,

    // Semantic Errors (E2xxx)
    /// Duplicated argument name
    E2001,
    /// Formal argument must be a local variable
    E2002,
    /// Generic compile error raised by a reduction action
    E2003,

    // Internal Errors (E9xxx)
    /// Malformed parse tables
    E9001,
    /// Unbalanced scope push/pop
    E9002,
    /// Too many errors
    E9003,

    // Parser Warnings (W1xxx)
    /// Generic parser warning
    W1001,

    // Semantic Warnings (W2xxx)
    /// Shadowing outer local variable
    W2001,
}

impl ErrorCode {
    /// All code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::E9003,
        ErrorCode::W1001,
        ErrorCode::W2001,
    ];

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
            ErrorCode::W1001 => "W1001",
            ErrorCode::W2001 => "W2001",
        }
    }

    /// Short description used by `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "syntax error",
            ErrorCode::E1002 => "irrecoverable syntax error",
            ErrorCode::E1003 => "irrecoverable syntax error at end-of-file",
            ErrorCode::E1004 => "token source failure",
            ErrorCode::E2001 => "duplicated argument name",
            ErrorCode::E2002 => "formal argument must be a local variable",
            ErrorCode::E2003 => "compile error",
            ErrorCode::E9001 => "malformed parse tables",
            ErrorCode::E9002 => "unbalanced scope push/pop",
            ErrorCode::E9003 => "too many errors",
            ErrorCode::W1001 => "parser warning",
            ErrorCode::W2001 => "shadowing outer local variable",
        }
    }

    /// Check if this is a parser (automaton) error.
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an internal error.
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Check if this is a warning code.
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
