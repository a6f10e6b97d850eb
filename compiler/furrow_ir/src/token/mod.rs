//! Token kinds and tokens.
//!
//! Token kinds use the numbering of yacc-family table generators: kind `0`
//! is end-of-input, single characters are their own code point below 256,
//! and `256` is the reserved `error` pseudo-token. Named tokens follow.

use std::fmt;

use crate::Span;

/// A token kind as numbered by the table generator.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TokenKind(u16);

impl TokenKind {
    /// End of input.
    pub const EOF: TokenKind = TokenKind(0);

    /// The `error` pseudo-token shifted during recovery.
    pub const ERROR: TokenKind = TokenKind(256);

    /// Create a token kind from its table number.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        TokenKind(raw)
    }

    /// Token kind for a single-character token such as `;`.
    #[inline]
    pub const fn from_char(c: u8) -> Self {
        TokenKind(c as u16)
    }

    /// Raw table number.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Table number widened for index arithmetic.
    #[inline]
    pub const fn index(self) -> i32 {
        self.0 as i32
    }

    /// Check for end of input.
    #[inline]
    pub const fn is_eof(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TokenKind::EOF => write!(f, "TokenKind(EOF)"),
            TokenKind::ERROR => write!(f, "TokenKind(error)"),
            TokenKind(raw) => write!(f, "TokenKind({raw})"),
        }
    }
}

impl From<u16> for TokenKind {
    fn from(raw: u16) -> Self {
        TokenKind(raw)
    }
}

/// A classified token with its semantic payload.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token<V> {
    pub kind: TokenKind,
    pub value: V,
    pub span: Span,
}

impl<V> Token<V> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, value: V, span: Span) -> Self {
        Token { kind, value, span }
    }
}
