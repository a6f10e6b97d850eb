//! Token sources.
//!
//! The engine pulls tokens one at a time. Classification of the current
//! token must be stable until the next `advance`.

use std::io;

use furrow_ir::{Span, Token, TokenKind};

/// A lexer as seen by the engine.
pub trait TokenSource {
    /// Semantic payload carried by tokens.
    type Value;

    /// Move to the next token. `Ok(false)` means end of input.
    fn advance(&mut self) -> io::Result<bool>;

    /// Kind of the current token.
    fn kind(&self) -> TokenKind;

    /// Payload of the current token. Still called at end of input when the
    /// `error` token is shifted there.
    fn value(&self) -> Self::Value;

    /// Source range of the current token.
    fn span(&self) -> Span;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    type Value = S::Value;

    fn advance(&mut self) -> io::Result<bool> {
        (**self).advance()
    }

    fn kind(&self) -> TokenKind {
        (**self).kind()
    }

    fn value(&self) -> Self::Value {
        (**self).value()
    }

    fn span(&self) -> Span {
        (**self).span()
    }
}

/// In-memory token source.
///
/// At end of input the kind is `EOF`, the value is `V::default()` and the
/// span is a point at the end of the last token.
#[derive(Clone, Debug)]
pub struct VecTokenSource<V> {
    tokens: Vec<Token<V>>,
    /// Index of the current token; `None` before the first advance.
    pos: Option<usize>,
}

impl<V> VecTokenSource<V> {
    pub fn new(tokens: Vec<Token<V>>) -> Self {
        VecTokenSource { tokens, pos: None }
    }

    /// Rewind to before the first token.
    pub fn rewind(&mut self) {
        self.pos = None;
    }

    /// Tokens not yet reached by `advance`.
    pub fn remaining(&self) -> usize {
        match self.pos {
            None => self.tokens.len(),
            Some(pos) => self.tokens.len().saturating_sub(pos + 1),
        }
    }

    fn current(&self) -> Option<&Token<V>> {
        self.pos.and_then(|pos| self.tokens.get(pos))
    }
}

impl<V> FromIterator<Token<V>> for VecTokenSource<V> {
    fn from_iter<I: IntoIterator<Item = Token<V>>>(iter: I) -> Self {
        VecTokenSource::new(iter.into_iter().collect())
    }
}

impl<V: Clone + Default> TokenSource for VecTokenSource<V> {
    type Value = V;

    fn advance(&mut self) -> io::Result<bool> {
        let next = self.pos.map_or(0, |pos| pos + 1).min(self.tokens.len());
        self.pos = Some(next);
        Ok(next < self.tokens.len())
    }

    fn kind(&self) -> TokenKind {
        self.current().map_or(TokenKind::EOF, |t| t.kind)
    }

    fn value(&self) -> V {
        self.current().map(|t| t.value.clone()).unwrap_or_default()
    }

    fn span(&self) -> Span {
        match self.current() {
            Some(token) => token.span,
            None => self
                .tokens
                .last()
                .map_or(Span::DUMMY, |t| t.span.end_point()),
        }
    }
}
