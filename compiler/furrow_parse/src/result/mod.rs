//! Output of a successful parse.

use furrow_diagnostic::Diagnostic;

/// An accepted parse.
///
/// Recoverable errors do not prevent acceptance; check
/// [`has_errors`](Self::has_errors) before trusting `root`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResult<V> {
    pub root: V,
    /// `BEGIN { ... }` bodies in source order.
    pub begin_blocks: Vec<V>,
    /// `END { ... }` bodies in source order.
    pub end_blocks: Vec<V>,
    /// Errors and warnings, sorted by position.
    pub diagnostics: Vec<Diagnostic>,
    /// Variables of the outermost writable scope, in slot order.
    pub top_variables: Vec<String>,
}

impl<V> ParseResult<V> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Transform the root and the BEGIN/END bodies.
    pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> ParseResult<U> {
        ParseResult {
            root: f(self.root),
            begin_blocks: self.begin_blocks.into_iter().map(&mut f).collect(),
            end_blocks: self.end_blocks.into_iter().map(&mut f).collect(),
            diagnostics: self.diagnostics,
            top_variables: self.top_variables,
        }
    }
}
