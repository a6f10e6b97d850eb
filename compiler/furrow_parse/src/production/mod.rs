//! Reduction dispatch.

use furrow_ir::Span;
use smallvec::SmallVec;

use crate::tables::RuleId;
use crate::{ParseError, ParserSupport};

/// The right-hand side of a rule being reduced.
///
/// Owns the popped values, oldest first, and borrows the value of the frame
/// left on top of the stack (yacc's `$0`).
#[derive(Debug)]
pub struct Production<'a, V> {
    values: SmallVec<[V; 4]>,
    spans: SmallVec<[Span; 4]>,
    span: Span,
    below: Option<&'a V>,
}

impl<'a, V> Production<'a, V> {
    pub fn new(
        values: SmallVec<[V; 4]>,
        spans: SmallVec<[Span; 4]>,
        span: Span,
        below: Option<&'a V>,
    ) -> Self {
        Production {
            values,
            spans,
            span,
            below,
        }
    }

    /// Number of right-hand side symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Source range covered by the whole production.
    ///
    /// For an empty rule this is a point at the end of the previous frame.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Value of the `i`th symbol, from 0.
    pub fn get(&self, i: usize) -> Option<&V> {
        self.values.get(i)
    }

    pub fn span_of(&self, i: usize) -> Option<Span> {
        self.spans.get(i).copied()
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Value of the frame underneath the production.
    pub fn below(&self) -> Option<&'a V> {
        self.below
    }

    /// The default action: the first value.
    pub fn into_first(self) -> Option<V> {
        self.values.into_iter().next()
    }

    /// Like [`into_first`](Self::into_first), falling back to `V::default()`
    /// for empty rules.
    pub fn into_first_or_default(self) -> V
    where
        V: Default,
    {
        self.into_first().unwrap_or_default()
    }

    pub fn into_values(self) -> smallvec::IntoIter<[V; 4]> {
        self.values.into_iter()
    }

    /// Destructure a production of known length.
    pub fn into_array<const N: usize>(self) -> Option<[V; N]> {
        self.values.into_vec().try_into().ok()
    }
}

/// Computes the value of each reduced rule.
///
/// Called exactly once per reduction, before the goto. May push or pop
/// scopes and emit diagnostics through `support`; must not re-enter the
/// parser.
pub trait Reducer<V> {
    fn reduce(
        &mut self,
        rule: RuleId,
        production: Production<'_, V>,
        support: &mut ParserSupport<V>,
    ) -> Result<V, ParseError>;
}

impl<V, R: Reducer<V> + ?Sized> Reducer<V> for &mut R {
    fn reduce(
        &mut self,
        rule: RuleId,
        production: Production<'_, V>,
        support: &mut ParserSupport<V>,
    ) -> Result<V, ParseError> {
        (**self).reduce(rule, production, support)
    }
}

/// A [`Reducer`] backed by a closure.
#[derive(Clone, Copy, Debug)]
pub struct FnReducer<F>(F);

/// Wrap a closure as a [`Reducer`].
pub fn reducer_fn<V, F>(f: F) -> FnReducer<F>
where
    F: FnMut(RuleId, Production<'_, V>, &mut ParserSupport<V>) -> Result<V, ParseError>,
{
    FnReducer(f)
}

impl<V, F> Reducer<V> for FnReducer<F>
where
    F: FnMut(RuleId, Production<'_, V>, &mut ParserSupport<V>) -> Result<V, ParseError>,
{
    fn reduce(
        &mut self,
        rule: RuleId,
        production: Production<'_, V>,
        support: &mut ParserSupport<V>,
    ) -> Result<V, ParseError> {
        (self.0)(rule, production, support)
    }
}
