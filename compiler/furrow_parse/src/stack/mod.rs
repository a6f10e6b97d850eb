//! The parser stack.
//!
//! States, values and spans are kept in parallel vectors. The bottom frame
//! holds only the start state, so `states` is always one longer than
//! `values` and `spans`.

use furrow_ir::Span;
use smallvec::SmallVec;

use crate::tables::StateId;

/// Initial frame capacity; vectors double from here.
pub const INITIAL_CAPACITY: usize = 256;

/// Values and spans removed by a reduction.
pub(crate) type Popped<V> = (SmallVec<[V; 4]>, SmallVec<[Span; 4]>);

#[derive(Clone, Debug)]
pub struct ParseStack<V> {
    states: Vec<StateId>,
    values: Vec<V>,
    spans: Vec<Span>,
}

impl<V> ParseStack<V> {
    pub fn new() -> Self {
        let mut states = Vec::with_capacity(INITIAL_CAPACITY);
        states.push(StateId::START);
        ParseStack {
            states,
            values: Vec::with_capacity(INITIAL_CAPACITY),
            spans: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Back to a single start-state frame, keeping allocations.
    pub fn reset(&mut self) {
        self.states.truncate(1);
        if let Some(bottom) = self.states.first_mut() {
            *bottom = StateId::START;
        } else {
            self.states.push(StateId::START);
        }
        self.values.clear();
        self.spans.clear();
    }

    /// Number of frames above the bottom one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn top_state(&self) -> StateId {
        self.states.last().copied().unwrap_or(StateId::START)
    }

    #[inline]
    pub fn push(&mut self, state: StateId, value: V, span: Span) {
        self.states.push(state);
        self.values.push(value);
        self.spans.push(span);
    }

    /// Drop the top frame, returning the state now on top.
    ///
    /// `None` when only the bottom frame is left.
    pub fn pop(&mut self) -> Option<StateId> {
        if self.values.is_empty() {
            return None;
        }
        self.states.pop();
        self.values.pop();
        self.spans.pop();
        Some(self.top_state())
    }

    /// Remove the top `n` frames, oldest first.
    pub(crate) fn take(&mut self, n: usize) -> Option<Popped<V>> {
        let keep = self.values.len().checked_sub(n)?;
        let values = self.values.drain(keep..).collect();
        let spans = self.spans.drain(keep..).collect();
        self.states.truncate(keep + 1);
        Some((values, spans))
    }

    /// Value of the top frame, if any.
    #[inline]
    pub fn top_value(&self) -> Option<&V> {
        self.values.last()
    }

    /// End of the top frame's span, or 0 on an empty stack.
    pub fn end_offset(&self) -> u32 {
        self.spans.last().map_or(0, |s| s.end)
    }

    /// States from the bottom frame up.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn capacity(&self) -> usize {
        self.states.capacity()
    }
}

impl<V> Default for ParseStack<V> {
    fn default() -> Self {
        Self::new()
    }
}
