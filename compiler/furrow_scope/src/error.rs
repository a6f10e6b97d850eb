//! Scope chain errors.

use crate::ScopeId;

/// Misuse of the scope chain by reduction actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// `pop` was called with only the chain's base scope left.
    #[error("unbalanced scope pop: scope {0:?} is the base of the chain")]
    PopBase(ScopeId),

    /// A scope ran out of 16-bit slot numbers.
    #[error("scope {scope:?} already holds the maximum of {max} variables")]
    TooManyVariables { scope: ScopeId, max: usize },

    /// Nesting exceeded the 16-bit depth field of a variable address.
    #[error("scope nesting exceeds {max} levels")]
    TooDeep { max: usize },
}
