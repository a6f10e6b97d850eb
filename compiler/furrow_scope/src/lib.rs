//! Lexical scope resolution for the Furrow front end.
//!
//! Scopes form a chain from the innermost body being parsed out to the
//! top-level scope. Each scope owns an ordered list of variable names; a
//! name's position in that list is its slot and never changes once assigned.
//! Resolved references are packed into a [`VarAddress`]: the number of
//! enclosing-scope hops (depth) in the high half and the slot in the low half.
//!
//! Two boundary behaviours exist:
//! - **Local** scopes (top level, class and method bodies) are opaque:
//!   resolution stops at them.
//! - **Block** and **Eval** scopes are transparent: a miss continues into the
//!   enclosing scope with depth + 1.
//!
//! The chain is an arena ([`ScopeChain`]) addressed by [`ScopeId`], so popped
//! scopes stay inspectable until the parse result is produced.

mod address;
mod chain;
mod error;
mod scope;

pub use address::VarAddress;
pub use chain::{Resolution, ScopeChain};
pub use error::ScopeError;
pub use scope::{Scope, ScopeId, ScopeKind};
