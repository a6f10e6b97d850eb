//! The scope chain.
//!
//! Scopes live in an arena indexed by [`ScopeId`]; each records its parent as
//! an id. `push` appends a record and makes it current, `pop` moves `current`
//! back to the parent. Popped records are kept, so values built from a scope
//! (e.g. a block node listing its variables) can still read them later.

use furrow_ir::Name;
use tracing::trace;

use crate::{Scope, ScopeError, ScopeId, ScopeKind, VarAddress};

/// Outcome of resolving an identifier for reading.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Resolution {
    /// A declared variable.
    Variable(VarAddress),
    /// No variable of that name is visible; the identifier is a
    /// zero-argument call on the implicit receiver.
    ImplicitSelfCall,
}

impl Resolution {
    /// The address, if this resolved to a variable.
    pub fn address(self) -> Option<VarAddress> {
        match self {
            Resolution::Variable(addr) => Some(addr),
            Resolution::ImplicitSelfCall => None,
        }
    }
}

/// Arena-backed chain of nested scopes.
#[derive(Clone, Debug)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
    current: ScopeId,
    /// Lowest scope `pop` may leave; scopes at or below it were seeded.
    base: ScopeId,
}

impl ScopeChain {
    /// Create a chain holding a single, empty Local root scope.
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![Scope::new(ScopeKind::Local, None, 0)],
            current: ScopeId::ROOT,
            base: ScopeId::ROOT,
        }
    }

    /// Create a chain whose root is pre-seeded with `names` in slot order.
    ///
    /// Used to parse a fragment inside a known enclosing scope.
    pub fn with_outer_variables<I>(names: I) -> Result<Self, ScopeError>
    where
        I: IntoIterator<Item = Name>,
    {
        let mut chain = Self::new();
        for name in names {
            chain.add_variable(name)?;
        }
        Ok(chain)
    }

    /// Create a chain for evaluating code inside a scope seeded with `names`.
    ///
    /// An Eval scope sits on top of the seeded root and becomes the base:
    /// new variables land in it, outer names resolve at depth 1.
    pub fn for_eval<I>(names: I) -> Result<Self, ScopeError>
    where
        I: IntoIterator<Item = Name>,
    {
        let mut chain = Self::with_outer_variables(names)?;
        chain.base = chain.push(ScopeKind::Eval)?;
        Ok(chain)
    }

    /// Drop every scope and start over with an empty root.
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        self.scopes[0] = Scope::new(ScopeKind::Local, None, 0);
        self.current = ScopeId::ROOT;
        self.base = ScopeId::ROOT;
    }

    /// Enter a new scope nested in the current one.
    pub fn push(&mut self, kind: ScopeKind) -> Result<ScopeId, ScopeError> {
        let parent = self.current;
        let level = self
            .scope(parent)
            .level()
            .checked_add(1)
            .ok_or(ScopeError::TooDeep {
                max: usize::from(u16::MAX),
            })?;
        let index = u32::try_from(self.scopes.len()).map_err(|_| ScopeError::TooDeep {
            max: usize::from(u16::MAX),
        })?;
        let id = ScopeId::from_index(index);
        self.scopes.push(Scope::new(kind, Some(parent), level));
        self.current = id;
        trace!(?id, ?kind, level, "push scope");
        Ok(id)
    }

    /// Leave the current scope, returning its id.
    ///
    /// Fails when the current scope is the chain's base: push and pop calls
    /// in the reduction actions are unbalanced.
    pub fn pop(&mut self) -> Result<ScopeId, ScopeError> {
        let popped = self.current;
        match self.scope(popped).parent() {
            Some(parent) if popped != self.base => {
                self.current = parent;
                trace!(id = ?popped, "pop scope");
                Ok(popped)
            }
            _ => Err(ScopeError::PopBase(popped)),
        }
    }

    /// The innermost scope.
    #[inline]
    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// The innermost scope's record.
    #[inline]
    pub fn current_scope(&self) -> &Scope {
        self.scope(self.current)
    }

    /// The outermost scope.
    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Record for `id`.
    ///
    /// Ids are only minted by this chain and records are never removed
    /// (except by [`reset`](Self::reset), which invalidates every id).
    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// Number of scopes between the current one and the root.
    #[inline]
    pub fn nesting(&self) -> u16 {
        self.current_scope().level()
    }

    /// Nearest Local scope at or above `id`.
    ///
    /// A transparent scope without a parent is its own boundary.
    pub fn local_scope_of(&self, id: ScopeId) -> ScopeId {
        let mut id = id;
        loop {
            let scope = self.scope(id);
            match scope.parent() {
                Some(parent) if scope.is_block_scope() => id = parent,
                _ => return id,
            }
        }
    }

    /// Slot of `name` in the current scope only.
    #[inline]
    pub fn exists(&self, name: Name) -> Option<u16> {
        self.current_scope().exists(name)
    }

    /// Register `name` in the current scope regardless of its kind.
    pub fn add_variable(&mut self, name: Name) -> Result<u16, ScopeError> {
        self.add_variable_in(self.current, name)
    }

    /// Register `name` in a specific scope.
    pub fn add_variable_in(&mut self, id: ScopeId, name: Name) -> Result<u16, ScopeError> {
        self.scopes[id.index()].add(id, name)
    }

    /// Register `name` in the nearest Local scope (parameter declarations).
    pub fn declare_local(&mut self, name: Name) -> Result<u16, ScopeError> {
        let owner = self.local_scope_of(self.current);
        self.add_variable_in(owner, name)
    }

    /// Find `name`, walking outward through transparent scopes.
    pub fn is_defined(&self, name: Name) -> Option<VarAddress> {
        self.find(name).map(|(_, addr)| addr)
    }

    /// Resolve `name` as an assignment target, declaring it if unseen.
    ///
    /// Returns the address and whether a new variable was created. New
    /// variables always land in the current scope, so a closure body gets
    /// its own block-local variable rather than one in the enclosing method.
    pub fn resolve_for_assignment(&mut self, name: Name) -> Result<(VarAddress, bool), ScopeError> {
        if let Some((_, addr)) = self.find(name) {
            return Ok((addr, false));
        }
        let slot = self.add_variable(name)?;
        Ok((VarAddress::new(0, slot), true))
    }

    /// Resolve `name` for reading; never declares.
    pub fn resolve_for_read(&self, name: Name) -> Resolution {
        match self.is_defined(name) {
            Some(addr) => Resolution::Variable(addr),
            None => Resolution::ImplicitSelfCall,
        }
    }

    /// Walk outward from the current scope, returning the owning scope and
    /// the address relative to the current scope.
    fn find(&self, name: Name) -> Option<(ScopeId, VarAddress)> {
        let mut id = self.current;
        let mut depth: u16 = 0;
        loop {
            let scope = self.scope(id);
            if let Some(slot) = scope.exists(name) {
                return Some((id, VarAddress::new(depth, slot)));
            }
            match scope.parent() {
                // depth never exceeds the starting scope's level (a u16)
                Some(parent) if scope.is_block_scope() => {
                    id = parent;
                    depth += 1;
                }
                _ => return None,
            }
        }
    }

    /// Iterate the chain from the current scope outward.
    pub fn ancestors(&self) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(self.current), |id| self.scope(*id).parent())
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}
