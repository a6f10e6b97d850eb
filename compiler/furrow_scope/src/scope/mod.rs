//! A single scope record.

use furrow_ir::Name;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::ScopeError;

/// Index of a scope in its [`ScopeChain`](crate::ScopeChain) arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The chain's root scope.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        ScopeId(index)
    }

    /// Position in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// Resolution boundary behaviour of a scope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    /// Opaque boundary: top level, class and method bodies.
    Local,
    /// Transparent boundary: closure bodies.
    Block,
    /// Transparent boundary for code evaluated inside an existing scope.
    Eval,
}

impl ScopeKind {
    /// Whether misses delegate to the enclosing scope.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        matches!(self, ScopeKind::Block | ScopeKind::Eval)
    }
}

/// One scope: its boundary kind, its parent and its variables in slot order.
#[derive(Clone, Debug)]
pub struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    /// Number of ancestors; bounds every depth reachable from here.
    level: u16,
    names: Vec<Name>,
    slots: FxHashMap<Name, u16>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, parent: Option<ScopeId>, level: u16) -> Self {
        Scope {
            kind,
            parent,
            level,
            names: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Boundary kind.
    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Enclosing scope, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Number of enclosing scopes.
    #[inline]
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Whether this is a block-like (transparent) scope.
    #[inline]
    pub fn is_block_scope(&self) -> bool {
        self.kind.is_transparent()
    }

    /// Variable names in slot order.
    #[inline]
    pub fn variables(&self) -> &[Name] {
        &self.names
    }

    /// Number of variables declared here.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slot of `name` in this scope only.
    #[inline]
    pub fn exists(&self, name: Name) -> Option<u16> {
        self.slots.get(&name).copied()
    }

    /// Name stored at `slot`.
    #[inline]
    pub fn name_at(&self, slot: u16) -> Option<Name> {
        self.names.get(usize::from(slot)).copied()
    }

    /// Add `name` to this scope, returning the existing slot if present.
    pub(crate) fn add(&mut self, id: ScopeId, name: Name) -> Result<u16, ScopeError> {
        if let Some(slot) = self.exists(name) {
            return Ok(slot);
        }
        let slot = u16::try_from(self.names.len()).map_err(|_| ScopeError::TooManyVariables {
            scope: id,
            max: usize::from(u16::MAX) + 1,
        })?;
        self.names.push(name);
        self.slots.insert(name, slot);
        Ok(slot)
    }
}
