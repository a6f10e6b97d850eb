//! Parse tables.
//!
//! The engine consumes the comb-compressed array set produced by yacc-family
//! generators (jay/byacc layout):
//!
//! - `def_red[state]`: rule to reduce without looking at the lookahead, or 0
//! - `sindex[state]` / `rindex[state]`: row base of the state's shift/reduce
//!   entries inside `table`; 0 means the row is empty
//! - `gindex[nonterminal]`: row base of the goto entries for a nonterminal,
//!   keyed by the state underneath; `dgoto[nonterminal]` is the fallback
//! - `table[base + column]` holds the action, valid only when
//!   `check[base + column] == column`
//! - `lhs[rule]` / `len[rule]`: reduced nonterminal and right-hand side length
//!
//! Rule 0 is `$accept`, nonterminal 0 the start symbol and state 0 the start
//! state. Every out-of-range index reads as "no action".

mod builder;

pub use builder::TableBuilder;

use furrow_ir::TokenKind;
use std::fmt;

use crate::TableError;

/// An automaton state.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct StateId(u32);

impl StateId {
    /// The start state.
    pub const START: StateId = StateId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        StateId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column used for this state in goto rows.
    #[inline]
    fn column(self) -> Option<i32> {
        i32::try_from(self.0).ok()
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A grammar rule number.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RuleId(u32);

impl RuleId {
    /// The `$accept` rule.
    pub const ACCEPT: RuleId = RuleId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        RuleId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Raw generator output, exactly as emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableArrays {
    pub lhs: Vec<i32>,
    pub len: Vec<i32>,
    pub def_red: Vec<i32>,
    pub dgoto: Vec<i32>,
    pub sindex: Vec<i32>,
    pub rindex: Vec<i32>,
    pub gindex: Vec<i32>,
    pub table: Vec<i32>,
    pub check: Vec<i32>,
    /// Display names indexed by token kind; `None` for unused numbers.
    pub names: Vec<Option<String>>,
    /// Rule texts for tracing; empty or one per rule.
    pub rules: Vec<String>,
    pub final_state: u32,
    pub error_token: u16,
}

/// Validated, immutable parse tables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TableArrays", into = "TableArrays")
)]
pub struct ParseTables {
    arrays: TableArrays,
}

impl ParseTables {
    /// Validate generator output.
    pub fn new(arrays: TableArrays) -> Result<Self, TableError> {
        arrays.validate()?;
        Ok(ParseTables { arrays })
    }

    /// The raw arrays.
    pub fn arrays(&self) -> &TableArrays {
        &self.arrays
    }

    /// Number of automaton states.
    pub fn state_count(&self) -> usize {
        self.arrays.def_red.len()
    }

    /// Number of rules, including `$accept`.
    pub fn rule_count(&self) -> usize {
        self.arrays.len.len()
    }

    /// Number of nonterminals.
    pub fn nonterminal_count(&self) -> usize {
        self.arrays.dgoto.len()
    }

    /// State reached after the start symbol has been recognized.
    pub fn final_state(&self) -> StateId {
        StateId(self.arrays.final_state)
    }

    /// The `error` pseudo-token.
    pub fn error_token(&self) -> TokenKind {
        TokenKind::new(self.arrays.error_token)
    }

    /// Reduction to apply in `state` regardless of lookahead.
    pub fn default_reduction(&self, state: StateId) -> Option<RuleId> {
        let rule = *self.arrays.def_red.get(state.index())?;
        if rule == 0 {
            return None;
        }
        self.rule_id(rule)
    }

    /// Target state when shifting `token` in `state`.
    pub fn shift_target(&self, state: StateId, token: TokenKind) -> Option<StateId> {
        let base = *self.arrays.sindex.get(state.index())?;
        self.entry(base, token.index()).and_then(|s| self.state_id(s))
    }

    /// Rule to reduce when `token` is seen in `state`.
    pub fn reduce_rule(&self, state: StateId, token: TokenKind) -> Option<RuleId> {
        let base = *self.arrays.rindex.get(state.index())?;
        self.entry(base, token.index()).and_then(|r| self.rule_id(r))
    }

    /// State to enter after reducing to `nonterminal` with `state` on top.
    pub fn goto(&self, state: StateId, nonterminal: u32) -> Option<StateId> {
        let nt = usize::try_from(nonterminal).ok()?;
        let base = *self.arrays.gindex.get(nt)?;
        let target = match state.column().and_then(|col| self.entry(base, col)) {
            Some(target) => target,
            None => *self.arrays.dgoto.get(nt)?,
        };
        self.state_id(target)
    }

    /// Right-hand side length of `rule`.
    pub fn rule_len(&self, rule: RuleId) -> Option<usize> {
        let len = *self.arrays.len.get(rule.index())?;
        usize::try_from(len).ok()
    }

    /// Nonterminal produced by `rule`; `None` for `$accept`.
    pub fn rule_lhs(&self, rule: RuleId) -> Option<u32> {
        let lhs = *self.arrays.lhs.get(rule.index())?;
        u32::try_from(lhs).ok()
    }

    /// Rule text for tracing.
    pub fn rule_text(&self, rule: RuleId) -> &str {
        self.arrays
            .rules
            .get(rule.index())
            .map_or("", String::as_str)
    }

    /// Display name of a token kind.
    pub fn token_name(&self, kind: TokenKind) -> &str {
        match self.arrays.names.get(usize::from(kind.raw())) {
            None => "[illegal]",
            Some(None) => "[unknown]",
            Some(Some(name)) => name,
        }
    }

    /// Every token with a shift or reduce entry in `state`, in token order.
    ///
    /// Only used to build messages; parsing never consults it.
    pub fn expected_tokens(&self, state: StateId) -> Vec<TokenKind> {
        let names = &self.arrays.names;
        let mut ok = vec![false; names.len()];
        let rows = [&self.arrays.sindex, &self.arrays.rindex];
        for row in rows {
            let Some(&base) = row.get(state.index()) else {
                continue;
            };
            if base == 0 {
                continue;
            }
            let first = if base < 0 { base.unsigned_abs() as usize } else { 0 };
            for token in first..names.len() {
                let Ok(column) = i32::try_from(token) else {
                    break;
                };
                let Some(idx) = base.checked_add(column).and_then(|i| usize::try_from(i).ok())
                else {
                    continue;
                };
                if idx >= self.arrays.table.len() {
                    break;
                }
                if self.arrays.check[idx] == column && names[token].is_some() {
                    ok[token] = true;
                }
            }
        }

        let error = usize::from(self.arrays.error_token);
        ok.iter()
            .enumerate()
            .filter(|&(token, &hit)| hit && token != error)
            .filter_map(|(token, _)| u16::try_from(token).ok().map(TokenKind::new))
            .collect()
    }

    /// Display names of [`expected_tokens`](Self::expected_tokens).
    pub fn expected_names(&self, state: StateId) -> Vec<String> {
        self.expected_tokens(state)
            .into_iter()
            .map(|kind| self.token_name(kind).to_string())
            .collect()
    }

    fn entry(&self, base: i32, column: i32) -> Option<i32> {
        if base == 0 {
            return None;
        }
        let idx = usize::try_from(base.checked_add(column)?).ok()?;
        if *self.arrays.check.get(idx)? == column {
            self.arrays.table.get(idx).copied()
        } else {
            None
        }
    }

    fn state_id(&self, raw: i32) -> Option<StateId> {
        let raw = u32::try_from(raw).ok()?;
        ((raw as usize) < self.state_count()).then_some(StateId(raw))
    }

    fn rule_id(&self, raw: i32) -> Option<RuleId> {
        let raw = u32::try_from(raw).ok()?;
        ((raw as usize) < self.rule_count()).then_some(RuleId(raw))
    }
}

impl TryFrom<TableArrays> for ParseTables {
    type Error = TableError;

    fn try_from(arrays: TableArrays) -> Result<Self, Self::Error> {
        ParseTables::new(arrays)
    }
}

impl From<ParseTables> for TableArrays {
    fn from(tables: ParseTables) -> Self {
        tables.arrays
    }
}

impl TableArrays {
    /// Check that the arrays agree in length and reference valid states.
    pub fn validate(&self) -> Result<(), TableError> {
        fn same(what: &'static str, expected: usize, found: usize) -> Result<(), TableError> {
            if expected == found {
                Ok(())
            } else {
                Err(TableError::LengthMismatch {
                    what,
                    expected,
                    found,
                })
            }
        }

        let a = self;
        if a.len.is_empty() {
            return Err(TableError::Empty("rule"));
        }
        if a.def_red.is_empty() {
            return Err(TableError::Empty("state"));
        }
        same("lhs", a.len.len(), a.lhs.len())?;
        if !a.rules.is_empty() {
            same("rules", a.len.len(), a.rules.len())?;
        }
        same("sindex", a.def_red.len(), a.sindex.len())?;
        same("rindex", a.def_red.len(), a.rindex.len())?;
        same("gindex", a.dgoto.len(), a.gindex.len())?;
        same("check", a.table.len(), a.check.len())?;

        if a.final_state as usize >= a.def_red.len() {
            return Err(TableError::StateOutOfRange(a.final_state));
        }
        if let Some((rule, &len)) = a.len.iter().enumerate().find(|(_, len)| **len < 0) {
            return Err(TableError::NegativeRuleLength { rule, len });
        }
        Ok(())
    }
}
