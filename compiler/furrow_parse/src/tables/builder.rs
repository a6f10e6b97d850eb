//! Programmatic construction of [`ParseTables`].
//!
//! Actions are given per state and packed into the same comb layout a
//! generator emits, so tables built here exercise exactly the lookups used
//! for generated ones.

use std::collections::BTreeMap;

use furrow_ir::TokenKind;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{ParseTables, RuleId, StateId, TableArrays};
use crate::TableError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Shift(u32),
    Reduce(u32),
}

#[derive(Clone, Debug)]
struct Rule {
    lhs: u32,
    len: u32,
    text: String,
}

/// Collects states, rules and gotos, then packs them.
#[derive(Clone, Debug)]
pub struct TableBuilder {
    names: BTreeMap<u16, String>,
    rules: Vec<Rule>,
    actions: BTreeMap<(u32, u16), Action>,
    defaults: BTreeMap<u32, u32>,
    gotos: BTreeMap<(u32, u32), u32>,
    final_state: u32,
    error_token: TokenKind,
    conflict: Option<TableError>,
}

impl TableBuilder {
    /// `$end` and `error` are named up front.
    pub fn new() -> Self {
        let mut names = BTreeMap::new();
        names.insert(TokenKind::EOF.raw(), "$end".to_string());
        names.insert(TokenKind::ERROR.raw(), "error".to_string());
        TableBuilder {
            names,
            rules: Vec::new(),
            actions: BTreeMap::new(),
            defaults: BTreeMap::new(),
            gotos: BTreeMap::new(),
            final_state: 1,
            error_token: TokenKind::ERROR,
            conflict: None,
        }
    }

    /// Name a token for messages.
    pub fn token(&mut self, kind: TokenKind, name: &str) -> &mut Self {
        self.names.insert(kind.raw(), name.to_string());
        self
    }

    /// Add `lhs -> (len symbols)` and return its number; rule 0 is reserved.
    pub fn rule(&mut self, lhs: u32, len: u32, text: &str) -> RuleId {
        self.rules.push(Rule {
            lhs,
            len,
            text: text.to_string(),
        });
        RuleId::new(u32::try_from(self.rules.len()).unwrap_or(u32::MAX))
    }

    pub fn shift(&mut self, state: u32, token: TokenKind, target: u32) -> &mut Self {
        self.action(state, token, Action::Shift(target))
    }

    pub fn reduce(&mut self, state: u32, token: TokenKind, rule: RuleId) -> &mut Self {
        self.action(state, token, Action::Reduce(rule.raw()))
    }

    pub fn default_reduce(&mut self, state: u32, rule: RuleId) -> &mut Self {
        self.defaults.insert(state, rule.raw());
        self
    }

    pub fn goto(&mut self, state: u32, nonterminal: u32, target: u32) -> &mut Self {
        self.gotos.insert((nonterminal, state), target);
        self
    }

    /// State entered once the start symbol is complete (default 1).
    pub fn final_state(&mut self, state: u32) -> &mut Self {
        self.final_state = state;
        self
    }

    pub fn error_token(&mut self, kind: TokenKind) -> &mut Self {
        self.names.remove(&self.error_token.raw());
        self.error_token = kind;
        self.names.insert(kind.raw(), "error".to_string());
        self
    }

    fn action(&mut self, state: u32, token: TokenKind, action: Action) -> &mut Self {
        match self.actions.get(&(state, token.raw())) {
            Some(&existing) if existing != action => {
                if self.conflict.is_none() {
                    self.conflict = Some(TableError::Conflict {
                        state,
                        token: token.raw(),
                    });
                }
            }
            _ => {
                self.actions.insert((state, token.raw()), action);
            }
        }
        self
    }

    /// Pack everything into validated tables.
    pub fn build(&self) -> Result<ParseTables, TableError> {
        if let Some(conflict) = &self.conflict {
            return Err(conflict.clone());
        }

        let state_count = self.state_count() as usize;
        let nonterminal_count = self.nonterminal_count() as usize;

        let mut lhs = vec![-1];
        let mut len = vec![2];
        let mut rules = vec!["$accept : start $end".to_string()];
        for rule in &self.rules {
            lhs.push(to_i32(rule.lhs)?);
            len.push(to_i32(rule.len)?);
            rules.push(rule.text.clone());
        }

        let mut def_red = vec![0; state_count];
        for (&state, &rule) in &self.defaults {
            def_red[state as usize] = to_i32(rule)?;
        }

        let mut shifts: Vec<Vec<(usize, i32)>> = vec![Vec::new(); state_count];
        let mut reduces: Vec<Vec<(usize, i32)>> = vec![Vec::new(); state_count];
        for (&(state, token), &action) in &self.actions {
            let column = usize::from(token);
            match action {
                Action::Shift(target) => shifts[state as usize].push((column, to_i32(target)?)),
                Action::Reduce(rule) => reduces[state as usize].push((column, to_i32(rule)?)),
            }
        }

        let mut dgoto = vec![0; nonterminal_count];
        let mut goto_rows: Vec<Vec<(usize, i32)>> = vec![Vec::new(); nonterminal_count];
        for nt in 0..nonterminal_count {
            let entries: Vec<(u32, u32)> = self
                .gotos
                .range((nt as u32, 0)..=(nt as u32, u32::MAX))
                .map(|(&(_, from), &to)| (from, to))
                .collect();
            let Some(default) = most_common_target(&entries) else {
                continue;
            };
            dgoto[nt] = to_i32(default)?;
            for (from, to) in entries {
                if to != default {
                    goto_rows[nt].push((from as usize, to_i32(to)?));
                }
            }
        }

        let mut packer = Packer::default();
        let sindex = shifts
            .iter()
            .map(|row| packer.place(row))
            .collect::<Result<Vec<_>, _>>()?;
        let rindex = reduces
            .iter()
            .map(|row| packer.place(row))
            .collect::<Result<Vec<_>, _>>()?;
        let gindex = goto_rows
            .iter()
            .map(|row| packer.place(row))
            .collect::<Result<Vec<_>, _>>()?;

        let max_token = self.names.keys().next_back().copied().unwrap_or(0);
        let mut names = vec![None; usize::from(max_token) + 1];
        for (&kind, name) in &self.names {
            names[usize::from(kind)] = Some(name.clone());
        }

        tracing::debug!(
            states = state_count,
            rules = len.len(),
            table = packer.table.len(),
            "packed parse tables"
        );

        ParseTables::new(TableArrays {
            lhs,
            len,
            def_red,
            dgoto,
            sindex,
            rindex,
            gindex,
            table: packer.table,
            check: packer.check,
            names,
            rules,
            final_state: self.final_state,
            error_token: self.error_token.raw(),
        })
    }

    fn state_count(&self) -> u32 {
        let from_actions = self.actions.iter().flat_map(|(&(state, _), action)| {
            let target = match *action {
                Action::Shift(target) => target,
                Action::Reduce(_) => 0,
            };
            [state, target]
        });
        let from_gotos = self.gotos.iter().flat_map(|(&(_, from), &to)| [from, to]);
        from_actions
            .chain(from_gotos)
            .chain(self.defaults.keys().copied())
            .chain([StateId::START.raw(), self.final_state])
            .max()
            .unwrap_or(0)
            + 1
    }

    fn nonterminal_count(&self) -> u32 {
        self.rules
            .iter()
            .map(|rule| rule.lhs)
            .chain(self.gotos.keys().map(|&(nt, _)| nt))
            .max()
            .map_or(1, |max| max + 1)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Ties go to the lowest state number.
fn most_common_target(entries: &[(u32, u32)]) -> Option<u32> {
    let mut counts: FxHashMap<u32, usize> = FxHashMap::default();
    for &(_, to) in entries {
        *counts.entry(to).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(to, _)| to)
}

fn to_i32(value: u32) -> Result<i32, TableError> {
    i32::try_from(value).map_err(|_| TableError::TooLarge(value as usize))
}

/// First-fit comb packing. Every non-empty row gets a distinct positive base
/// so that two rows never alias through a shared base.
#[derive(Default)]
struct Packer {
    table: Vec<i32>,
    check: Vec<i32>,
    bases: FxHashSet<usize>,
}

impl Packer {
    fn place(&mut self, row: &[(usize, i32)]) -> Result<i32, TableError> {
        if row.is_empty() {
            return Ok(0);
        }
        let mut base = 1;
        while self.bases.contains(&base) || !row.iter().all(|&(col, _)| self.is_free(base + col)) {
            base += 1;
        }
        for &(col, value) in row {
            let idx = base + col;
            if idx >= self.table.len() {
                self.table.resize(idx + 1, 0);
                self.check.resize(idx + 1, -1);
            }
            self.table[idx] = value;
            self.check[idx] = i32::try_from(col).map_err(|_| TableError::TooLarge(col))?;
        }
        self.bases.insert(base);
        i32::try_from(base).map_err(|_| TableError::TooLarge(base))
    }

    fn is_free(&self, idx: usize) -> bool {
        self.check.get(idx).map_or(true, |&c| c == -1)
    }
}
