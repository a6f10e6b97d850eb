//! Context threaded through every reduction.
//!
//! Reductions reach the scope chain, nesting counters and diagnostics
//! through [`ParserSupport`]; nothing is ambient.

use furrow_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use furrow_ir::{Name, SharedInterner, Span};
use furrow_scope::{Resolution, ScopeChain, ScopeId, ScopeKind, VarAddress};
use tracing::debug;

use crate::{ParseError, ParseResult, ParserConfig, SyntaxError};

pub struct ParserSupport<V> {
    config: ParserConfig,
    interner: SharedInterner,
    scopes: ScopeChain,
    diagnostics: DiagnosticQueue,
    in_def: bool,
    in_single: u32,
    begin_blocks: Vec<V>,
    end_blocks: Vec<V>,
}

impl<V> ParserSupport<V> {
    /// Build the context for one parse, seeding the outer scope from
    /// `config`.
    pub fn new(config: ParserConfig, interner: SharedInterner) -> Result<Self, ParseError> {
        let scopes = top_scopes(&config, &interner)?;
        let diagnostics = DiagnosticQueue::with_config(config.diagnostic_config());
        Ok(ParserSupport {
            config,
            interner,
            scopes,
            diagnostics,
            in_def: false,
            in_single: 0,
            begin_blocks: Vec::new(),
            end_blocks: Vec::new(),
        })
    }

    /// Clear everything a previous parse left behind.
    pub fn reset(&mut self) -> Result<(), ParseError> {
        self.scopes = top_scopes(&self.config, &self.interner)?;
        self.diagnostics.clear();
        self.in_def = false;
        self.in_single = 0;
        self.begin_blocks.clear();
        self.end_blocks.clear();
        Ok(())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // Scopes

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeChain {
        &mut self.scopes
    }

    pub fn current_scope(&self) -> ScopeId {
        self.scopes.current()
    }

    /// Enter a method, class or module body.
    pub fn push_local_scope(&mut self) -> Result<ScopeId, ParseError> {
        Ok(self.scopes.push(ScopeKind::Local)?)
    }

    /// Enter a closure body.
    pub fn push_block_scope(&mut self) -> Result<ScopeId, ParseError> {
        Ok(self.scopes.push(ScopeKind::Block)?)
    }

    pub fn push_eval_scope(&mut self) -> Result<ScopeId, ParseError> {
        Ok(self.scopes.push(ScopeKind::Eval)?)
    }

    pub fn pop_current_scope(&mut self) -> Result<ScopeId, ParseError> {
        Ok(self.scopes.pop()?)
    }

    // Variables

    /// Resolve an identifier in expression position.
    pub fn declare_identifier(&self, name: Name) -> Resolution {
        self.scopes.resolve_for_read(name)
    }

    /// Resolve an assignment target, declaring it in the current scope if
    /// nothing visible has that name.
    pub fn assignable(&mut self, name: Name) -> Result<(VarAddress, bool), ParseError> {
        Ok(self.scopes.resolve_for_assignment(name)?)
    }

    /// Register a parameter in the nearest Local scope.
    pub fn declare_local(&mut self, name: Name) -> Result<u16, ParseError> {
        Ok(self.scopes.declare_local(name)?)
    }

    /// Add an argument to the current scope.
    ///
    /// `_` may be repeated; later ones get the hidden names `_$0`, `_$1`, ...
    /// so each still owns a slot.
    pub fn arg_var(&mut self, name: Name) -> Result<u16, ParseError> {
        let mut name = name;
        if self.name_str(name) == "_" {
            let mut count = 0u32;
            while self.scopes.exists(name).is_some() {
                name = self.intern(&format!("_${count}"));
                count += 1;
            }
        }
        Ok(self.scopes.add_variable(name)?)
    }

    /// Check a new argument name against the current scope.
    ///
    /// Names starting with `_` are exempt. A name already in the current
    /// scope is a duplicated argument; in verbose mode a name visible from an
    /// enclosing scope draws a shadowing warning.
    pub fn shadowing_lvar(&mut self, name: Name, span: Span) -> Result<Name, ParseError> {
        let text = self.name_str(name);
        if text.starts_with('_') {
            return Ok(name);
        }
        if self.scopes.exists(name).is_some() {
            return Err(self.compile_error_with(ErrorCode::E2001, "duplicated argument name", span));
        }
        if self.config.verbose && self.scopes.current_scope().is_block_scope() {
            if let Some(addr) = self.scopes.is_defined(name) {
                if !addr.is_local() {
                    self.warning_with(
                        ErrorCode::W2001,
                        format!("shadowing outer local variable - {text}"),
                        span,
                    );
                }
            }
        }
        Ok(name)
    }

    /// Validate a formal argument name, then check it for shadowing.
    pub fn formal_argument(&mut self, name: Name, span: Span) -> Result<Name, ParseError> {
        let text = self.name_str(name);
        let kind = if text.starts_with("@@") {
            Some("a class variable")
        } else if text.starts_with('@') {
            Some("an instance variable")
        } else if text.starts_with('$') {
            Some("a global variable")
        } else if text.starts_with(|c: char| c.is_ascii_uppercase()) {
            Some("a constant")
        } else {
            None
        };
        if let Some(kind) = kind {
            return Err(self.compile_error_with(
                ErrorCode::E2002,
                format!("formal argument cannot be {kind}"),
                span,
            ));
        }
        self.shadowing_lvar(name, span)
    }

    /// Declare a block-local variable (`|;x|`).
    pub fn new_bv(&mut self, name: Name, span: Span) -> Result<u16, ParseError> {
        let name = self.formal_argument(name, span)?;
        self.arg_var(name)
    }

    // Nesting

    pub fn in_def(&self) -> bool {
        self.in_def
    }

    pub fn set_in_def(&mut self, in_def: bool) {
        self.in_def = in_def;
    }

    pub fn in_single(&self) -> bool {
        self.in_single > 0
    }

    pub fn in_single_count(&self) -> u32 {
        self.in_single
    }

    pub fn set_in_single(&mut self, in_single: u32) {
        self.in_single = in_single;
    }

    // Diagnostics

    /// Emit a warning.
    pub fn warn(&mut self, message: impl Into<String>, span: Span) {
        self.warning_with(ErrorCode::W1001, message, span);
    }

    /// Emit a warning only in verbose mode.
    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        if self.config.verbose {
            self.warn(message, span);
        }
    }

    /// Record a recoverable syntax error.
    pub fn report_syntax_error(
        &mut self,
        message: &str,
        found: &str,
        expected: &[String],
        span: Span,
    ) {
        let err = SyntaxError::new(ErrorCode::E1001, message, span)
            .with_found(found)
            .with_expected(expected.to_vec());
        if !self.diagnostics.add(err.to_diagnostic()) {
            debug!(%span, "syntax error dropped by the error limit");
        }
    }

    /// A fatal syntax error raised by a reduction; return it with `?`.
    pub fn yyerror(&self, message: impl Into<String>, span: Span) -> ParseError {
        SyntaxError::new(ErrorCode::E1001, message, span).into()
    }

    /// A fatal semantic error raised by a reduction.
    pub fn compile_error(&self, message: impl Into<String>, span: Span) -> ParseError {
        self.compile_error_with(ErrorCode::E2003, message, span)
    }

    fn compile_error_with(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> ParseError {
        SyntaxError::new(code, message, span).into()
    }

    fn warning_with(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let diag = Diagnostic::warning(code)
            .with_message(message)
            .with_label(span, "here")
            .with_note(format!("in {}", self.config.file_name));
        self.diagnostics.add(diag);
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors().is_some()
    }

    // Results

    pub fn add_begin_block(&mut self, block: V) {
        self.begin_blocks.push(block);
    }

    pub fn add_end_block(&mut self, block: V) {
        self.end_blocks.push(block);
    }

    /// Package the accepted root with everything accumulated on the side.
    ///
    /// Leaves the context drained; call [`reset`](Self::reset) before
    /// reusing it.
    pub fn finish(&mut self, root: V) -> ParseResult<V> {
        let top = self.scopes.current_scope();
        let top_variables = top
            .variables()
            .iter()
            .map(|&name| self.interner.lookup(name).to_string())
            .collect();
        ParseResult {
            root,
            begin_blocks: std::mem::take(&mut self.begin_blocks),
            end_blocks: std::mem::take(&mut self.end_blocks),
            diagnostics: self.diagnostics.flush(),
            top_variables,
        }
    }
}

fn top_scopes(config: &ParserConfig, interner: &SharedInterner) -> Result<ScopeChain, ParseError> {
    let names = config.outer_variables.iter().map(|n| interner.intern(n));
    let chain = if config.eval_parse {
        ScopeChain::for_eval(names)?
    } else {
        ScopeChain::with_outer_variables(names)?
    };
    Ok(chain)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
