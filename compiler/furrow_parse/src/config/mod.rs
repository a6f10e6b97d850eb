//! Per-parse configuration.

use furrow_diagnostic::DiagnosticConfig;

/// Inputs that shape a parse without being interpreted by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Name shown in messages.
    pub file_name: String,
    /// Variables of the enclosing scope, in slot order.
    pub outer_variables: Vec<String>,
    /// Parse as an eval body: new variables go to an Eval scope above the
    /// outer variables.
    pub eval_parse: bool,
    /// Emit verbose-only warnings.
    pub verbose: bool,
    /// Forward engine events to `tracing`.
    pub debug: bool,
    /// Errors kept before the rest are dropped (0 = unlimited).
    pub error_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            file_name: "-".to_string(),
            outer_variables: Vec::new(),
            eval_parse: false,
            verbose: false,
            debug: false,
            error_limit: DiagnosticConfig::default().error_limit,
        }
    }
}

impl ParserConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        ParserConfig {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_outer_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outer_variables = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_eval_parse(mut self, eval_parse: bool) -> Self {
        self.eval_parse = eval_parse;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_error_limit(mut self, error_limit: usize) -> Self {
        self.error_limit = error_limit;
        self
    }

    pub fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: self.error_limit,
        }
    }
}
