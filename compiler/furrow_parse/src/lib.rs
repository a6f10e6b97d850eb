//! Table-driven LALR parsing for the Furrow front end.
//!
//! The engine runs generator-produced parse tables over a [`TokenSource`],
//! calling a [`Reducer`] for every reduction. Reductions get a
//! [`ParserSupport`] holding the scope chain and diagnostics, so variable
//! addresses are resolved while the tree is built.
//!
//! Syntax errors are recovered yacc-style through `error` productions in the
//! grammar; only irrecoverable ones end the parse.

mod config;
mod engine;
mod error;
mod production;
mod recovery;
mod result;
mod source;
mod stack;
mod support;
pub mod tables;
pub mod trace;

pub use config::ParserConfig;
pub use engine::Parser;
pub use error::{format_expected, ParseError, SyntaxError, TableError};
pub use production::{reducer_fn, FnReducer, Production, Reducer};
pub use recovery::RECOVERY_BUDGET;
pub use result::ParseResult;
pub use source::{TokenSource, VecTokenSource};
pub use stack::{ParseStack, INITIAL_CAPACITY};
pub use support::ParserSupport;
pub use tables::{ParseTables, RuleId, StateId, TableArrays, TableBuilder};
pub use trace::{ParseTrace, RecordingTrace, TraceEvent, TracingTrace};

use std::sync::Once;

use furrow_ir::SharedInterner;

/// Parse `source` to completion with a fresh parser and support context.
pub fn parse<V, S, R>(
    tables: &ParseTables,
    config: ParserConfig,
    interner: SharedInterner,
    source: &mut S,
    reducer: &mut R,
) -> Result<ParseResult<V>, ParseError>
where
    S: TokenSource<Value = V> + ?Sized,
    R: Reducer<V> + ?Sized,
{
    let mut parser = Parser::with_config(tables, &config);
    let mut support = ParserSupport::new(config, interner)?;
    let root = parser.parse(source, reducer, &mut support)?;
    Ok(support.finish(root))
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and leaves an already installed
/// global subscriber in place. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        // An embedding program may already own the global subscriber.
        if let Err(err) = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .try_init()
        {
            tracing::debug!(%err, "keeping the existing tracing subscriber");
        }
    });
}
