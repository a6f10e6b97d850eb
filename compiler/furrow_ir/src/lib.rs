//! Furrow IR - shared vocabulary for the syntactic front end.
//!
//! This crate contains the small value types every other Furrow crate speaks:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Token kinds and tokens as produced by a token source
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become `Name(u32)`, compared in O(1)
//! - **Copy Small Things**: spans, names and token kinds are plain `Copy` values
//! - **Tables Are Numbers**: token kinds are the raw integers the table
//!   generator assigned, not a closed Rust enum

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;
mod token;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind};
