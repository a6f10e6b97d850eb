//! Error-recovery state.
//!
//! yacc-style recovery works on a budget of three shifted tokens:
//!
//! - With no error in progress, the error is reported, then the stack is
//!   unwound to a state that can shift `error`.
//! - Within the first shifts after that, a new error unwinds again without
//!   being reported.
//! - A new error before anything but `error` has been shifted discards the
//!   lookahead instead.
//!
//! Each ordinary shift spends one unit of the budget; at zero the engine is
//! back to normal.

/// Shifts needed to leave recovery.
pub const RECOVERY_BUDGET: u8 = 3;

/// What to do about a token with no action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Report, then unwind.
    Report,
    /// Unwind to a state that shifts `error`.
    Unwind,
    /// Drop the lookahead and retry.
    Discard,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Recovery {
    remaining: u8,
}

impl Recovery {
    #[inline]
    pub fn remaining(self) -> u8 {
        self.remaining
    }

    pub fn tier(self) -> Tier {
        match self.remaining {
            0 => Tier::Report,
            RECOVERY_BUDGET => Tier::Discard,
            _ => Tier::Unwind,
        }
    }

    /// Start (or restart) an error window.
    #[inline]
    pub fn enter(&mut self) {
        self.remaining = RECOVERY_BUDGET;
    }

    /// An ordinary token was shifted.
    #[inline]
    pub fn shifted(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[inline]
    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}
