//! Error types for the slot engine

use thiserror::Error;

use crate::money::Money;

/// Machine configuration error
///
/// Raised while a machine definition is loaded. A machine that fails here
/// never accepts spins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Symbol table is empty")]
    EmptySymbolTable,

    #[error("Total symbol weight is zero")]
    ZeroTotalWeight,

    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(u32),

    #[error("Symbol {0} has zero payout value")]
    ZeroPayoutValue(u32),

    #[error("Symbol {0} has zero bonus factor")]
    ZeroBonusFactor(u32),

    #[error("More than one wild symbol ({first} and {second})")]
    MultipleWilds { first: u32, second: u32 },

    #[error("More than one jackpot symbol ({first} and {second})")]
    MultipleJackpotSymbols { first: u32, second: u32 },

    #[error("Jackpot enabled but no symbol is flagged as jackpot and there is no wild")]
    MissingJackpotSymbol,

    #[error("Invalid grid: {reels} reels × {rows} rows")]
    InvalidGrid { reels: usize, rows: usize },

    #[error("Payline set is empty")]
    EmptyPaylines,

    #[error("Too many paylines: {0} (at most 256)")]
    TooManyPaylines(usize),

    #[error("Payline {line} has {len} positions, expected {reels}")]
    PaylineLength { line: usize, len: usize, reels: usize },

    #[error("Payline {line} row {row} on reel {reel} is outside 0..{rows}")]
    PaylineRowOutOfRange {
        line: usize,
        reel: usize,
        row: usize,
        rows: usize,
    },

    #[error("No tier multiplier configured for a run of {0}")]
    MissingTier(usize),

    #[error("Tier multiplier for a run of {0} is zero")]
    ZeroTierMultiplier(usize),

    #[error("Tier multiplier for a run of {0} does not exceed the shorter run")]
    NonIncreasingTier(usize),

    #[error("Payout scale must be positive")]
    ZeroPayoutScale,

    #[error("Wild bonus factor must be positive")]
    ZeroWildBonus,

    #[error("Minimum bet increment must be positive, got {0}")]
    InvalidBetIncrement(Money),

    #[error("Jackpot row {row} is outside 0..{rows}")]
    JackpotRowOutOfRange { row: usize, rows: usize },

    #[error("Jackpot multiplier must be positive")]
    ZeroJackpotMultiplier,
}

/// Per-spin error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpinError {
    /// Wager is not positive or not a multiple of the bet increment.
    /// Nothing was sampled, the caller may retry.
    #[error("Invalid wager {wager}: must be positive and a multiple of {increment}")]
    InvalidWager { wager: Money, increment: Money },

    /// Payout arithmetic left the representable range
    #[error("Payout overflow while computing {0}")]
    PayoutOverflow(&'static str),

    /// Machine rejected at sampling time
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SpinError {
    /// Wager errors are safe to retry with a corrected wager
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidWager { .. })
    }
}

/// Result type alias for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;
