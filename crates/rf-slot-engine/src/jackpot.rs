//! Jackpot row detection

use serde::{Deserialize, Serialize};

use crate::error::SpinError;
use crate::money::Money;
use crate::sampler::ReelGrid;
use crate::symbols::SymbolTable;

/// Jackpot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotRule {
    /// Row checked on every reel
    pub row: usize,
    /// Wager multiple paid on a full row of the jackpot symbol
    #[serde(default = "default_jackpot_multiplier")]
    pub multiplier: u64,
}

fn default_jackpot_multiplier() -> u64 {
    1000
}

impl JackpotRule {
    pub fn new(row: usize, multiplier: u64) -> Self {
        Self { row, multiplier }
    }
}

/// Jackpot win info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotWin {
    pub row: usize,
    pub symbol_id: u32,
    pub amount: Money,
}

/// Check the jackpot row
///
/// Pays `wager * multiplier` when every reel shows the jackpot symbol on
/// `jackpot_row`. Independent of line evaluation: the row may also be a
/// payline and then pays both ways.
pub fn check(
    grid: &ReelGrid,
    jackpot_row: usize,
    table: &SymbolTable,
    wager: Money,
    multiplier: u64,
) -> Result<Option<Money>, SpinError> {
    let Some(jackpot) = table.jackpot_symbol() else {
        return Ok(None);
    };
    if grid.reels() == 0 {
        return Ok(None);
    }

    let full_row =
        (0..grid.reels()).all(|reel| grid.symbol_at(reel, jackpot_row) == Some(jackpot.id));
    if !full_row {
        return Ok(None);
    }

    wager
        .checked_mul(multiplier)
        .map(Some)
        .ok_or(SpinError::PayoutOverflow("jackpot"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            Symbol::wild(0, "W", 500, 3),
            Symbol::regular(1, "A", 100, 30),
        ])
        .unwrap()
    }

    #[test]
    fn test_full_wild_row_hits() {
        let grid = ReelGrid::from_columns(vec![vec![1, 0, 1]; 5]);
        assert_eq!(check(&grid, 1, &table(), Money(100), 1000), Ok(Some(Money(100_000))));
    }

    #[test]
    fn test_partial_row_misses() {
        let mut columns = vec![vec![1, 0, 1]; 5];
        columns[4][1] = 1;
        let grid = ReelGrid::from_columns(columns);
        assert_eq!(check(&grid, 1, &table(), Money(100), 1000), Ok(None));
        // Other rows never count
        assert_eq!(check(&grid, 0, &table(), Money(100), 1000), Ok(None));
    }

    #[test]
    fn test_flagged_jackpot_symbol() {
        let table = SymbolTable::new(vec![
            Symbol::wild(0, "W", 500, 3),
            Symbol::regular(7, "SEVEN", 300, 5).as_jackpot(),
        ])
        .unwrap();
        let wilds = ReelGrid::from_columns(vec![vec![0]; 3]);
        let sevens = ReelGrid::from_columns(vec![vec![7]; 3]);
        assert_eq!(check(&wilds, 0, &table, Money(10), 50), Ok(None));
        assert_eq!(check(&sevens, 0, &table, Money(10), 50), Ok(Some(Money(500))));
    }

    #[test]
    fn test_jackpot_overflow() {
        let grid = ReelGrid::from_columns(vec![vec![0]; 3]);
        assert_eq!(
            check(&grid, 0, &table(), Money(i64::MAX), 2),
            Err(SpinError::PayoutOverflow("jackpot"))
        );
    }
}
