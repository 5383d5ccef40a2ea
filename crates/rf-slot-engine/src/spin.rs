//! Spin result

use serde::{Deserialize, Serialize};

use crate::error::SpinError;
use crate::jackpot::JackpotWin;
use crate::money::Money;
use crate::paytable::LineResult;
use crate::sampler::ReelGrid;

/// Complete spin result
///
/// The only output of a spin and the sole source of truth for the amount
/// the ledger credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Wager amount
    pub wager: Money,
    /// Currency of wager and payout
    pub currency: String,
    /// Final grid (reels × rows)
    pub grid: ReelGrid,
    /// Paying line wins
    pub line_results: Vec<LineResult>,
    /// Jackpot won
    pub jackpot: Option<JackpotWin>,
    /// Sum of line payouts plus jackpot amount
    pub total_payout: Money,
}

impl SpinResult {
    /// Create a result with no wins yet
    pub fn new(wager: Money, currency: impl Into<String>, grid: ReelGrid) -> Self {
        Self {
            wager,
            currency: currency.into(),
            grid,
            line_results: Vec::new(),
            jackpot: None,
            total_payout: Money::ZERO,
        }
    }

    /// Add a line win (non-paying results are dropped)
    pub fn add_line(&mut self, line: LineResult) -> Result<(), SpinError> {
        if !line.payout.is_positive() {
            return Ok(());
        }
        self.total_payout = self
            .total_payout
            .checked_add(line.payout)
            .ok_or(SpinError::PayoutOverflow("total payout"))?;
        self.line_results.push(line);
        Ok(())
    }

    /// Record the jackpot
    pub fn set_jackpot(&mut self, win: JackpotWin) -> Result<(), SpinError> {
        self.total_payout = self
            .total_payout
            .checked_add(win.amount)
            .ok_or(SpinError::PayoutOverflow("total payout"))?;
        self.jackpot = Some(win);
        Ok(())
    }

    /// Jackpot flag
    pub fn is_jackpot(&self) -> bool {
        self.jackpot.is_some()
    }

    /// Jackpot amount (zero when not triggered)
    pub fn jackpot_payout(&self) -> Money {
        self.jackpot.as_ref().map_or(Money::ZERO, |j| j.amount)
    }

    /// Check if this is a win
    pub fn is_win(&self) -> bool {
        self.total_payout.is_positive()
    }

    /// Sum of line payouts
    pub fn line_payout(&self) -> Money {
        Money(self.line_results.iter().map(|l| l.payout.minor_units()).sum())
    }

    /// Win-to-wager ratio, for display
    pub fn win_ratio(&self) -> f64 {
        self.total_payout.ratio_to(self.wager)
    }

    /// Longest paying run, 0 when nothing paid on lines
    pub fn best_run(&self) -> usize {
        self.line_results
            .iter()
            .map(LineResult::run_length)
            .max()
            .unwrap_or(0)
    }
}
