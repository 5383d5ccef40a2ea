//! Spin engine
//!
//! A spin is a pure function of `(config, wager, rng state)`: validate the
//! wager, sample a grid, evaluate every payline, check the jackpot row.

use rand::Rng;

use crate::config::MachineConfig;
use crate::error::SpinError;
use crate::jackpot::{self, JackpotWin};
use crate::money::Money;
use crate::paytable::evaluate_line;
use crate::sampler::{self, ReelGrid};
use crate::spin::SpinResult;

// ═══════════════════════════════════════════════════════════════════════════════
// WAGER VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Reject non-positive wagers and wagers off the bet increment
pub fn validate_wager(config: &MachineConfig, wager: Money) -> Result<(), SpinError> {
    let increment = config.min_bet_increment();
    if !wager.is_positive() || !wager.is_multiple_of(increment) {
        return Err(SpinError::InvalidWager { wager, increment });
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPIN
// ═══════════════════════════════════════════════════════════════════════════════

/// Execute one spin
///
/// The wager is checked before any draw, so a rejected spin leaves `rng`
/// untouched.
pub fn spin<R: Rng + ?Sized>(
    config: &MachineConfig,
    wager: Money,
    rng: &mut R,
) -> Result<SpinResult, SpinError> {
    validate_wager(config, wager)?;
    let grid = sampler::sample(config.symbols(), config.reels(), config.rows(), rng)?;
    score(config, wager, grid)
}

/// Evaluate a supplied grid (replay and verification)
///
/// Applies the same wager validation as [`spin`].
pub fn evaluate_grid(
    config: &MachineConfig,
    wager: Money,
    grid: ReelGrid,
) -> Result<SpinResult, SpinError> {
    validate_wager(config, wager)?;
    score(config, wager, grid)
}

fn score(config: &MachineConfig, wager: Money, grid: ReelGrid) -> Result<SpinResult, SpinError> {
    let table = config.symbols();
    let rules = config.pay_rules();

    let mut line_results = Vec::new();
    for line in config.paylines().iter() {
        if let Some(win) = evaluate_line(line, &grid, table, wager, rules)? {
            line_results.push(win);
        }
    }

    let jackpot = match config.jackpot() {
        Some(rule) => jackpot::check(&grid, rule.row, table, wager, rule.multiplier)?
            .zip(table.jackpot_symbol())
            .map(|(amount, symbol)| JackpotWin {
                row: rule.row,
                symbol_id: symbol.id,
                amount,
            }),
        None => None,
    };

    let mut result = SpinResult::new(wager, config.currency(), grid);
    for win in line_results {
        result.add_line(win)?;
    }
    if let Some(win) = jackpot {
        result.set_jackpot(win)?;
    }

    log::debug!(
        "Spin: wager={} lines={} jackpot={} payout={}",
        wager,
        result.line_results.len(),
        result.is_jackpot(),
        result.total_payout
    );

    Ok(result)
}
