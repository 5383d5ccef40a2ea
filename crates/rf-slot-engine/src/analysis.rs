//! Analytical RTP
//!
//! Every cell is an independent draw, so a payline's outcome distribution
//! depends only on symbol probabilities and the reel count, not on the
//! line's shape. With `p` the anchor probability, `w` the wild probability
//! and `n` reels:
//!
//! - `P(run = k, anchor = s) = ((p + w)^k - w^k) * (1 - p - w)` for `3 <= k < n`
//! - `P(run = n, anchor = s) = (p + w)^n - w^n`
//! - `P(all wild) = w^n`
//!
//! Floor rounding of individual payouts is ignored, so the figures are exact
//! whenever `wager * value * multiplier` divides by the payout scale.

use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::paytable::MIN_MATCH;

/// Expected return of one symbol, summed over all lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolContribution {
    pub symbol_id: u32,
    pub name: String,
    /// Probability of a single cell showing the symbol
    pub probability: f64,
    /// Probability a given line pays with this anchor
    pub line_hit_probability: f64,
    /// Return per unit wager across all lines
    pub rtp: f64,
}

/// RTP breakdown for a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtpReport {
    pub machine: String,
    pub reels: usize,
    pub paylines: usize,
    /// Return from line wins per unit wager
    pub line_rtp: f64,
    /// Return from the jackpot per unit wager
    pub jackpot_rtp: f64,
    /// `line_rtp + jackpot_rtp`
    pub total_rtp: f64,
    /// Probability that a single line pays
    pub line_hit_probability: f64,
    /// Probability of a jackpot per spin
    pub jackpot_probability: f64,
    pub symbols: Vec<SymbolContribution>,
    pub target_rtp: Option<f64>,
}

impl RtpReport {
    /// `total_rtp - target_rtp`
    pub fn deviation(&self) -> Option<f64> {
        self.target_rtp.map(|target| self.total_rtp - target)
    }
}

/// Closed-form RTP calculator
pub struct RtpAnalyzer<'a> {
    config: &'a MachineConfig,
    /// Allowed |total - target| before a warning is logged
    tolerance: f64,
}

impl<'a> RtpAnalyzer<'a> {
    pub fn new(config: &'a MachineConfig) -> Self {
        Self {
            config,
            tolerance: 0.01,
        }
    }

    /// Set the tolerance used when comparing with the target RTP
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn analyze(&self) -> RtpReport {
        let config = self.config;
        let table = config.symbols();
        let rules = config.pay_rules();
        let n = config.reels();
        let lines = config.paylines().len() as f64;
        let scale = rules.payout_scale as f64;

        let wild = table.wild();
        let w = wild.map_or(0.0, |s| table.probability(s.id));

        let mut symbols = Vec::with_capacity(table.len());
        let mut line_rtp = 0.0;
        let mut line_hit = 0.0;

        for symbol in table.symbols() {
            let p = table.probability(symbol.id);
            let (hit, ret) = if symbol.is_wild() {
                all_wild_line(w, n, symbol.payout_value, rules.tier(n), rules.wild_bonus)
            } else {
                let mut hit = 0.0;
                let mut ret = 0.0;
                for k in MIN_MATCH..=n {
                    let run = (p + w).powi(k as i32) - w.powi(k as i32);
                    let prob = if k < n { run * (1.0 - p - w) } else { run };
                    let mult = rules.tier(k).unwrap_or(0) as f64 * symbol.bonus_factor as f64;
                    hit += prob;
                    ret += prob * symbol.payout_value as f64 * mult;
                }
                (hit, ret)
            };

            let rtp = ret / scale * lines;
            line_rtp += rtp;
            line_hit += hit;
            symbols.push(SymbolContribution {
                symbol_id: symbol.id,
                name: symbol.name.clone(),
                probability: p,
                line_hit_probability: hit,
                rtp,
            });
        }

        let (jackpot_probability, jackpot_rtp) = match (config.jackpot(), table.jackpot_symbol()) {
            (Some(rule), Some(symbol)) => {
                let q = table.probability(symbol.id).powi(n as i32);
                (q, q * rule.multiplier as f64)
            }
            _ => (0.0, 0.0),
        };

        let report = RtpReport {
            machine: config.name().to_string(),
            reels: n,
            paylines: config.paylines().len(),
            line_rtp,
            jackpot_rtp,
            total_rtp: line_rtp + jackpot_rtp,
            line_hit_probability: line_hit,
            jackpot_probability,
            symbols,
            target_rtp: config.target_rtp(),
        };

        log::info!(
            "RTP '{}': total {:.4} (lines {:.4}, jackpot {:.4})",
            report.machine,
            report.total_rtp,
            report.line_rtp,
            report.jackpot_rtp
        );
        if let Some(deviation) = report.deviation() {
            if deviation.abs() > self.tolerance {
                log::warn!(
                    "RTP of '{}' is {:.4}, {:+.4} away from target",
                    report.machine,
                    report.total_rtp,
                    deviation
                );
            }
        }

        report
    }
}

/// Hit probability and expected scaled return of an all-wild line
fn all_wild_line(w: f64, n: usize, value: u32, tier: Option<u32>, wild_bonus: u32) -> (f64, f64) {
    match tier {
        Some(tier) if n >= MIN_MATCH => {
            let prob = w.powi(n as i32);
            (prob, prob * value as f64 * tier as f64 * wild_bonus as f64)
        }
        _ => (0.0, 0.0),
    }
}
