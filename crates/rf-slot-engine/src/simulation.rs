//! Batch spin simulator
//!
//! Spins are split into fixed-size chunks. Chunk `i` draws from stream `i`
//! of a `ChaCha8Rng` keyed by the seed, so the merged statistics depend only
//! on `(config, seed, spins, chunk_size)` and never on the thread count.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MachineConfig;
use crate::engine;
use crate::error::SpinError;
use crate::money::Money;
use crate::spin::SpinResult;

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of spins
    pub spins: u64,
    /// Wager per spin
    pub wager: Money,
    /// Base seed
    pub seed: u64,
    /// Spins per parallel chunk
    pub chunk_size: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spins: 1_000_000,
            wager: Money(100),
            seed: 0,
            chunk_size: 10_000,
        }
    }
}

/// Aggregated spin statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    /// Sum of wagers in minor units
    pub total_wagered: i128,
    /// Sum of payouts in minor units
    pub total_paid: i128,
    /// Part of `total_paid` from line wins
    pub line_paid: i128,
    /// Part of `total_paid` from jackpots
    pub jackpot_paid: i128,
    /// Paying lines across all spins
    pub line_wins: u64,
    /// Spins with a positive payout
    pub winning_spins: u64,
    pub jackpots: u64,
    pub max_win_ratio: f64,
    /// Paying lines by run length
    pub run_lengths: BTreeMap<usize, u64>,
}

impl SessionStats {
    /// Add one spin
    pub fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        self.total_wagered += i128::from(result.wager.minor_units());
        self.total_paid += i128::from(result.total_payout.minor_units());
        self.jackpot_paid += i128::from(result.jackpot_payout().minor_units());
        self.line_paid += result
            .line_results
            .iter()
            .map(|l| i128::from(l.payout.minor_units()))
            .sum::<i128>();
        self.line_wins += result.line_results.len() as u64;
        if result.is_win() {
            self.winning_spins += 1;
        }
        if result.is_jackpot() {
            self.jackpots += 1;
        }
        self.max_win_ratio = self.max_win_ratio.max(result.win_ratio());
        for line in &result.line_results {
            *self.run_lengths.entry(line.run_length()).or_default() += 1;
        }
    }

    /// Fold another set of statistics into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.total_wagered += other.total_wagered;
        self.total_paid += other.total_paid;
        self.line_paid += other.line_paid;
        self.jackpot_paid += other.jackpot_paid;
        self.line_wins += other.line_wins;
        self.winning_spins += other.winning_spins;
        self.jackpots += other.jackpots;
        self.max_win_ratio = self.max_win_ratio.max(other.max_win_ratio);
        for (&run, &count) in &other.run_lengths {
            *self.run_lengths.entry(run).or_default() += count;
        }
    }

    /// Paid / wagered (0.0 before the first spin)
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            self.total_paid as f64 / self.total_wagered as f64
        } else {
            0.0
        }
    }

    /// Line part of [`rtp`](Self::rtp)
    pub fn line_rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            self.line_paid as f64 / self.total_wagered as f64
        } else {
            0.0
        }
    }

    /// Fraction of spins with a positive payout
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.winning_spins as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }
}

/// Parallel simulator
pub struct Simulator<'a> {
    config: &'a MachineConfig,
    params: SimulationConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(config: &'a MachineConfig, params: SimulationConfig) -> Self {
        Self { config, params }
    }

    pub fn params(&self) -> &SimulationConfig {
        &self.params
    }

    /// Run every spin and merge the chunk statistics
    pub fn run(&self) -> Result<SessionStats, SpinError> {
        let SimulationConfig {
            spins,
            wager,
            seed,
            chunk_size,
        } = self.params;
        engine::validate_wager(self.config, wager)?;

        let chunk_size = chunk_size.max(1);
        let chunks = spins.div_ceil(chunk_size);

        let stats = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let count = chunk_size.min(spins - chunk * chunk_size);
                self.run_chunk(seed, chunk, count)
            })
            .try_reduce(SessionStats::default, |mut a, b| {
                a.merge(&b);
                Ok(a)
            })?;

        log::info!(
            "Simulated {} spins of '{}': RTP {:.4}, hit rate {:.4}, {} jackpots",
            stats.total_spins,
            self.config.name(),
            stats.rtp(),
            stats.hit_rate(),
            stats.jackpots
        );

        Ok(stats)
    }

    fn run_chunk(&self, seed: u64, chunk: u64, count: u64) -> Result<SessionStats, SpinError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(chunk);

        let mut stats = SessionStats::default();
        for _ in 0..count {
            let result = engine::spin(self.config, self.params.wager, &mut rng)?;
            stats.record(&result);
        }
        log::trace!("Chunk {chunk}: {count} spins, paid {}", stats.total_paid);
        Ok(stats)
    }
}
