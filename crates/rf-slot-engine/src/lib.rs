//! # rf-slot-engine — Reel Slot Engine
//!
//! Evaluates spins of a weighted-reel, fixed-payline slot machine.
//! A spin is a pure function of `(config, wager, rng state)`, so any outcome
//! can be replayed from its seed.
//!
//! ## Features
//!
//! - **Weighted Sampling**: Prefix-sum symbol table, O(log n) per cell
//! - **Payline Evaluation**: Left-to-right runs with wild substitution
//! - **Jackpot Row**: Full row of the jackpot symbol pays a wager multiple
//! - **Integer Money**: Minor-unit payouts with checked arithmetic
//! - **Analysis**: Closed-form RTP and a parallel, seeded simulator
//! - **Loading**: JSON/YAML machine definitions with size limits
//!
//! ## Architecture
//!
//! ```text
//! MachineConfig (validated once)
//!     │
//!     ├── SymbolTable (weights, wild, jackpot symbol)
//!     ├── PaylineSet
//!     ├── PayRules (tiers, wild bonus, payout scale)
//!     └── JackpotRule
//!           │
//!           v
//! spin(config, wager, rng)
//!     validate wager → sample → evaluate lines → check jackpot
//!           │
//!           v
//!     SpinResult
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod jackpot;
pub mod money;
pub mod parser;
pub mod paytable;
pub mod rng;
pub mod sampler;
pub mod simulation;
pub mod spin;
pub mod symbols;

pub use analysis::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use jackpot::{JackpotRule, JackpotWin};
pub use money::*;
pub use parser::{LoadError, MachineLimits, MachineParser};
pub use paytable::*;
pub use rng::*;
pub use sampler::{ReelGrid, sample};
pub use simulation::*;
pub use spin::*;
pub use symbols::*;
