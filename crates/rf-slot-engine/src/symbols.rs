//! Symbol definitions and the weighted symbol table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Symbol role classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolRole {
    /// Regular paying symbol
    #[default]
    Regular = 0,
    /// Wild - substitutes for others
    Wild = 1,
    /// Scatter - flagged for presentation, evaluated on lines like a regular symbol
    Scatter = 2,
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g., "HP1", "LP3", "WILD")
    pub name: String,
    /// Base payout value, the multiplier unit for line pays
    pub payout_value: u32,
    /// Rarity weight (higher = more frequent, 0 = never drawn)
    pub weight: u32,
    /// Symbol role
    #[serde(default)]
    pub role: SymbolRole,
    /// Full jackpot-row occurrence triggers the jackpot
    #[serde(default)]
    pub is_jackpot_symbol: bool,
    /// Premium multiplier applied after the tier multiplier
    #[serde(default = "default_bonus_factor")]
    pub bonus_factor: u32,
}

fn default_bonus_factor() -> u32 {
    1
}

impl Symbol {
    /// Create a regular symbol
    pub fn regular(id: u32, name: impl Into<String>, payout_value: u32, weight: u32) -> Self {
        Self {
            id,
            name: name.into(),
            payout_value,
            weight,
            role: SymbolRole::Regular,
            is_jackpot_symbol: false,
            bonus_factor: 1,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: u32, name: impl Into<String>, payout_value: u32, weight: u32) -> Self {
        Self {
            role: SymbolRole::Wild,
            ..Self::regular(id, name, payout_value, weight)
        }
    }

    /// Create a scatter symbol
    pub fn scatter(id: u32, name: impl Into<String>, payout_value: u32, weight: u32) -> Self {
        Self {
            role: SymbolRole::Scatter,
            ..Self::regular(id, name, payout_value, weight)
        }
    }

    /// Set the premium bonus factor
    pub fn with_bonus(mut self, factor: u32) -> Self {
        self.bonus_factor = factor;
        self
    }

    /// Mark as the jackpot symbol
    pub fn as_jackpot(mut self) -> Self {
        self.is_jackpot_symbol = true;
        self
    }

    pub fn is_wild(&self) -> bool {
        self.role == SymbolRole::Wild
    }

    pub fn is_scatter(&self) -> bool {
        self.role == SymbolRole::Scatter
    }
}

/// Validated, immutable symbol table
///
/// Holds the prefix-sum weight table used by the reel sampler. Built once
/// when a machine loads and shared read-only by every spin.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    /// `cumulative[i]` = sum of weights of symbols `0..=i`
    cumulative: Vec<u64>,
    total_weight: u64,
    index_by_id: HashMap<u32, usize>,
    wild: Option<usize>,
    jackpot: Option<usize>,
}

impl SymbolTable {
    /// Validate symbols and build the table
    pub fn new(symbols: Vec<Symbol>) -> ConfigResult<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolTable);
        }

        let mut index_by_id = HashMap::with_capacity(symbols.len());
        let mut cumulative = Vec::with_capacity(symbols.len());
        let mut total_weight = 0u64;
        let mut wild: Option<usize> = None;
        let mut jackpot: Option<usize> = None;

        for (idx, symbol) in symbols.iter().enumerate() {
            if index_by_id.insert(symbol.id, idx).is_some() {
                return Err(ConfigError::DuplicateSymbol(symbol.id));
            }
            if symbol.payout_value == 0 {
                return Err(ConfigError::ZeroPayoutValue(symbol.id));
            }
            if symbol.bonus_factor == 0 {
                return Err(ConfigError::ZeroBonusFactor(symbol.id));
            }
            if symbol.is_wild() {
                if let Some(first) = wild {
                    return Err(ConfigError::MultipleWilds {
                        first: symbols[first].id,
                        second: symbol.id,
                    });
                }
                wild = Some(idx);
            }
            if symbol.is_jackpot_symbol {
                if let Some(first) = jackpot {
                    return Err(ConfigError::MultipleJackpotSymbols {
                        first: symbols[first].id,
                        second: symbol.id,
                    });
                }
                jackpot = Some(idx);
            }
            if symbol.weight == 0 {
                log::warn!(
                    "Symbol {} ({}) has zero weight and will never land",
                    symbol.id,
                    symbol.name
                );
            }

            total_weight += u64::from(symbol.weight);
            cumulative.push(total_weight);
        }

        if total_weight == 0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        Ok(Self {
            symbols,
            cumulative,
            total_weight,
            index_by_id,
            wild,
            jackpot,
        })
    }

    /// All symbols in configuration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Sampling denominator
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.index_by_id.get(&id).map(|&idx| &self.symbols[idx])
    }

    /// Wild symbol, if the table has one
    pub fn wild(&self) -> Option<&Symbol> {
        self.wild.map(|idx| &self.symbols[idx])
    }

    pub fn wild_id(&self) -> Option<u32> {
        self.wild().map(|s| s.id)
    }

    /// Is `id` the wild symbol?
    pub fn is_wild_id(&self, id: u32) -> bool {
        self.wild_id() == Some(id)
    }

    /// Jackpot symbol: the flagged one, otherwise the wild
    pub fn jackpot_symbol(&self) -> Option<&Symbol> {
        self.jackpot.or(self.wild).map(|idx| &self.symbols[idx])
    }

    /// Probability of drawing `id` in a single cell
    pub fn probability(&self, id: u32) -> f64 {
        self.get(id)
            .map(|s| f64::from(s.weight) / self.total_weight as f64)
            .unwrap_or(0.0)
    }

    /// Symbol selected by a draw in `[0, total_weight)`
    ///
    /// Binary search over the prefix sums: the first symbol whose cumulative
    /// weight exceeds `draw`. Zero-weight symbols share their predecessor's
    /// cumulative value and are never the first to exceed it.
    ///
    /// `draw` must be below [`total_weight`](Self::total_weight). Out-of-range
    /// draws panic in debug builds and resolve to the last symbol otherwise.
    pub fn symbol_for_draw(&self, draw: u64) -> &Symbol {
        debug_assert!(
            draw < self.total_weight,
            "draw {draw} outside 0..{}",
            self.total_weight
        );
        let idx = self.cumulative.partition_point(|&c| c <= draw);
        &self.symbols[idx.min(self.symbols.len() - 1)]
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}
