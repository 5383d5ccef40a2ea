//! Machine configuration

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::jackpot::JackpotRule;
use crate::money::Money;
use crate::paytable::{PayRules, Payline, PaylineSet, standard_25_paylines};
use crate::symbols::{Symbol, SymbolTable};

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self { reels: 5, rows: 3 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }

    /// Middle row (upper middle for even row counts)
    pub fn middle_row(&self) -> usize {
        (self.rows.saturating_sub(1) / 2) as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Named payline layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaylinePreset {
    /// The 25 standard 5×3 lines
    #[serde(rename = "standard_25")]
    Standard25,
    /// One straight line per row
    Straight,
}

/// Payline source in a machine definition: a preset name or explicit rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaylineSource {
    Preset(PaylinePreset),
    Custom(Vec<Vec<u8>>),
}

impl Default for PaylineSource {
    fn default() -> Self {
        Self::Preset(PaylinePreset::Standard25)
    }
}

impl PaylineSource {
    /// Resolve into a validated payline set for `grid`
    pub fn resolve(&self, grid: GridSpec) -> ConfigResult<PaylineSet> {
        match self {
            Self::Preset(PaylinePreset::Standard25) => {
                PaylineSet::new(standard_25_paylines(), grid.reels as usize, grid.rows as usize)
            }
            Self::Preset(PaylinePreset::Straight) => {
                PaylineSet::straight_lines(grid.reels, grid.rows)
            }
            Self::Custom(rows) => {
                let lines = rows
                    .iter()
                    .enumerate()
                    .map(|(i, positions)| {
                        u8::try_from(i)
                            .map(|index| Payline::new(index, positions.clone()))
                            .map_err(|_| ConfigError::TooManyPaylines(rows.len()))
                    })
                    .collect::<ConfigResult<Vec<_>>>()?;
                PaylineSet::new(lines, grid.reels as usize, grid.rows as usize)
            }
        }
    }
}

/// Serializable machine definition
///
/// The loader's view of a machine. Nothing here is trusted until
/// [`MachineConfig::from_def`] has validated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDef {
    /// Machine name
    pub name: String,
    /// ISO currency code wagers and payouts are denominated in
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Grid specification
    #[serde(default)]
    pub grid: GridSpec,
    /// Symbol definitions
    pub symbols: Vec<Symbol>,
    /// Paylines
    #[serde(default)]
    pub paylines: PaylineSource,
    /// Tier multipliers, wild bonus and payout scale
    #[serde(default)]
    pub pay_rules: PayRules,
    /// Wagers must be a positive multiple of this
    #[serde(default = "default_bet_increment")]
    pub min_bet_increment: Money,
    /// Jackpot rule (None = no jackpot)
    #[serde(default)]
    pub jackpot: Option<JackpotRule>,
    /// RTP target (for reports, not enforced)
    #[serde(default)]
    pub target_rtp: Option<f64>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_bet_increment() -> Money {
    Money(1)
}

impl MachineDef {
    /// Classic 5×3, 25 lines, wild jackpot on the middle row
    pub fn classic_5x3() -> Self {
        let grid = GridSpec::standard_5x3();
        Self {
            name: "Classic 5x3".into(),
            currency: default_currency(),
            grid,
            symbols: vec![
                Symbol::wild(0, "WILD", 200, 3),
                Symbol::regular(1, "SEVEN", 100, 3).with_bonus(3),
                Symbol::regular(2, "BELL", 100, 5).with_bonus(2),
                Symbol::regular(3, "BAR", 80, 8),
                Symbol::regular(4, "CHERRY", 40, 12),
                Symbol::regular(5, "LEMON", 25, 16),
                Symbol::regular(6, "ORANGE", 20, 18),
                Symbol::regular(7, "PLUM", 15, 24),
            ],
            paylines: PaylineSource::Preset(PaylinePreset::Standard25),
            pay_rules: PayRules::default(),
            min_bet_increment: Money(100),
            jackpot: Some(JackpotRule::new(grid.middle_row(), 1000)),
            target_rtp: Some(0.9568),
        }
    }
}

/// Complete, validated machine configuration
///
/// Immutable once built and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineConfig {
    name: String,
    currency: String,
    grid: GridSpec,
    symbols: SymbolTable,
    paylines: PaylineSet,
    pay_rules: PayRules,
    min_bet_increment: Money,
    jackpot: Option<JackpotRule>,
    target_rtp: Option<f64>,
}

impl MachineConfig {
    /// Validate a definition
    pub fn from_def(def: MachineDef) -> ConfigResult<Self> {
        let grid = def.grid;
        if grid.reels == 0 || grid.rows == 0 {
            return Err(ConfigError::InvalidGrid {
                reels: grid.reels as usize,
                rows: grid.rows as usize,
            });
        }

        let symbols = SymbolTable::new(def.symbols)?;
        let paylines = def.paylines.resolve(grid)?;
        def.pay_rules.validate(grid.reels as usize)?;

        if !def.min_bet_increment.is_positive() {
            return Err(ConfigError::InvalidBetIncrement(def.min_bet_increment));
        }

        if let Some(ref jackpot) = def.jackpot {
            if jackpot.row >= grid.rows as usize {
                return Err(ConfigError::JackpotRowOutOfRange {
                    row: jackpot.row,
                    rows: grid.rows as usize,
                });
            }
            if jackpot.multiplier == 0 {
                return Err(ConfigError::ZeroJackpotMultiplier);
            }
            if symbols.jackpot_symbol().is_none() {
                return Err(ConfigError::MissingJackpotSymbol);
            }
        }

        log::info!(
            "Loaded machine '{}': {}×{}, {} symbols, {} paylines",
            def.name,
            grid.reels,
            grid.rows,
            symbols.len(),
            paylines.len()
        );

        Ok(Self {
            name: def.name,
            currency: def.currency,
            grid,
            symbols,
            paylines,
            pay_rules: def.pay_rules,
            min_bet_increment: def.min_bet_increment,
            jackpot: def.jackpot,
            target_rtp: def.target_rtp,
        })
    }

    /// Classic 5×3 preset
    pub fn classic_5x3() -> ConfigResult<Self> {
        Self::from_def(MachineDef::classic_5x3())
    }

    /// Export back to a serializable definition
    pub fn to_def(&self) -> MachineDef {
        MachineDef {
            name: self.name.clone(),
            currency: self.currency.clone(),
            grid: self.grid,
            symbols: self.symbols.symbols().to_vec(),
            paylines: PaylineSource::Custom(
                self.paylines.iter().map(|l| l.positions.clone()).collect(),
            ),
            pay_rules: self.pay_rules.clone(),
            min_bet_increment: self.min_bet_increment,
            jackpot: self.jackpot.clone(),
            target_rtp: self.target_rtp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn reels(&self) -> usize {
        self.grid.reels as usize
    }

    pub fn rows(&self) -> usize {
        self.grid.rows as usize
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn paylines(&self) -> &PaylineSet {
        &self.paylines
    }

    pub fn pay_rules(&self) -> &PayRules {
        &self.pay_rules
    }

    pub fn min_bet_increment(&self) -> Money {
        self.min_bet_increment
    }

    pub fn jackpot(&self) -> Option<&JackpotRule> {
        self.jackpot.as_ref()
    }

    pub fn target_rtp(&self) -> Option<f64> {
        self.target_rtp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_def() -> MachineDef {
        MachineDef {
            name: "Test".into(),
            currency: "EUR".into(),
            grid: GridSpec::standard_5x3(),
            symbols: vec![Symbol::wild(0, "W", 500, 3), Symbol::regular(1, "A", 100, 30)],
            paylines: PaylineSource::Custom(vec![vec![1, 1, 1, 1, 1]]),
            pay_rules: PayRules::default(),
            min_bet_increment: Money(10),
            jackpot: Some(JackpotRule::new(1, 1000)),
            target_rtp: None,
        }
    }

    #[test]
    fn test_grid_spec() {
        let grid = GridSpec::standard_5x3();
        assert_eq!(grid.total_positions(), 15);
        assert_eq!(grid.middle_row(), 1);
        assert_eq!(GridSpec { reels: 5, rows: 4 }.middle_row(), 1);
    }

    #[test]
    fn test_classic_preset_is_valid() {
        let config = MachineConfig::classic_5x3().unwrap();
        assert_eq!(config.paylines().len(), 25);
        assert_eq!(config.symbols().total_weight(), 89);
        assert_eq!(config.jackpot().map(|j| j.row), Some(1));
    }

    #[test]
    fn test_def_round_trip_through_config() {
        let config = MachineConfig::from_def(minimal_def()).unwrap();
        let again = MachineConfig::from_def(config.to_def()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let def = MachineDef {
            grid: GridSpec { reels: 0, rows: 3 },
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(def),
            Err(ConfigError::InvalidGrid { reels: 0, rows: 3 })
        );
    }

    #[test]
    fn test_rejects_bad_bet_increment() {
        let def = MachineDef {
            min_bet_increment: Money(0),
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(def),
            Err(ConfigError::InvalidBetIncrement(Money(0)))
        );
    }

    #[test]
    fn test_rejects_jackpot_without_symbol() {
        let def = MachineDef {
            symbols: vec![Symbol::regular(1, "A", 100, 30)],
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(def),
            Err(ConfigError::MissingJackpotSymbol)
        );

        let no_jackpot = MachineDef {
            symbols: vec![Symbol::regular(1, "A", 100, 30)],
            jackpot: None,
            ..minimal_def()
        };
        assert!(MachineConfig::from_def(no_jackpot).is_ok());
    }

    #[test]
    fn test_rejects_jackpot_row_out_of_range() {
        let def = MachineDef {
            jackpot: Some(JackpotRule::new(3, 1000)),
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(def),
            Err(ConfigError::JackpotRowOutOfRange { row: 3, rows: 3 })
        );
    }

    #[test]
    fn test_six_reels_need_extra_tier() {
        let def = MachineDef {
            grid: GridSpec { reels: 6, rows: 3 },
            paylines: PaylineSource::Preset(PaylinePreset::Straight),
            ..minimal_def()
        };
        assert_eq!(MachineConfig::from_def(def.clone()), Err(ConfigError::MissingTier(6)));

        let extended = MachineDef {
            pay_rules: PayRules {
                tier_multipliers: vec![1, 5, 20, 50],
                ..PayRules::default()
            },
            ..def
        };
        assert!(MachineConfig::from_def(extended).is_ok());
    }

    #[test]
    fn test_payline_indices_fit_u8() {
        let all_256 = MachineDef {
            paylines: PaylineSource::Custom(vec![vec![1, 1, 1, 1, 1]; 256]),
            ..minimal_def()
        };
        let config = MachineConfig::from_def(all_256).unwrap();
        let indices: Vec<u8> = config.paylines().iter().map(|l| l.index).collect();
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&255));

        let too_many = MachineDef {
            paylines: PaylineSource::Custom(vec![vec![1, 1, 1, 1, 1]; 300]),
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(too_many),
            Err(ConfigError::TooManyPaylines(300))
        );
    }

    #[test]
    fn test_rejects_reversed_tiers() {
        let def = MachineDef {
            pay_rules: PayRules {
                tier_multipliers: vec![20, 5, 1],
                ..PayRules::default()
            },
            ..minimal_def()
        };
        assert_eq!(
            MachineConfig::from_def(def),
            Err(ConfigError::NonIncreasingTier(4))
        );
    }

    #[test]
    fn test_standard_25_needs_5x3() {
        let def = MachineDef {
            grid: GridSpec { reels: 3, rows: 3 },
            paylines: PaylineSource::Preset(PaylinePreset::Standard25),
            ..minimal_def()
        };
        assert!(matches!(
            MachineConfig::from_def(def),
            Err(ConfigError::PaylineLength { .. })
        ));
    }
}
