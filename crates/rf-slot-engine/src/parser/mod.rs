//! Machine definition parser
//!
//! Loads [`MachineDef`] documents from JSON or YAML, applies size limits and
//! then full validation through [`MachineConfig::from_def`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = MachineParser::new();
//! let machine = parser.load_file("machines/classic.yaml")?;
//! ```

use std::path::{Path, PathBuf};

use crate::config::{MachineConfig, MachineDef, PaylinePreset, PaylineSource};
use crate::error::ConfigError;

/// Machine definition parser
pub struct MachineParser {
    /// Validation limits
    pub limits: MachineLimits,
}

/// Parsing limits for untrusted definitions
#[derive(Debug, Clone)]
pub struct MachineLimits {
    pub max_name_length: usize,
    pub max_symbols: usize,
    pub max_paylines: usize,
    pub max_reels: usize,
    pub max_rows: usize,
    pub max_payout_value: u32,
}

impl Default for MachineLimits {
    fn default() -> Self {
        Self {
            max_name_length: 256,
            max_symbols: 64,
            max_paylines: 100,
            max_reels: 10,
            max_rows: 10,
            max_payout_value: 1_000_000,
        }
    }
}

impl MachineParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            limits: MachineLimits::default(),
        }
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: MachineLimits) -> Self {
        Self { limits }
    }

    /// Parse a JSON definition
    pub fn parse_json(&self, json: &str) -> Result<MachineConfig, LoadError> {
        let def: MachineDef = serde_json::from_str(json)?;
        self.build(def)
    }

    /// Parse a YAML definition
    pub fn parse_yaml(&self, yaml: &str) -> Result<MachineConfig, LoadError> {
        let def: MachineDef = serde_yml::from_str(yaml)?;
        self.build(def)
    }

    /// Load a definition, picking the format from the file extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<MachineConfig, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        log::debug!("Loading machine definition from {}", path.display());
        match extension.as_str() {
            "json" => self.parse_json(&read()?),
            "yaml" | "yml" => self.parse_yaml(&read()?),
            _ => Err(LoadError::UnsupportedFormat(extension)),
        }
    }

    /// Check a definition against the limits
    pub fn validate(&self, def: &MachineDef) -> Result<(), LoadError> {
        let limits = &self.limits;

        if def.name.len() > limits.max_name_length {
            return Err(LoadError::Limit(format!(
                "Machine name too long: {} > {}",
                def.name.len(),
                limits.max_name_length
            )));
        }

        if def.grid.reels as usize > limits.max_reels {
            return Err(LoadError::Limit(format!(
                "Too many reels: {} > {}",
                def.grid.reels, limits.max_reels
            )));
        }

        if def.grid.rows as usize > limits.max_rows {
            return Err(LoadError::Limit(format!(
                "Too many rows: {} > {}",
                def.grid.rows, limits.max_rows
            )));
        }

        if def.symbols.len() > limits.max_symbols {
            return Err(LoadError::Limit(format!(
                "Too many symbols: {} > {}",
                def.symbols.len(),
                limits.max_symbols
            )));
        }

        if let Some(symbol) = def
            .symbols
            .iter()
            .find(|s| s.payout_value > limits.max_payout_value)
        {
            return Err(LoadError::Limit(format!(
                "Symbol {} payout value too high: {} > {}",
                symbol.id, symbol.payout_value, limits.max_payout_value
            )));
        }

        let paylines = match &def.paylines {
            PaylineSource::Preset(PaylinePreset::Standard25) => 25,
            PaylineSource::Preset(PaylinePreset::Straight) => def.grid.rows as usize,
            PaylineSource::Custom(lines) => lines.len(),
        };
        if paylines > limits.max_paylines {
            return Err(LoadError::Limit(format!(
                "Too many paylines: {} > {}",
                paylines, limits.max_paylines
            )));
        }

        Ok(())
    }

    fn build(&self, def: MachineDef) -> Result<MachineConfig, LoadError> {
        self.validate(&def)?;
        Ok(MachineConfig::from_def(def)?)
    }
}

impl Default for MachineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Machine loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Limit exceeded: {0}")]
    Limit(String),

    #[error("Invalid machine: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported definition format: '{0}' (expected json, yaml or yml)")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    const MINIMAL_JSON: &str = r#"{
        "name": "Test Machine",
        "symbols": [
            { "id": 0, "name": "W", "payout_value": 500, "weight": 3, "role": "wild" },
            { "id": 1, "name": "A", "payout_value": 100, "weight": 30 }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_json() {
        let machine = MachineParser::new().parse_json(MINIMAL_JSON).unwrap();

        assert_eq!(machine.name(), "Test Machine");
        assert_eq!(machine.currency(), "USD");
        assert_eq!(machine.reels(), 5);
        assert_eq!(machine.rows(), 3);
        assert_eq!(machine.paylines().len(), 25);
        assert_eq!(machine.min_bet_increment(), Money(1));
        assert_eq!(machine.pay_rules().tier_multipliers, vec![1, 5, 20]);
        assert!(machine.jackpot().is_none());
        assert_eq!(machine.symbols().wild_id(), Some(0));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
name: Yaml Machine
currency: EUR
grid:
  reels: 3
  rows: 1
symbols:
  - { id: 0, name: W, payout_value: 200, weight: 2, role: wild }
  - { id: 1, name: A, payout_value: 50, weight: 10, bonus_factor: 2 }
  - { id: 2, name: B, payout_value: 20, weight: 20, is_jackpot_symbol: true }
paylines: [[0, 0, 0]]
pay_rules:
  tier_multipliers: [2]
min_bet_increment: 5
jackpot:
  row: 0
target_rtp: 0.9
"#;
        let machine = MachineParser::new().parse_yaml(yaml).unwrap();

        assert_eq!(machine.currency(), "EUR");
        assert_eq!(machine.paylines().len(), 1);
        assert_eq!(machine.pay_rules().tier_multipliers, vec![2]);
        assert_eq!(machine.pay_rules().wild_bonus, 10);
        assert_eq!(machine.min_bet_increment(), Money(5));
        assert_eq!(machine.jackpot().map(|j| j.multiplier), Some(1000));
        assert_eq!(machine.symbols().jackpot_symbol().map(|s| s.id), Some(2));
        assert_eq!(machine.symbols().get(1).map(|s| s.bonus_factor), Some(2));
        assert_eq!(machine.target_rtp(), Some(0.9));
    }

    #[test]
    fn test_validation_limits() {
        let json = r#"{
            "name": "Too Wide",
            "grid": { "reels": 100, "rows": 3 },
            "symbols": [{ "id": 0, "name": "A", "payout_value": 1, "weight": 1 }]
        }"#;
        assert!(matches!(
            MachineParser::new().parse_json(json),
            Err(LoadError::Limit(_))
        ));

        let json = r#"{
            "name": "Rich",
            "symbols": [{ "id": 0, "name": "A", "payout_value": 2000000, "weight": 1 }]
        }"#;
        assert!(matches!(
            MachineParser::new().parse_json(json),
            Err(LoadError::Limit(_))
        ));
    }

    #[test]
    fn test_config_errors_surface() {
        let json = r#"{
            "name": "Twin Wilds",
            "symbols": [
                { "id": 0, "name": "W1", "payout_value": 1, "weight": 1, "role": "wild" },
                { "id": 1, "name": "W2", "payout_value": 1, "weight": 1, "role": "wild" }
            ]
        }"#;
        assert!(matches!(
            MachineParser::new().parse_json(json),
            Err(LoadError::Config(ConfigError::MultipleWilds { first: 0, second: 1 }))
        ));
    }

    #[test]
    fn test_malformed_input() {
        let parser = MachineParser::new();
        assert!(matches!(parser.parse_json("{"), Err(LoadError::Json(_))));
        assert!(matches!(
            parser.parse_yaml("name: [unterminated"),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            MachineParser::new().load_file("machine.toml"),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}
