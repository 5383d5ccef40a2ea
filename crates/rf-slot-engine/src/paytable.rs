//! Paylines, pay rules and line evaluation

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SpinError};
use crate::money::Money;
use crate::sampler::ReelGrid;
use crate::symbols::SymbolTable;

/// Minimum run length that pays
pub const MIN_MATCH: usize = 3;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row positions for each reel (e.g., [1, 0, 0, 0, 1] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    pub fn new(index: u8, positions: Vec<u8>) -> Self {
        Self { index, positions }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(index: u8, row: u8, reel_count: u8) -> Self {
        Self {
            index,
            positions: vec![row; reel_count as usize],
        }
    }

    /// Row selected on `reel`
    pub fn row(&self, reel: usize) -> Option<usize> {
        self.positions.get(reel).map(|&r| r as usize)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Standard 25-line patterns for a 5×3 grid
pub fn standard_25_paylines() -> Vec<Payline> {
    const PATTERNS: [[u8; 5]; 25] = [
        // Straight lines
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [2, 2, 2, 2, 2],
        // V shapes
        [0, 1, 2, 1, 0],
        [2, 1, 0, 1, 2],
        // Zigzag
        [0, 0, 1, 2, 2],
        [2, 2, 1, 0, 0],
        [1, 0, 0, 0, 1],
        [1, 2, 2, 2, 1],
        // W shapes
        [0, 1, 0, 1, 0],
        [2, 1, 2, 1, 2],
        // Diagonal
        [0, 1, 1, 1, 0],
        [2, 1, 1, 1, 2],
        // Steps
        [1, 1, 0, 1, 1],
        [1, 1, 2, 1, 1],
        // Complex
        [0, 2, 0, 2, 0],
        [2, 0, 2, 0, 2],
        [1, 0, 1, 0, 1],
        [1, 2, 1, 2, 1],
        [0, 0, 2, 0, 0],
        [2, 2, 0, 2, 2],
        // Cups
        [0, 2, 2, 2, 0],
        [2, 0, 0, 0, 2],
        [1, 0, 2, 0, 1],
        [1, 2, 0, 2, 1],
    ];

    (0u8..)
        .zip(PATTERNS.iter())
        .map(|(i, p)| Payline::new(i, p.to_vec()))
        .collect()
}

/// Validated, immutable set of paylines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaylineSet {
    lines: Vec<Payline>,
}

impl PaylineSet {
    /// Validate every line against the grid shape
    pub fn new(lines: Vec<Payline>, reels: usize, rows: usize) -> ConfigResult<Self> {
        if lines.is_empty() {
            return Err(ConfigError::EmptyPaylines);
        }

        for (line_idx, line) in lines.iter().enumerate() {
            if line.len() != reels {
                return Err(ConfigError::PaylineLength {
                    line: line_idx,
                    len: line.len(),
                    reels,
                });
            }
            if let Some((reel, &row)) = line
                .positions
                .iter()
                .enumerate()
                .find(|&(_, &row)| row as usize >= rows)
            {
                return Err(ConfigError::PaylineRowOutOfRange {
                    line: line_idx,
                    reel,
                    row: row as usize,
                    rows,
                });
            }
        }

        Ok(Self { lines })
    }

    /// One straight line per row
    pub fn straight_lines(reels: u8, rows: u8) -> ConfigResult<Self> {
        let lines = (0..rows).map(|row| Payline::straight(row, row, reels)).collect();
        Self::new(lines, reels as usize, rows as usize)
    }

    pub fn lines(&self) -> &[Payline] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Payline> {
        self.lines.iter()
    }
}

/// Multiplier rules shared by every line of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayRules {
    /// Tier multiplier by run length; index 0 is a run of `MIN_MATCH`
    pub tier_multipliers: Vec<u32>,
    /// Extra factor when the anchor itself is wild
    pub wild_bonus: u32,
    /// Divisor normalizing symbol payout values to fractions of the wager
    pub payout_scale: u32,
}

impl Default for PayRules {
    fn default() -> Self {
        Self {
            tier_multipliers: vec![1, 5, 20],
            wild_bonus: 10,
            payout_scale: 100,
        }
    }
}

impl PayRules {
    /// Tier multiplier for a run, `None` below `MIN_MATCH` or past the table
    pub fn tier(&self, run_length: usize) -> Option<u32> {
        run_length
            .checked_sub(MIN_MATCH)
            .and_then(|idx| self.tier_multipliers.get(idx))
            .copied()
    }

    /// Check that every payable run on `reels` reels has a tier, and that
    /// tiers strictly increase with run length
    pub fn validate(&self, reels: usize) -> ConfigResult<()> {
        if self.payout_scale == 0 {
            return Err(ConfigError::ZeroPayoutScale);
        }
        if self.wild_bonus == 0 {
            return Err(ConfigError::ZeroWildBonus);
        }
        let mut previous = 0;
        for run in MIN_MATCH..=reels {
            match self.tier(run) {
                None => return Err(ConfigError::MissingTier(run)),
                Some(0) => return Err(ConfigError::ZeroTierMultiplier(run)),
                Some(tier) if tier <= previous => {
                    return Err(ConfigError::NonIncreasingTier(run));
                }
                Some(tier) => previous = tier,
            }
        }
        Ok(())
    }
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
    /// Payline index
    pub line_index: u8,
    /// Anchor symbol ID
    pub symbol_id: u32,
    /// Anchor symbol name
    pub symbol_name: String,
    /// Symbols of the matched run, left to right
    pub run: Vec<u32>,
    /// Positions of the run (reel, row)
    pub positions: Vec<(u8, u8)>,
    /// Wild positions included in the run
    pub wild_positions: Vec<(u8, u8)>,
    /// Tier multiplier times bonus factor
    pub multiplier: u64,
    /// Line payout
    pub payout: Money,
}

impl LineResult {
    /// Number of matching reels
    pub fn run_length(&self) -> usize {
        self.run.len()
    }

    /// Wild cells in the run
    pub fn wild_count(&self) -> usize {
        self.wild_positions.len()
    }
}

/// Evaluate a single payline
///
/// Returns `Ok(None)` when the run from reel 0 is shorter than `MIN_MATCH`.
/// Symbol ids missing from the table never match and never anchor.
pub fn evaluate_line(
    line: &Payline,
    grid: &ReelGrid,
    table: &SymbolTable,
    wager: Money,
    rules: &PayRules,
) -> Result<Option<LineResult>, SpinError> {
    if line.len() != grid.reels() {
        return Ok(None);
    }

    // Symbols on this line
    let line_symbols: Vec<Option<u32>> = (0..grid.reels())
        .map(|reel| line.row(reel).and_then(|row| grid.symbol_at(reel, row)))
        .collect();

    let wild_id = table.wild_id();
    let is_wild = |s: Option<u32>| s.is_some() && s == wild_id;

    // First non-wild symbol, or the wild itself for an all-wild line
    let Some(anchor_id) = line_symbols
        .iter()
        .copied()
        .find(|&s| !is_wild(s))
        .unwrap_or(wild_id)
    else {
        return Ok(None);
    };
    let Some(anchor) = table.get(anchor_id) else {
        return Ok(None);
    };

    // Count consecutive matches from the left
    let mut run = Vec::new();
    let mut positions = Vec::new();
    let mut wild_positions = Vec::new();

    for (reel, &symbol) in line_symbols.iter().enumerate() {
        if symbol != Some(anchor_id) && !is_wild(symbol) {
            break;
        }
        let Some(id) = symbol else { break };
        let cell = (reel as u8, line.positions[reel]);
        if is_wild(symbol) {
            wild_positions.push(cell);
        }
        positions.push(cell);
        run.push(id);
    }

    if run.len() < MIN_MATCH {
        return Ok(None);
    }
    let Some(tier) = rules.tier(run.len()) else {
        return Ok(None);
    };

    let bonus = if anchor.is_wild() {
        rules.wild_bonus
    } else {
        anchor.bonus_factor
    };
    let multiplier = u64::from(tier)
        .checked_mul(u64::from(bonus))
        .ok_or(SpinError::PayoutOverflow("line multiplier"))?;

    let numerator = u128::from(anchor.payout_value) * u128::from(multiplier);
    let payout = wager
        .checked_scale(numerator, u64::from(rules.payout_scale))
        .ok_or(SpinError::PayoutOverflow("line payout"))?;

    Ok(Some(LineResult {
        line_index: line.index,
        symbol_id: anchor.id,
        symbol_name: anchor.name.clone(),
        run,
        positions,
        wild_positions,
        multiplier,
        payout,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    const W: u32 = 0;
    const A: u32 = 1;
    const B: u32 = 2;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            Symbol::wild(W, "W", 500, 3),
            Symbol::regular(A, "A", 100, 30),
            Symbol::regular(B, "B", 40, 30).with_bonus(3),
        ])
        .unwrap()
    }

    /// 5×3 grid whose middle row is `middle`, other rows filled with `fill`
    fn grid_with_middle(middle: [u32; 5], fill: u32) -> ReelGrid {
        ReelGrid::from_columns(middle.iter().map(|&s| vec![fill, s, fill]).collect())
    }

    fn middle_line() -> Payline {
        Payline::straight(0, 1, 5)
    }

    #[test]
    fn test_payline_straight() {
        let line = Payline::straight(0, 1, 5);
        assert_eq!(line.positions, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_wild_substitution_example() {
        // [A, A, A, W, A]: run 5, anchor A, ×20 -> 100 * 100 * 20 / 100
        let grid = grid_with_middle([A, A, A, W, A], B);
        let win = evaluate_line(&middle_line(), &grid, &table(), Money(100), &PayRules::default())
            .unwrap()
            .unwrap();

        assert_eq!(win.symbol_id, A);
        assert_eq!(win.run_length(), 5);
        assert_eq!(win.multiplier, 20);
        assert_eq!(win.payout, Money(2000));
        assert_eq!(win.wild_positions, vec![(3, 1)]);
        assert_eq!(win.wild_count(), 1);
    }

    #[test]
    fn test_leading_wilds_take_first_non_wild_anchor() {
        let grid = grid_with_middle([W, W, A, A, B], B);
        let win = evaluate_line(&middle_line(), &grid, &table(), Money(100), &PayRules::default())
            .unwrap()
            .unwrap();
        assert_eq!(win.symbol_id, A);
        assert_eq!(win.run_length(), 4);
        assert_eq!(win.multiplier, 5);
    }

    #[test]
    fn test_short_runs_do_not_pay() {
        let rules = PayRules::default();
        for middle in [[A, B, A, A, A], [A, A, B, A, A], [B, A, A, A, A]] {
            let grid = grid_with_middle(middle, B);
            let result = evaluate_line(&middle_line(), &grid, &table(), Money(100), &rules);
            assert_eq!(result, Ok(None), "{middle:?}");
        }
    }

    #[test]
    fn test_all_wild_line() {
        let grid = grid_with_middle([W; 5], A);
        let win = evaluate_line(&middle_line(), &grid, &table(), Money(100), &PayRules::default())
            .unwrap()
            .unwrap();
        // 500 * 20 * 10 * 100 / 100
        assert_eq!(win.symbol_id, W);
        assert_eq!(win.multiplier, 200);
        assert_eq!(win.payout, Money(100_000));
    }

    #[test]
    fn test_premium_bonus_factor() {
        let grid = grid_with_middle([B, B, B, A, A], A);
        let win = evaluate_line(&middle_line(), &grid, &table(), Money(100), &PayRules::default())
            .unwrap()
            .unwrap();
        // tier 1 × bonus 3
        assert_eq!(win.multiplier, 3);
        assert_eq!(win.payout, Money(120));
    }

    #[test]
    fn test_unknown_symbol_breaks_run() {
        let grid = grid_with_middle([A, A, 99, A, A], A);
        let rules = PayRules::default();
        let result = evaluate_line(&middle_line(), &grid, &table(), Money(100), &rules);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_overflow_is_reported() {
        let rules = PayRules {
            tier_multipliers: vec![u32::MAX, u32::MAX, u32::MAX],
            wild_bonus: u32::MAX,
            payout_scale: 1,
        };
        let grid = grid_with_middle([W; 5], A);
        let result = evaluate_line(&middle_line(), &grid, &table(), Money(i64::MAX / 2), &rules);
        assert_eq!(result, Err(SpinError::PayoutOverflow("line payout")));
    }

    #[test]
    fn test_payline_set_validation() {
        assert_eq!(PaylineSet::new(vec![], 5, 3), Err(ConfigError::EmptyPaylines));
        assert_eq!(
            PaylineSet::new(vec![Payline::new(0, vec![1, 1, 1])], 5, 3),
            Err(ConfigError::PaylineLength { line: 0, len: 3, reels: 5 })
        );
        assert_eq!(
            PaylineSet::new(vec![Payline::new(0, vec![0, 1, 3, 1, 0])], 5, 3),
            Err(ConfigError::PaylineRowOutOfRange { line: 0, reel: 2, row: 3, rows: 3 })
        );
        assert_eq!(PaylineSet::new(standard_25_paylines(), 5, 3).unwrap().len(), 25);
    }

    #[test]
    fn test_standard_paylines_are_distinct() {
        let lines = standard_25_paylines();
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                assert_ne!(a.positions, b.positions);
            }
        }
    }

    #[test]
    fn test_pay_rules_tiers() {
        let rules = PayRules::default();
        assert_eq!(rules.tier(2), None);
        assert_eq!(rules.tier(3), Some(1));
        assert_eq!(rules.tier(5), Some(20));
        assert!(rules.validate(5).is_ok());
        assert_eq!(rules.validate(6), Err(ConfigError::MissingTier(6)));
    }

    #[test]
    fn test_rejects_non_increasing_tiers() {
        let reversed = PayRules {
            tier_multipliers: vec![20, 5, 1],
            ..PayRules::default()
        };
        assert_eq!(reversed.validate(5), Err(ConfigError::NonIncreasingTier(4)));

        let flat = PayRules {
            tier_multipliers: vec![1, 5, 5],
            ..PayRules::default()
        };
        assert_eq!(flat.validate(5), Err(ConfigError::NonIncreasingTier(5)));
        // Tiers past the reel count are never reached
        assert!(flat.validate(4).is_ok());
    }
}
