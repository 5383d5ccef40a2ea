//! Reel grid and weighted reel sampling

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::symbols::SymbolTable;

/// Reel outcome, `reels × rows` symbol IDs stored per reel (`grid[reel][row]`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelGrid {
    columns: Vec<Vec<u32>>,
}

impl ReelGrid {
    /// Build from reel columns (each column lists rows top to bottom)
    pub fn from_columns(columns: Vec<Vec<u32>>) -> Self {
        Self { columns }
    }

    /// Number of reels
    pub fn reels(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (of the first reel)
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Symbol at (reel, row)
    pub fn symbol_at(&self, reel: usize, row: usize) -> Option<u32> {
        self.columns.get(reel).and_then(|c| c.get(row)).copied()
    }

    /// Symbols of one row across all reels
    pub fn row(&self, row: usize) -> Vec<Option<u32>> {
        self.columns.iter().map(|c| c.get(row).copied()).collect()
    }

    pub fn columns(&self) -> &[Vec<u32>] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Vec<u32>> {
        self.columns
    }
}

/// Draw a fresh grid
///
/// Each cell is drawn independently with probability `weight / total_weight`,
/// reel by reel, top row first. Only `rng` is mutated.
pub fn sample<R: Rng + ?Sized>(
    table: &SymbolTable,
    reels: usize,
    rows: usize,
    rng: &mut R,
) -> ConfigResult<ReelGrid> {
    if reels == 0 || rows == 0 {
        return Err(ConfigError::InvalidGrid { reels, rows });
    }
    let total = table.total_weight();
    if total == 0 {
        return Err(ConfigError::ZeroTotalWeight);
    }

    let columns = (0..reels)
        .map(|_| {
            (0..rows)
                .map(|_| table.symbol_for_draw(rng.random_range(0..total)).id)
                .collect()
        })
        .collect();

    Ok(ReelGrid { columns })
}
