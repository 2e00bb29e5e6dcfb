//! Level progression table.
//!
//! Each level names how many d6 a successful hit rolls for damage and a flat
//! modifier used both in skill checks and on top of damage. The table is
//! read-only configuration supplied by the surrounding application.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a level table.
#[derive(Debug, Error)]
pub enum LevelTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid level in table: {level}")]
    InvalidLevel { level: i32 },
}

/// One row of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelEntry {
    pub level: i32,
    /// Number of d6 rolled for damage.
    pub dice: u32,
    pub modifier: i32,
    /// Carried from the dataset; the damage floor is always `dice * 2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_min: Option<i32>,
}

impl LevelEntry {
    pub const fn new(level: i32, dice: u32, modifier: i32) -> Self {
        Self {
            level,
            dice,
            modifier,
            damage_min: None,
        }
    }

    /// Entry used for levels missing from the table.
    pub const fn fallback(level: i32) -> Self {
        Self::new(level, 1, 0)
    }
}

lazy_static::lazy_static! {
    /// Progression shipped with the engine.
    static ref DEFAULT_TABLE: LevelTable = LevelTable::new(vec![
        LevelEntry::new(1, 1, 0),
        LevelEntry::new(2, 1, 1),
        LevelEntry::new(3, 1, 2),
        LevelEntry::new(4, 2, 0),
        LevelEntry::new(5, 2, 1),
        LevelEntry::new(6, 2, 2),
        LevelEntry::new(7, 3, 0),
        LevelEntry::new(8, 3, 1),
        LevelEntry::new(9, 3, 2),
        LevelEntry::new(10, 4, 0),
    ]);
}

/// Level entries keyed by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LevelEntry>", into = "Vec<LevelEntry>")]
pub struct LevelTable {
    entries: Vec<LevelEntry>,
}

impl LevelTable {
    /// Build a table. A repeated level keeps its first entry.
    pub fn new(entries: impl IntoIterator<Item = LevelEntry>) -> Self {
        let mut kept: Vec<LevelEntry> = Vec::new();
        for entry in entries {
            if kept.iter().any(|e| e.level == entry.level) {
                tracing::warn!(level = entry.level, "duplicate level entry ignored");
                continue;
            }
            kept.push(entry);
        }
        kept.sort_by_key(|e| e.level);
        Self { entries: kept }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a JSON array of entries (`[{"level": 1, "dice": 1, "modifier": 0}, ...]`).
    pub fn from_json_str(json: &str) -> Result<Self, LevelTableError> {
        let entries: Vec<LevelEntry> = serde_json::from_str(json)?;
        if let Some(bad) = entries.iter().find(|e| e.level < 1) {
            return Err(LevelTableError::InvalidLevel { level: bad.level });
        }
        Ok(Self::new(entries))
    }

    /// Load a JSON table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelTableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn entry(&self, level: i32) -> Option<&LevelEntry> {
        self.entries
            .binary_search_by_key(&level, |e| e.level)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// The entry for `level`, or `{level, dice: 1, modifier: 0}`.
    pub fn entry_or_default(&self, level: i32) -> LevelEntry {
        self.entry(level)
            .copied()
            .unwrap_or_else(|| LevelEntry::fallback(level))
    }

    pub fn modifier_for(&self, level: i32) -> i32 {
        self.entry(level).map_or(0, |e| e.modifier)
    }

    pub fn damage_dice_for(&self, level: i32) -> u32 {
        self.entry(level).map_or(1, |e| e.dice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelEntry> {
        self.entries.iter()
    }
}

impl From<Vec<LevelEntry>> for LevelTable {
    fn from(entries: Vec<LevelEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<LevelTable> for Vec<LevelEntry> {
    fn from(table: LevelTable) -> Self {
        table.entries
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}
