//! Rules engine for turn-based duels.
//!
//! This crate provides:
//! - 3d6 skill checks with configurable critical bands
//! - Character builds with derived combat stats and a level table
//! - Fighters that resolve initiative, attacks, blocks, dodges and damage
//!
//! Everything is synchronous. Callers own sequencing, timing and display;
//! they pass a [`DiceSource`] into each action and read the results back.
//!
//! # Quick Start
//!
//! ```
//! use arena_core::{Character, CharacterAttributes, Fighter, LevelTable, Mitigation, RandomDice};
//!
//! let table = LevelTable::default();
//! let mut dice = RandomDice::seeded(7);
//!
//! let template = Character::new(CharacterAttributes::new(1, 4, 3, 2));
//! let attacker = Fighter::new(&template, &table);
//! let mut defender = Fighter::new(&template, &table);
//!
//! let attack = attacker.attack(&mut dice);
//! let block = defender.defend(&mut dice);
//! defender.lose_life(&attack, Mitigation::Block(block));
//!
//! assert!(defender.current_hp() <= defender.max_hp());
//! ```

pub mod character;
pub mod dice;
pub mod encounter;
pub mod fighter;
pub mod level;
pub mod roll;
pub mod testing;

// Primary public API
pub use character::{
    starter_moves, Character, CharacterAttributes, CharacterError, CharacterStats, Move,
    TemporaryModifiers, MAX_ATTRIBUTE,
};
pub use dice::{roll_die, roll_multiple, roll_sum, DiceSource, RandomDice};
pub use encounter::{
    resolve_exchange, roll_initiative, AttackKind, EncounterError, Exchange, InitiativeContest,
    Reaction, Side, MAX_INITIATIVE_REROLLS,
};
pub use fighter::{net_damage, Fighter, FighterId, FighterStats, HitOutcome, Mitigation};
pub use level::{LevelEntry, LevelTable, LevelTableError};
pub use roll::{classify, classify_total, AttackResult, DefenseResult, RollOutcome, Thresholds, Tier};
pub use testing::{DuelHarness, ScriptedDice};
