//! Testing utilities.
//!
//! - `ScriptedDice` for deterministic rolls
//! - `DuelHarness` for scripted two-fighter scenarios
//! - Sample builds shared by tests

use crate::character::{Character, CharacterAttributes};
use crate::dice::DiceSource;
use crate::encounter::{
    resolve_exchange, roll_initiative, AttackKind, EncounterError, Exchange, InitiativeContest,
    Reaction,
};
use crate::fighter::Fighter;
use crate::level::LevelTable;

/// Dice that replay a fixed list of faces.
///
/// When the script runs out it starts again from the beginning. An empty
/// script always rolls 1. Either case counts as an overrun, so a test can
/// check it scripted enough faces.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    next: usize,
    rolls_made: usize,
    overruns: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            next: 0,
            rolls_made: 0,
            overruns: 0,
        }
    }

    /// Append faces to the script.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// Total faces handed out so far.
    pub fn rolls_made(&self) -> usize {
        self.rolls_made
    }

    /// Faces left before the script wraps.
    pub fn remaining(&self) -> usize {
        self.faces.len().saturating_sub(self.next)
    }

    /// Every scripted face has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.faces.len()
    }

    /// Faces handed out after the script ran out (wrapped or empty).
    pub fn overruns(&self) -> usize {
        self.overruns
    }

    /// Replay from the first face.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl DiceSource for ScriptedDice {
    fn roll_d6(&mut self) -> u32 {
        self.rolls_made += 1;
        if self.faces.is_empty() {
            self.overruns += 1;
            return 1;
        }
        if self.next >= self.faces.len() {
            self.overruns += 1;
            self.next = 0;
        }
        let face = self.faces[self.next];
        self.next += 1;
        face
    }
}

/// Level 1, strength 4, speed 3, resistance 2: 15 total life, attack skill 5.
pub fn sample_character() -> Character {
    Character::new(CharacterAttributes::new(1, 4, 3, 2))
}

/// Harness for scripted duels between two fighters.
pub struct DuelHarness {
    pub table: LevelTable,
    pub first: Fighter,
    pub second: Fighter,
    pub dice: ScriptedDice,
}

impl DuelHarness {
    /// Two copies of [`sample_character`] on the default table.
    pub fn new() -> Self {
        let template = sample_character();
        Self::with_characters(&template, &template)
    }

    pub fn with_characters(first: &Character, second: &Character) -> Self {
        let table = LevelTable::default();
        Self {
            first: Fighter::new(first, &table),
            second: Fighter::new(second, &table),
            table,
            dice: ScriptedDice::default(),
        }
    }

    /// Queue dice faces for the next rolls.
    pub fn script(&mut self, faces: impl IntoIterator<Item = u32>) -> &mut Self {
        self.dice.push(faces);
        self
    }

    /// Fails if the script keeps the two fighters tied; the default
    /// harness starts with no faces, so script some first.
    pub fn initiative(&mut self) -> Result<InitiativeContest, EncounterError> {
        roll_initiative(&self.first, &self.second, &mut self.dice)
    }

    /// The first fighter attacks the second.
    pub fn first_attacks(&mut self, kind: AttackKind, reaction: Reaction) -> Exchange {
        resolve_exchange(&self.first, &mut self.second, kind, reaction, &mut self.dice)
    }

    /// The second fighter attacks the first.
    pub fn second_attacks(&mut self, kind: AttackKind, reaction: Reaction) -> Exchange {
        resolve_exchange(&self.second, &mut self.first, kind, reaction, &mut self.dice)
    }

    /// Current life as `(first, second)`.
    pub fn hp(&self) -> (i32, i32) {
        (self.first.current_hp(), self.second.current_hp())
    }
}

impl Default for DuelHarness {
    fn default() -> Self {
        Self::new()
    }
}
