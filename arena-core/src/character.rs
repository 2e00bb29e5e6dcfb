//! Combatant builds.
//!
//! A [`Character`] holds three base attributes (strength, speed, resistance)
//! and a level. Combat skills and total life are derived from them and are
//! recomputed whenever the inputs change; they are never set by hand.

use crate::level::{LevelEntry, LevelTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Life granted on top of the derived formula for every character.
const BASE_LIFE: i32 = 10;

/// Below this fraction of total life a character is in critical condition.
const CRITICAL_LIFE_FRACTION: f64 = 0.25;

/// Largest magnitude accepted for any numeric descriptor field.
pub const MAX_ATTRIBUTE: i32 = 100_000;

/// Errors from reading a character descriptor.
#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid level: {0} (must be at least 1)")]
    InvalidLevel(i32),

    #[error("Negative {name}: {value}")]
    NegativeAttribute { name: &'static str, value: i32 },

    #[error("{name} out of range: {value} (limit {})", MAX_ATTRIBUTE)]
    AttributeTooLarge { name: &'static str, value: i32 },
}

/// `ceil(n / d)` for positive `d`.
pub(crate) fn ceil_div(n: i32, d: i32) -> i32 {
    n.div_euclid(d) + i32::from(n.rem_euclid(d) != 0)
}

/// `floor(n / d)` for positive `d`.
pub(crate) fn floor_div(n: i32, d: i32) -> i32 {
    n.div_euclid(d)
}

/// `current / total`, or 0 when there is no total.
pub(crate) fn life_fraction(current: i32, total: i32) -> f64 {
    if total > 0 {
        f64::from(current) / f64::from(total)
    } else {
        0.0
    }
}

/// A named move shown to the player. The rules engine never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub speed: String,
    pub damage: String,
    pub attribute: String,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        speed: impl Into<String>,
        damage: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            speed: speed.into(),
            damage: damage.into(),
            attribute: attribute.into(),
        }
    }
}

/// Moves every default character starts with.
pub fn starter_moves() -> Vec<Move> {
    vec![
        Move::new("Peck", "basic initiative - 2", "str - 2", "str"),
        Move::new("Spur", "basic initiative - 3", "str - 1", "str"),
        Move::new("Shove", "basic initiative - 1", "str - 3", "str"),
    ]
}

/// Descriptor a character is built from.
///
/// Every field is optional so partially filled JSON from the surrounding
/// application loads; missing base attributes are zero and a missing level is 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterAttributes {
    pub level: Option<i32>,
    pub strength: Option<i32>,
    pub speed: Option<i32>,
    pub resistance: Option<i32>,
    pub modifier: Option<i32>,
    pub attack_bonus: Option<i32>,
    pub defense_bonus: Option<i32>,
    pub dodge_bonus: Option<i32>,
    pub damage_bonus: Option<i32>,
    pub bonus_life: Option<i32>,
    pub life_points: Option<i32>,
    pub knockdown: Option<bool>,
    pub moves: Option<Vec<Move>>,
}

impl CharacterAttributes {
    pub fn new(level: i32, strength: i32, speed: i32, resistance: i32) -> Self {
        Self {
            level: Some(level),
            strength: Some(strength),
            speed: Some(speed),
            resistance: Some(resistance),
            ..Self::default()
        }
    }

    pub fn with_life_points(mut self, life_points: i32) -> Self {
        self.life_points = Some(life_points);
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Parse and validate a JSON descriptor.
    pub fn from_json_str(json: &str) -> Result<Self, CharacterError> {
        let attrs: Self = serde_json::from_str(json)?;
        attrs.validate()?;
        Ok(attrs)
    }

    /// Level must be at least 1; attributes and life may not be negative.
    /// No field may exceed [`MAX_ATTRIBUTE`] in magnitude.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if let Some(level) = self.level {
            if level < 1 {
                return Err(CharacterError::InvalidLevel(level));
            }
        }
        let non_negative = [
            ("strength", self.strength),
            ("speed", self.speed),
            ("resistance", self.resistance),
            ("bonus life", self.bonus_life),
            ("life points", self.life_points),
        ];
        for (name, value) in non_negative {
            if let Some(value) = value.filter(|v| *v < 0) {
                return Err(CharacterError::NegativeAttribute { name, value });
            }
        }
        let bounded = [
            ("level", self.level),
            ("modifier", self.modifier),
            ("attack bonus", self.attack_bonus),
            ("defense bonus", self.defense_bonus),
            ("dodge bonus", self.dodge_bonus),
            ("damage bonus", self.damage_bonus),
        ];
        for (name, value) in non_negative.into_iter().chain(bounded) {
            if let Some(value) = value.filter(|v| v.unsigned_abs() > MAX_ATTRIBUTE.unsigned_abs()) {
                return Err(CharacterError::AttributeTooLarge { name, value });
            }
        }
        Ok(())
    }
}

/// Temporary adjustments applied and later removed as a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryModifiers {
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub dodge_bonus: i32,
    pub damage_bonus: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAttributes {
    pub strength: i32,
    pub speed: i32,
    pub resistance: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSkills {
    pub attack_skill: i32,
    pub defense_skill: i32,
    pub dodge_skill: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeSummary {
    pub current: i32,
    pub max: i32,
    /// Fraction in `0.0..=1.0`.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedValues {
    pub initiative: i32,
    pub dodge: i32,
    pub block: i32,
    pub max_fatigue: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonuses {
    pub attack: i32,
    pub defense: i32,
    pub dodge: i32,
    pub damage: i32,
}

/// Read-only snapshot of a character for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub level: i32,
    pub attributes: BaseAttributes,
    pub combat: CombatSkills,
    pub life: LifeSummary,
    pub calculated: CalculatedValues,
    pub bonuses: Bonuses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_entry: Option<LevelEntry>,
}

/// One combatant's build and current condition.
///
/// Cloning gives a fully independent copy, life state included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    level: i32,
    strength: i32,
    speed: i32,
    resistance: i32,

    total_life: i32,
    attack_skill: i32,
    defense_skill: i32,
    dodge_skill: i32,
    damage_resistance: i32,

    modifier: i32,

    attack_bonus: i32,
    defense_bonus: i32,
    dodge_bonus: i32,
    damage_bonus: i32,

    /// Extra total life earned by levelling up.
    bonus_life: i32,

    life_points: i32,
    percentage_life_points: f64,
    knockdown: bool,

    moves: Vec<Move>,
}

impl Character {
    /// Build from a descriptor the caller already trusts.
    /// Use [`Character::try_new`] for descriptors from outside the program.
    ///
    /// Life starts full when the descriptor leaves it unset or at zero.
    pub fn new(attrs: CharacterAttributes) -> Self {
        debug_assert!(attrs.validate().is_ok(), "invalid character descriptor");
        let mut character = Self {
            level: attrs.level.unwrap_or(1),
            strength: attrs.strength.unwrap_or(0),
            speed: attrs.speed.unwrap_or(0),
            resistance: attrs.resistance.unwrap_or(0),
            total_life: 0,
            attack_skill: 0,
            defense_skill: 0,
            dodge_skill: 0,
            damage_resistance: 0,
            modifier: attrs.modifier.unwrap_or(0),
            attack_bonus: attrs.attack_bonus.unwrap_or(0),
            defense_bonus: attrs.defense_bonus.unwrap_or(0),
            dodge_bonus: attrs.dodge_bonus.unwrap_or(0),
            damage_bonus: attrs.damage_bonus.unwrap_or(0),
            bonus_life: attrs.bonus_life.unwrap_or(0),
            life_points: 0,
            percentage_life_points: 0.0,
            knockdown: attrs.knockdown.unwrap_or(false),
            moves: attrs.moves.unwrap_or_default(),
        };
        character.life_points = attrs.life_points.unwrap_or(0);
        character.recompute_derived_stats();
        if character.life_points == 0 {
            character.life_points = character.total_life;
            character.update_percentage_life();
        }
        character
    }

    /// Validate, then build.
    pub fn try_new(attrs: CharacterAttributes) -> Result<Self, CharacterError> {
        attrs.validate()?;
        Ok(Self::new(attrs))
    }

    /// Parse, validate and build from a JSON descriptor.
    pub fn from_json_str(json: &str) -> Result<Self, CharacterError> {
        CharacterAttributes::from_json_str(json).map(Self::new)
    }

    /// Recompute skills and total life from the base attributes.
    ///
    /// Current life is clamped to the new total.
    pub fn recompute_derived_stats(&mut self) {
        self.total_life = ceil_div(self.strength, 2)
            .saturating_add(self.resistance)
            .saturating_add(self.level)
            .saturating_add(BASE_LIFE)
            .saturating_add(self.bonus_life);
        self.attack_skill = self.strength.saturating_add(self.level);
        self.defense_skill = self.resistance.saturating_add(self.level);
        self.dodge_skill = self.speed.saturating_add(self.level);
        self.damage_resistance = ceil_div(self.resistance, 2);

        self.life_points = self.life_points.clamp(0, self.total_life);
        self.update_percentage_life();
    }

    /// Take the level's modifier from the table (when listed) and recompute.
    pub fn apply_level_table(&mut self, table: &LevelTable) {
        if let Some(entry) = table.entry(self.level) {
            self.modifier = entry.modifier;
        }
        self.recompute_derived_stats();
    }

    pub fn set_attributes(&mut self, strength: i32, speed: i32, resistance: i32) {
        self.strength = strength;
        self.speed = speed;
        self.resistance = resistance;
        self.recompute_derived_stats();
    }

    pub fn set_level(&mut self, level: i32) {
        self.level = level;
        self.recompute_derived_stats();
    }

    pub fn set_modifier(&mut self, modifier: i32) {
        self.modifier = modifier;
    }

    /// Move to `new_level`. Gained levels also add that much to total and
    /// current life; losing levels never costs current life beyond the new cap.
    pub fn level_up(&mut self, new_level: i32, table: &LevelTable) {
        let old_level = self.level;
        let gain = (new_level - old_level).max(0);

        self.level = new_level;
        self.bonus_life = self.bonus_life.saturating_add(gain);
        self.apply_level_table(table);

        self.life_points = self.life_points.saturating_add(gain).min(self.total_life);
        self.update_percentage_life();

        tracing::debug!(
            old_level,
            new_level,
            total_life = self.total_life,
            life_points = self.life_points,
            "level up"
        );
    }

    pub fn add_bonus(&mut self, attack: i32, defense: i32, dodge: i32, damage: i32) {
        self.attack_bonus += attack;
        self.defense_bonus += defense;
        self.dodge_bonus += dodge;
        self.damage_bonus += damage;
    }

    pub fn apply_temporary_modifiers(&mut self, mods: &TemporaryModifiers) {
        self.attack_bonus += mods.attack_bonus;
        self.defense_bonus += mods.defense_bonus;
        self.dodge_bonus += mods.dodge_bonus;
        self.damage_bonus += mods.damage_bonus;
        self.modifier += mods.modifier;
    }

    pub fn remove_temporary_modifiers(&mut self, mods: &TemporaryModifiers) {
        self.attack_bonus -= mods.attack_bonus;
        self.defense_bonus -= mods.defense_bonus;
        self.dodge_bonus -= mods.dodge_bonus;
        self.damage_bonus -= mods.damage_bonus;
        self.modifier -= mods.modifier;
    }

    pub fn update_percentage_life(&mut self) {
        self.percentage_life_points = life_fraction(self.life_points, self.total_life);
    }

    /// Set current life (clamped to `0..=total_life`).
    pub fn set_life_points(&mut self, life_points: i32) {
        self.life_points = life_points.clamp(0, self.total_life);
        self.update_percentage_life();
    }

    /// Restore all life and stand back up.
    pub fn full_heal(&mut self) {
        self.life_points = self.total_life;
        self.knockdown = false;
        self.update_percentage_life();
    }

    pub(crate) fn set_knockdown(&mut self) {
        self.knockdown = true;
    }

    pub fn clear_knockdown(&mut self) {
        self.knockdown = false;
    }

    pub fn is_alive(&self) -> bool {
        self.life_points > 0
    }

    /// Less than a quarter of total life left.
    pub fn is_critical(&self) -> bool {
        self.percentage_life_points < CRITICAL_LIFE_FRACTION
    }

    /// Base initiative: `speed + floor(strength / 2) + level`.
    pub fn initiative(&self) -> i32 {
        self.speed
            .saturating_add(floor_div(self.strength, 2))
            .saturating_add(self.level)
    }

    pub fn dodge_value(&self) -> i32 {
        self.initiative().saturating_add(self.level)
    }

    pub fn block_value(&self) -> i32 {
        floor_div(self.strength, 3).saturating_add(self.level)
    }

    pub fn max_fatigue(&self) -> i32 {
        self.resistance
            .saturating_add(self.speed)
            .saturating_add(self.level)
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn resistance(&self) -> i32 {
        self.resistance
    }

    pub fn total_life(&self) -> i32 {
        self.total_life
    }

    pub fn attack_skill(&self) -> i32 {
        self.attack_skill
    }

    pub fn defense_skill(&self) -> i32 {
        self.defense_skill
    }

    pub fn dodge_skill(&self) -> i32 {
        self.dodge_skill
    }

    pub fn damage_resistance(&self) -> i32 {
        self.damage_resistance
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }

    pub fn defense_bonus(&self) -> i32 {
        self.defense_bonus
    }

    pub fn dodge_bonus(&self) -> i32 {
        self.dodge_bonus
    }

    pub fn damage_bonus(&self) -> i32 {
        self.damage_bonus
    }

    pub fn life_points(&self) -> i32 {
        self.life_points
    }

    /// `life_points / total_life`, in `0.0..=1.0`.
    pub fn percentage_life_points(&self) -> f64 {
        self.percentage_life_points
    }

    pub fn knockdown(&self) -> bool {
        self.knockdown
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Descriptor for this build, current life and knockdown included.
    ///
    /// Rebuilding gives an equal character while it has life left. A
    /// character at 0 life comes back at full life, since a zero in the
    /// descriptor means "start full".
    pub fn to_attributes(&self) -> CharacterAttributes {
        CharacterAttributes {
            level: Some(self.level),
            strength: Some(self.strength),
            speed: Some(self.speed),
            resistance: Some(self.resistance),
            modifier: Some(self.modifier),
            attack_bonus: Some(self.attack_bonus),
            defense_bonus: Some(self.defense_bonus),
            dodge_bonus: Some(self.dodge_bonus),
            damage_bonus: Some(self.damage_bonus),
            bonus_life: Some(self.bonus_life),
            life_points: Some(self.life_points),
            knockdown: Some(self.knockdown),
            moves: Some(self.moves.clone()),
        }
    }

    pub fn stats(&self, level_entry: Option<LevelEntry>) -> CharacterStats {
        CharacterStats {
            level: self.level,
            attributes: BaseAttributes {
                strength: self.strength,
                speed: self.speed,
                resistance: self.resistance,
            },
            combat: CombatSkills {
                attack_skill: self.attack_skill,
                defense_skill: self.defense_skill,
                dodge_skill: self.dodge_skill,
            },
            life: LifeSummary {
                current: self.life_points,
                max: self.total_life,
                percentage: self.percentage_life_points,
            },
            calculated: CalculatedValues {
                initiative: self.initiative(),
                dodge: self.dodge_value(),
                block: self.block_value(),
                max_fatigue: self.max_fatigue(),
            },
            bonuses: Bonuses {
                attack: self.attack_bonus,
                defense: self.defense_bonus,
                dodge: self.dodge_bonus,
                damage: self.damage_bonus,
            },
            level_entry,
        }
    }
}

impl Default for Character {
    /// Level 1 with every base attribute at 1 and the starter moves.
    fn default() -> Self {
        Self::new(CharacterAttributes::new(1, 1, 1, 1).with_moves(starter_moves()))
    }
}
