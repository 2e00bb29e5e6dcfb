//! Fighter action layer.
//!
//! A [`Fighter`] owns a private copy of a [`Character`] for the length of an
//! encounter and resolves one action at a time: initiative, attacks, blocks,
//! dodges, incoming damage, healing and revival.
//!
//! # Life state
//!
//! ```text
//! Alive ──(damage >= life)──> Defeated ──revive()──> Alive
//!   └─ knockdown: set by a single hit of at least half total life
//! ```
//!
//! Knockdown is a flag on a living fighter, not a separate state. It stays
//! set until [`Fighter::clear_knockdown`], [`Fighter::reset_combat_state`] or
//! a full heal.

use crate::character::{ceil_div, floor_div, Character, CharacterStats, Move, TemporaryModifiers};
use crate::dice::{roll_sum, DiceSource};
use crate::level::{LevelEntry, LevelTable};
use crate::roll::{classify, AttackResult, DefenseResult, Thresholds, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Dice rolled for initiative.
const INITIATIVE_DICE: u32 = 3;

/// Flat bonus on attack and block checks.
const STANDARD_CHECK_BONUS: i32 = 10;

/// Flat bonus on special attack and dodge checks.
const REDUCED_CHECK_BONUS: i32 = 8;

/// Identifies a fighter in logs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FighterId(pub Uuid);

impl FighterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FighterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The defender's reaction to an attack this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mitigation {
    /// No reaction; a successful attack lands in full.
    #[default]
    None,
    /// The defender blocked; the result carries the absorbed damage.
    Block(DefenseResult),
    /// The defender tried to dodge.
    Dodge(DefenseResult),
}

/// What one call to [`Fighter::lose_life`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Life removed by this hit.
    pub damage_taken: i32,
    /// This hit knocked the fighter down.
    pub knockdown: bool,
    /// This hit defeated the fighter.
    pub defeated: bool,
}

impl HitOutcome {
    /// Nothing happened.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Damage left after mitigation.
///
/// A hit that did damage is never reduced below 1 by ordinary mitigation;
/// only a critical block or a successful dodge can absorb it completely.
pub fn net_damage(
    received: i32,
    resistance: i32,
    block_was_critical: bool,
    dodge_succeeded: bool,
) -> i32 {
    let net = (received - resistance).max(0);
    if net == 0 && received > 0 && !(block_was_critical || dodge_succeeded) {
        1
    } else {
        net
    }
}

/// Snapshot of a fighter for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub id: FighterId,
    pub character: CharacterStats,
    pub lose: bool,
}

/// One combatant in an encounter.
#[derive(Debug, Clone, Serialize)]
pub struct Fighter {
    id: FighterId,
    character: Character,
    selected_level: LevelEntry,
    lose: bool,
}

impl Fighter {
    /// Build a fighter from a template character.
    ///
    /// The character is cloned, so several fighters made from one template
    /// never share life state.
    pub fn new(character: &Character, table: &LevelTable) -> Self {
        let mut character = character.clone();
        character.apply_level_table(table);
        let selected_level = table.entry_or_default(character.level());

        Self {
            id: FighterId::new(),
            character,
            selected_level,
            lose: false,
        }
    }

    pub fn id(&self) -> FighterId {
        self.id
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Cached level entry for the character's level.
    pub fn level_entry(&self) -> &LevelEntry {
        &self.selected_level
    }

    /// Base initiative plus 3d6. Ties are for the caller to re-roll.
    pub fn initiative<D: DiceSource + ?Sized>(&self, dice: &mut D) -> i32 {
        let rolled = roll_sum(dice, INITIATIVE_DICE) as i32;
        let total = self.character.initiative() + rolled;
        tracing::debug!(fighter = %self.id, rolled, total, "initiative");
        total
    }

    /// Same as [`Fighter::initiative`].
    pub fn combat_initiative<D: DiceSource + ?Sized>(&self, dice: &mut D) -> i32 {
        self.initiative(dice)
    }

    pub fn attack<D: DiceSource + ?Sized>(&self, dice: &mut D) -> AttackResult {
        let c = &self.character;
        let skill = c
            .attack_skill()
            .saturating_add(c.attack_bonus())
            .saturating_add(c.modifier())
            .saturating_add(STANDARD_CHECK_BONUS);
        let roll = classify(dice, skill, Thresholds::NORMAL);
        let damage = self.damage(roll.tier, dice);
        tracing::debug!(fighter = %self.id, skill, roll = %roll, damage, "attack");
        AttackResult { roll, damage }
    }

    /// Wider critical bands; the attack bonus does not apply.
    pub fn attack_special<D: DiceSource + ?Sized>(&self, dice: &mut D) -> AttackResult {
        let c = &self.character;
        let skill = c
            .attack_skill()
            .saturating_add(c.modifier())
            .saturating_add(REDUCED_CHECK_BONUS);
        let roll = classify(dice, skill, Thresholds::SPECIAL);
        let damage = self.damage(roll.tier, dice);
        tracing::debug!(fighter = %self.id, skill, roll = %roll, damage, "special attack");
        AttackResult { roll, damage }
    }

    /// Block: absorbs `ceil(resistance / 2) + damage_resistance`, doubled on a
    /// critical success and nothing on a failure.
    pub fn defend<D: DiceSource + ?Sized>(&self, dice: &mut D) -> DefenseResult {
        let c = &self.character;
        let skill = c
            .defense_skill()
            .saturating_add(c.defense_bonus())
            .saturating_add(c.modifier())
            .saturating_add(STANDARD_CHECK_BONUS);
        let roll = classify(dice, skill, Thresholds::NORMAL);

        let base = ceil_div(c.resistance(), 2).saturating_add(c.damage_resistance());
        let absorbed = match roll.tier {
            Tier::CriticalSuccess => base.saturating_mul(2),
            Tier::Success => base,
            Tier::Failure | Tier::CriticalFailure => 0,
        };
        tracing::debug!(fighter = %self.id, skill, roll = %roll, absorbed, "block");

        DefenseResult {
            roll,
            damage_resistance: Some(absorbed),
        }
    }

    /// Dodge: all or nothing, so no mitigation value is carried.
    pub fn dodge<D: DiceSource + ?Sized>(&self, dice: &mut D) -> DefenseResult {
        let c = &self.character;
        let skill = ceil_div(c.dodge_skill(), 2)
            .saturating_add(c.dodge_bonus())
            .saturating_add(c.modifier())
            .saturating_add(REDUCED_CHECK_BONUS);
        let roll = classify(dice, skill, Thresholds::NORMAL);
        tracing::debug!(fighter = %self.id, skill, roll = %roll, "dodge");

        DefenseResult {
            roll,
            damage_resistance: None,
        }
    }

    /// Damage for an attack that landed with `tier`.
    ///
    /// Rolls the level's damage dice. A roll under `dice * 2` is raised to
    /// that floor without the level modifier; otherwise the modifier is added.
    fn damage<D: DiceSource + ?Sized>(&self, tier: Tier, dice: &mut D) -> i32 {
        if tier.is_failure() {
            return 0;
        }

        let dice_count = self.selected_level.dice;
        let rolled = roll_sum(dice, dice_count) as i32;
        let min_damage = dice_count as i32 * 2;
        let bonus = self.character.damage_bonus();

        let damage = if rolled < min_damage {
            min_damage.saturating_add(bonus)
        } else {
            rolled
                .saturating_add(self.selected_level.modifier)
                .saturating_add(bonus)
        };
        damage.max(0)
    }

    /// Apply an opponent's attack, given this fighter's reaction.
    ///
    /// - A critical attack ignores any reaction.
    /// - A successful attack is reduced by a block, avoided by a successful
    ///   dodge, and lands in full against a failed dodge or no reaction.
    /// - A failed attack does nothing.
    pub fn lose_life(&mut self, attack: &AttackResult, mitigation: Mitigation) -> HitOutcome {
        match attack.tier() {
            Tier::CriticalSuccess => self.apply_damage(attack.damage, 0, false, false),
            Tier::Success => match mitigation {
                Mitigation::None => self.apply_damage(attack.damage, 0, false, false),
                Mitigation::Block(block) => self.apply_damage(
                    attack.damage,
                    block.mitigation(),
                    block.tier() == Tier::CriticalSuccess,
                    false,
                ),
                Mitigation::Dodge(dodge) if dodge.tier().is_failure() => {
                    self.apply_damage(attack.damage, 0, false, false)
                }
                Mitigation::Dodge(_) => {
                    tracing::debug!(fighter = %self.id, "attack dodged");
                    HitOutcome::none()
                }
            },
            Tier::Failure | Tier::CriticalFailure => HitOutcome::none(),
        }
    }

    /// Remove life for one hit. See [`net_damage`] for the floor rule.
    ///
    /// A hit that takes all remaining life defeats the fighter. Otherwise a
    /// hit of at least half total life knocks it down.
    pub fn apply_damage(
        &mut self,
        received: i32,
        resistance: i32,
        block_was_critical: bool,
        dodge_succeeded: bool,
    ) -> HitOutcome {
        let net = net_damage(received, resistance, block_was_critical, dodge_succeeded);
        let life = self.character.life_points();

        if net >= life {
            self.lose = true;
            self.character.set_life_points(0);
            tracing::info!(fighter = %self.id, net, "fighter defeated");
            return HitOutcome {
                damage_taken: life,
                knockdown: false,
                defeated: true,
            };
        }

        let knockdown = net >= ceil_div(self.character.total_life(), 2);
        if knockdown {
            self.character.set_knockdown();
        }
        self.character.set_life_points(life - net);

        tracing::debug!(
            fighter = %self.id,
            received,
            resistance,
            net,
            life_points = self.character.life_points(),
            knockdown,
            "damage applied"
        );

        HitOutcome {
            damage_taken: net,
            knockdown,
            defeated: false,
        }
    }

    /// Restore up to `amount` life, capped at total life. Returns the life
    /// actually restored.
    pub fn recover_life(&mut self, amount: i32) -> i32 {
        let old = self.character.life_points();
        let new = (old + amount).min(self.character.total_life());
        self.character.set_life_points(new);
        self.character.life_points() - old
    }

    /// Heal `floor(resistance / 2) + 1`.
    pub fn natural_healing(&mut self) -> i32 {
        let amount = floor_div(self.character.resistance(), 2) + 1;
        self.recover_life(amount)
    }

    /// Bring a defeated fighter back with a third of total life (rounded up).
    ///
    /// Returns `false` and changes nothing if the fighter was not defeated.
    pub fn revive(&mut self) -> bool {
        if !self.lose {
            return false;
        }
        let life = ceil_div(self.character.total_life(), 3);
        self.character.set_life_points(life);
        self.lose = false;
        tracing::info!(fighter = %self.id, life, "fighter revived");
        true
    }

    /// Start a fresh encounter with this build: full life, standing, not defeated.
    pub fn reset_combat_state(&mut self) {
        self.lose = false;
        self.character.clear_knockdown();
        self.character.full_heal();
    }

    pub fn clear_knockdown(&mut self) {
        self.character.clear_knockdown();
    }

    /// Level up the character and re-cache its level entry.
    ///
    /// This is the only way to change a fighter's level, so the cached entry
    /// always matches the character.
    pub fn update_level(&mut self, new_level: i32, table: &LevelTable) {
        self.character.level_up(new_level, table);
        self.selected_level = table.entry_or_default(self.character.level());
    }

    pub fn add_bonus(&mut self, attack: i32, defense: i32, dodge: i32, damage: i32) {
        self.character.add_bonus(attack, defense, dodge, damage);
    }

    pub fn apply_temporary_modifiers(&mut self, mods: &TemporaryModifiers) {
        self.character.apply_temporary_modifiers(mods);
    }

    pub fn remove_temporary_modifiers(&mut self, mods: &TemporaryModifiers) {
        self.character.remove_temporary_modifiers(mods);
    }

    /// Set current life directly (clamped to `0..=max_hp`). Does not change
    /// the defeated flag; use [`Fighter::apply_damage`] or [`Fighter::revive`]
    /// for that.
    pub fn set_life_points(&mut self, life_points: i32) {
        self.character.set_life_points(life_points);
    }

    pub fn can_fight(&self) -> bool {
        self.character.is_alive() && !self.lose
    }

    pub fn is_defeated(&self) -> bool {
        self.lose
    }

    pub fn is_knocked_down(&self) -> bool {
        self.character.knockdown()
    }

    pub fn current_hp(&self) -> i32 {
        self.character.life_points()
    }

    pub fn max_hp(&self) -> i32 {
        self.character.total_life()
    }

    /// Current life as a percentage, `0.0..=100.0`.
    pub fn hp_percentage(&self) -> f64 {
        self.character.percentage_life_points() * 100.0
    }

    pub fn moves(&self) -> &[Move] {
        self.character.moves()
    }

    pub fn stats(&self) -> FighterStats {
        FighterStats {
            id: self.id,
            character: self.character.stats(Some(self.selected_level)),
            lose: self.lose,
        }
    }
}
