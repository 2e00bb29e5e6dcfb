//! Skill checks on 3d6.
//!
//! A check rolls three dice and compares the total against a skill value.
//! Very high totals are critical failures and very low totals critical
//! successes; the bands are given by [`Thresholds`] so special actions can
//! widen them.

use crate::dice::{roll_multiple, DiceSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dice rolled by every skill check.
pub const CHECK_DICE: u32 = 3;

/// Outcome tier of a skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    CriticalFailure,
    CriticalSuccess,
    Success,
    Failure,
}

impl Tier {
    /// SUCCESS or CRITICAL_SUCCESS.
    pub fn is_success(self) -> bool {
        matches!(self, Tier::Success | Tier::CriticalSuccess)
    }

    /// FAILURE or CRITICAL_FAILURE.
    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::CriticalFailure => "CRITICAL_FAILURE",
            Tier::CriticalSuccess => "CRITICAL_SUCCESS",
            Tier::Success => "SUCCESS",
            Tier::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Critical bands for a check. Both bounds are inclusive.
///
/// `critical_success` must be below `critical_failure`; this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Totals at or above this are critical failures.
    pub critical_failure: i32,
    /// Totals at or below this are critical successes.
    pub critical_success: i32,
}

impl Thresholds {
    /// Bands for ordinary attacks, blocks and dodges.
    pub const NORMAL: Thresholds = Thresholds {
        critical_failure: 17,
        critical_success: 4,
    };

    /// Bands for the special attack.
    pub const SPECIAL: Thresholds = Thresholds {
        critical_failure: 18,
        critical_success: 3,
    };

    pub const fn new(critical_failure: i32, critical_success: i32) -> Self {
        Self {
            critical_failure,
            critical_success,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Classify a 3d6 total. First match wins:
/// critical failure, critical success, success, failure.
pub fn classify_total(total: i32, skill: i32, thresholds: Thresholds) -> Tier {
    if total >= thresholds.critical_failure {
        Tier::CriticalFailure
    } else if total <= thresholds.critical_success {
        Tier::CriticalSuccess
    } else if total <= skill {
        Tier::Success
    } else {
        Tier::Failure
    }
}

/// Roll a skill check.
pub fn classify<D: DiceSource + ?Sized>(
    dice: &mut D,
    skill: i32,
    thresholds: Thresholds,
) -> RollOutcome {
    let faces = roll_multiple(dice, CHECK_DICE);
    RollOutcome::from_dice([faces[0], faces[1], faces[2]], skill, thresholds)
}

/// The dice and tier of one skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub dice: [u32; 3],
    pub total: i32,
    pub tier: Tier,
}

impl RollOutcome {
    /// Build the outcome for already-rolled dice.
    pub fn from_dice(dice: [u32; 3], skill: i32, thresholds: Thresholds) -> Self {
        let total = dice.iter().sum::<u32>() as i32;
        Self {
            dice,
            total,
            tier: classify_total(total, skill, thresholds),
        }
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] = {} ({})",
            self.dice[0], self.dice[1], self.dice[2], self.total, self.tier
        )
    }
}

/// An attack check plus the damage it rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    #[serde(flatten)]
    pub roll: RollOutcome,
    /// Always zero for failed checks.
    pub damage: i32,
}

impl AttackResult {
    pub fn tier(&self) -> Tier {
        self.roll.tier
    }
}

/// A block or dodge check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseResult {
    #[serde(flatten)]
    pub roll: RollOutcome,
    /// Damage absorbed by a block. Dodges carry `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_resistance: Option<i32>,
}

impl DefenseResult {
    pub fn tier(&self) -> Tier {
        self.roll.tier
    }

    /// Absorbed damage, zero when absent.
    pub fn mitigation(&self) -> i32 {
        self.damage_resistance.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    #[test]
    fn test_boundaries_normal_thresholds() {
        let t = Thresholds::NORMAL;
        assert_eq!(classify_total(17, 10, t), Tier::CriticalFailure);
        assert_eq!(classify_total(18, 10, t), Tier::CriticalFailure);
        assert_eq!(classify_total(4, 10, t), Tier::CriticalSuccess);
        assert_eq!(classify_total(3, 10, t), Tier::CriticalSuccess);
        assert_eq!(classify_total(10, 10, t), Tier::Success);
        assert_eq!(classify_total(11, 10, t), Tier::Failure);
    }

    #[test]
    fn test_critical_failure_beats_high_skill() {
        // Skill 20 would otherwise succeed on a 17.
        assert_eq!(
            classify_total(17, 20, Thresholds::NORMAL),
            Tier::CriticalFailure
        );
    }

    #[test]
    fn test_critical_success_beats_low_skill() {
        assert_eq!(
            classify_total(4, 0, Thresholds::NORMAL),
            Tier::CriticalSuccess
        );
    }

    #[test]
    fn test_special_thresholds() {
        let t = Thresholds::SPECIAL;
        assert_eq!(classify_total(17, 16, t), Tier::Failure);
        assert_eq!(classify_total(17, 17, t), Tier::Success);
        assert_eq!(classify_total(18, 20, t), Tier::CriticalFailure);
        assert_eq!(classify_total(4, 2, t), Tier::Failure);
        assert_eq!(classify_total(3, 2, t), Tier::CriticalSuccess);
    }

    #[test]
    fn test_classify_uses_three_dice() {
        let mut dice = ScriptedDice::new([2, 3, 5]);
        let outcome = classify(&mut dice, 10, Thresholds::NORMAL);
        assert_eq!(outcome.dice, [2, 3, 5]);
        assert_eq!(outcome.total, 10);
        assert_eq!(outcome.tier, Tier::Success);
        assert_eq!(dice.rolls_made(), 3);
    }

    #[test]
    fn test_tier_serializes_screaming() {
        let json = serde_json::to_string(&Tier::CriticalSuccess).unwrap();
        assert_eq!(json, "\"CRITICAL_SUCCESS\"");
        let tier: Tier = serde_json::from_str("\"FAILURE\"").unwrap();
        assert_eq!(tier, Tier::Failure);
    }

    #[test]
    fn test_attack_result_flattens_roll() {
        let result = AttackResult {
            roll: RollOutcome::from_dice([1, 2, 3], 10, Thresholds::NORMAL),
            damage: 4,
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["total"], 6);
        assert_eq!(value["tier"], "SUCCESS");
        assert_eq!(value["damage"], 4);
    }

    #[test]
    fn test_dodge_has_no_mitigation() {
        let dodge = DefenseResult {
            roll: RollOutcome::from_dice([1, 1, 1], 5, Thresholds::NORMAL),
            damage_resistance: None,
        };
        assert_eq!(dodge.mitigation(), 0);
        let value = serde_json::to_value(dodge).unwrap();
        assert!(value.get("damage_resistance").is_none());
    }

    #[test]
    fn test_tier_predicates() {
        assert!(Tier::Success.is_success());
        assert!(Tier::CriticalSuccess.is_success());
        assert!(Tier::Failure.is_failure());
        assert!(Tier::CriticalFailure.is_failure());
    }
}
