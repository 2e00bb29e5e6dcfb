//! Stateless helpers for whoever sequences a duel.
//!
//! Nothing here decides what a fighter does; callers pick the attack and the
//! reaction. These functions only chain the fighter calls in rule order.

use crate::dice::DiceSource;
use crate::fighter::{Fighter, HitOutcome, Mitigation};
use crate::roll::AttackResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tied initiative pairs discarded before giving up.
pub const MAX_INITIATIVE_REROLLS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("Initiative still tied after {rerolls} re-rolls")]
    InitiativeDeadlock { rerolls: u32 },
}

/// Which of the two fighters passed to [`roll_initiative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Result of an initiative contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeContest {
    /// Winning roll pair; ties before it are discarded.
    pub first_roll: i32,
    pub second_roll: i32,
    /// How many tied pairs were re-rolled.
    pub rerolls: u32,
    pub winner: Side,
}

/// Roll initiative for both fighters, re-rolling both while they tie.
///
/// Fails once [`MAX_INITIATIVE_REROLLS`] tied pairs have been discarded, which
/// only happens with a dice source that keeps repeating itself.
pub fn roll_initiative<D: DiceSource + ?Sized>(
    first: &Fighter,
    second: &Fighter,
    dice: &mut D,
) -> Result<InitiativeContest, EncounterError> {
    let mut rerolls = 0;
    while rerolls < MAX_INITIATIVE_REROLLS {
        let first_roll = first.initiative(dice);
        let second_roll = second.initiative(dice);
        if first_roll != second_roll {
            let winner = if first_roll > second_roll {
                Side::First
            } else {
                Side::Second
            };
            tracing::debug!(first_roll, second_roll, rerolls, ?winner, "initiative decided");
            return Ok(InitiativeContest {
                first_roll,
                second_roll,
                rerolls,
                winner,
            });
        }
        rerolls += 1;
    }
    tracing::warn!(rerolls = MAX_INITIATIVE_REROLLS, "initiative deadlocked");
    Err(EncounterError::InitiativeDeadlock {
        rerolls: MAX_INITIATIVE_REROLLS,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackKind {
    #[default]
    Normal,
    Special,
}

/// How the defender answers an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reaction {
    #[default]
    None,
    Block,
    Dodge,
}

/// One attack and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub attack: AttackResult,
    pub mitigation: Mitigation,
    pub outcome: HitOutcome,
}

/// Roll the attack, then the defender's reaction, then apply the damage.
pub fn resolve_exchange<D: DiceSource + ?Sized>(
    attacker: &Fighter,
    defender: &mut Fighter,
    kind: AttackKind,
    reaction: Reaction,
    dice: &mut D,
) -> Exchange {
    let attack = match kind {
        AttackKind::Normal => attacker.attack(dice),
        AttackKind::Special => attacker.attack_special(dice),
    };
    let mitigation = match reaction {
        Reaction::None => Mitigation::None,
        Reaction::Block => Mitigation::Block(defender.defend(dice)),
        Reaction::Dodge => Mitigation::Dodge(defender.dodge(dice)),
    };
    let outcome = defender.lose_life(&attack, mitigation);

    Exchange {
        attack,
        mitigation,
        outcome,
    }
}
