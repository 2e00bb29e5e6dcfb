//! End-to-end duel scenarios driven by scripted dice.
//!
//! Run with: `cargo test -p arena-core --test combat_flow`

use arena_core::{
    AttackKind, Character, CharacterAttributes, DuelHarness, EncounterError, Fighter, LevelTable,
    Mitigation, RandomDice, Reaction, ScriptedDice, Side, Tier, MAX_INITIATIVE_REROLLS,
};

// =============================================================================
// Character derivation
// =============================================================================

#[test]
fn test_scenario_build_derives_expected_stats() {
    let c = Character::new(CharacterAttributes::new(1, 15, 5, 3).with_life_points(4));

    assert_eq!(c.total_life(), 22);
    assert_eq!(c.attack_skill(), 16);
    assert_eq!(c.defense_skill(), 4);
    assert_eq!(c.dodge_skill(), 6);
    assert_eq!(c.damage_resistance(), 2);
    assert_eq!(c.life_points(), 4);
    assert!(c.is_critical());
}

#[test]
fn test_character_from_json_descriptor() {
    let json = r#"{
        "level": 3,
        "strength": 6,
        "speed": 4,
        "resistance": 5,
        "attackBonus": 1
    }"#;
    let c = Character::from_json_str(json).unwrap();
    // ceil(6/2) + 5 + 3 + 10
    assert_eq!(c.total_life(), 21);
    assert_eq!(c.life_points(), 21);
    assert_eq!(c.attack_bonus(), 1);
}

#[test]
fn test_invalid_descriptor_rejected() {
    assert!(Character::from_json_str(r#"{"level": 0}"#).is_err());
    assert!(Character::from_json_str(r#"{"strength": -2}"#).is_err());
    assert!(Character::from_json_str("not json").is_err());
}

// =============================================================================
// Level table
// =============================================================================

#[test]
fn test_custom_level_table_from_json() {
    let table = LevelTable::from_json_str(
        r#"[
            {"level": 2, "dice": 2, "modifier": 3},
            {"level": 1, "dice": 1, "modifier": 0}
        ]"#,
    )
    .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.iter().next().map(|e| e.level), Some(1));

    let template = Character::new(CharacterAttributes::new(2, 4, 3, 2));
    let fighter = Fighter::new(&template, &table);
    assert_eq!(fighter.level_entry().dice, 2);
    assert_eq!(fighter.character().modifier(), 3);

    // Two dice rolling 5 + 6 clear the floor of 4 and take the modifier.
    let mut dice = ScriptedDice::new([1, 2, 3, 5, 6]);
    let attack = fighter.attack(&mut dice);
    assert_eq!(attack.tier(), Tier::Success);
    assert_eq!(attack.damage, 14);
}

#[test]
fn test_unlisted_level_uses_fallback_entry() {
    let table = LevelTable::empty();
    let fighter = Fighter::new(&Character::new(CharacterAttributes::new(5, 2, 2, 2)), &table);
    assert_eq!(fighter.level_entry().dice, 1);
    assert_eq!(fighter.level_entry().modifier, 0);
}

// =============================================================================
// Templates and fighters
// =============================================================================

#[test]
fn test_rebuilt_build_keeps_wounds_and_knockdown() {
    let table = LevelTable::default();
    let template = Character::new(CharacterAttributes::new(1, 4, 3, 2));
    let mut f = Fighter::new(&template, &table);
    f.apply_damage(9, 0, false, false);
    assert!(f.is_knocked_down());

    let rebuilt = Character::try_new(f.character().to_attributes()).unwrap();
    assert_eq!(rebuilt.life_points(), 6);
    assert!(rebuilt.knockdown());
    assert_eq!(&rebuilt, f.character());
}

#[test]
fn test_level_change_goes_through_fighter() {
    let table = LevelTable::default();
    let mut f = Fighter::new(&Character::new(CharacterAttributes::new(1, 4, 3, 2)), &table);
    f.update_level(7, &table);
    assert_eq!(f.level_entry().level, 7);
    assert_eq!(f.level_entry().dice, 3);

    // Three dice at 4 each clear the floor of 6.
    let mut dice = ScriptedDice::new([3, 3, 4, 4, 4, 4]);
    assert_eq!(f.attack(&mut dice).damage, 12);
}

#[test]
fn test_initiative_without_script_does_not_hang() {
    let mut harness = DuelHarness::new();
    let err = harness.initiative().unwrap_err();
    assert_eq!(
        err,
        EncounterError::InitiativeDeadlock {
            rerolls: MAX_INITIATIVE_REROLLS
        }
    );
}

#[test]
fn test_template_shared_by_many_fighters() {
    let table = LevelTable::default();
    let template = Character::new(CharacterAttributes::new(1, 4, 3, 2));
    let mut fighters: Vec<Fighter> = (0..3).map(|_| Fighter::new(&template, &table)).collect();

    fighters[0].apply_damage(7, 0, false, false);
    fighters[1].apply_damage(20, 0, false, false);

    assert_eq!(fighters[0].current_hp(), 8);
    assert!(fighters[1].is_defeated());
    assert_eq!(fighters[2].current_hp(), 15);
    assert_eq!(template.life_points(), 15);
}

// =============================================================================
// Scripted exchanges
// =============================================================================

#[test]
fn test_initiative_then_exchange() {
    let mut harness = DuelHarness::new();
    // Initiative: 6+10 vs 6+6. Then first attacks: 10 succeeds, damage 6.
    harness.script([4, 3, 3, 2, 2, 2, 3, 3, 4, 6]);

    let contest = harness.initiative().unwrap();
    assert_eq!(contest.winner, Side::First);
    assert_eq!(contest.first_roll, 16);
    assert_eq!(contest.second_roll, 12);

    let exchange = harness.first_attacks(AttackKind::Normal, Reaction::None);
    assert_eq!(exchange.attack.damage, 6);
    assert_eq!(harness.hp(), (15, 9));
}

#[test]
fn test_critical_hits_ignore_reactions() {
    let mut harness = DuelHarness::new();
    harness.script([
        1, 1, 1, 6, // critical hit for 6
        1, 1, 1, // critical block, ignored
        1, 1, 2, 5, // critical hit for 5
        1, 1, 1, // critical dodge, ignored
    ]);

    let first = harness.first_attacks(AttackKind::Normal, Reaction::Block);
    // 15 total: knockdown threshold is 8, 6 is not enough.
    assert_eq!(first.outcome.damage_taken, 6);
    assert!(!first.outcome.knockdown);

    let second = harness.first_attacks(AttackKind::Normal, Reaction::Dodge);
    assert_eq!(second.attack.tier(), Tier::CriticalSuccess);
    assert_eq!(harness.second.current_hp(), 4);
    assert!(harness.second.can_fight());
    assert!(!harness.second.character().is_critical());
}

#[test]
fn test_heavy_hit_knocks_down() {
    let mut harness = DuelHarness::new();
    harness.first.add_bonus(0, 0, 0, 3);
    // Success for 5 + 3 bonus = 8, half of 15 rounded up.
    harness.script([3, 3, 4, 5]);

    let exchange = harness.first_attacks(AttackKind::Normal, Reaction::None);
    assert!(exchange.outcome.knockdown);
    assert!(harness.second.is_knocked_down());
    assert_eq!(harness.second.current_hp(), 7);

    harness.second.clear_knockdown();
    assert!(!harness.second.is_knocked_down());
}

#[test]
fn test_block_and_dodge_answers() {
    let mut harness = DuelHarness::new();
    harness.script([
        3, 3, 4, 4, // attack 10, damage 4
        2, 3, 4, // block 9, absorbs 2
        3, 3, 4, 4, // attack 10, damage 4
        1, 2, 3, // dodge 6 succeeds
        3, 3, 4, 4, // attack 10, damage 4
        6, 6, 6, // dodge fumbles
    ]);

    let blocked = harness.second_attacks(AttackKind::Normal, Reaction::Block);
    assert!(matches!(blocked.mitigation, Mitigation::Block(_)));
    assert_eq!(harness.first.current_hp(), 13);

    let dodged = harness.second_attacks(AttackKind::Normal, Reaction::Dodge);
    assert_eq!(dodged.outcome.damage_taken, 0);
    assert_eq!(harness.first.current_hp(), 13);

    let fumbled = harness.second_attacks(AttackKind::Normal, Reaction::Dodge);
    assert_eq!(fumbled.outcome.damage_taken, 4);
    assert_eq!(harness.first.current_hp(), 9);
}

#[test]
fn test_defeat_and_revive() {
    let mut harness = DuelHarness::new();
    harness.second.set_life_points(3);
    harness.script([1, 1, 1, 6]);

    let exchange = harness.first_attacks(AttackKind::Special, Reaction::None);
    assert!(exchange.outcome.defeated);
    assert_eq!(exchange.outcome.damage_taken, 3);
    assert!(harness.second.is_defeated());
    assert_eq!(harness.second.hp_percentage(), 0.0);

    assert!(harness.second.revive());
    // ceil(15 / 3)
    assert_eq!(harness.second.current_hp(), 5);
    assert!(!harness.second.revive());
}

#[test]
fn test_level_up_between_encounters() {
    let mut harness = DuelHarness::new();
    harness.first.apply_damage(5, 0, false, false);
    let table = harness.table.clone();
    harness.first.update_level(3, &table);

    // 2 + 2 + 3 + 10 + 2 bonus
    assert_eq!(harness.first.max_hp(), 19);
    assert_eq!(harness.first.current_hp(), 12);

    harness.first.reset_combat_state();
    assert_eq!(harness.first.current_hp(), 19);
}

// =============================================================================
// Random duels
// =============================================================================

#[test]
fn test_random_duel_runs_to_defeat() {
    let table = LevelTable::default();
    let template = Character::new(CharacterAttributes::new(3, 5, 4, 3));
    let mut a = Fighter::new(&template, &table);
    let mut b = Fighter::new(&template, &table);
    let mut dice = RandomDice::seeded(2024);

    let mut rounds = 0;
    while a.can_fight() && b.can_fight() && rounds < 1_000 {
        let exchange = arena_core::resolve_exchange(
            &a,
            &mut b,
            AttackKind::Normal,
            Reaction::Block,
            &mut dice,
        );
        assert!(exchange.outcome.damage_taken >= 0);
        assert!((0.0..=100.0).contains(&b.hp_percentage()));
        std::mem::swap(&mut a, &mut b);
        rounds += 1;
    }

    assert!(a.is_defeated() || b.is_defeated());
    let loser = if a.is_defeated() { &a } else { &b };
    assert_eq!(loser.current_hp(), 0);
}

#[test]
fn test_percentage_tracks_life() {
    let table = LevelTable::default();
    let mut f = Fighter::new(&Character::new(CharacterAttributes::new(2, 4, 4, 4)), &table);
    let mut dice = RandomDice::seeded(9);

    for _ in 0..20 {
        let attack = f.attack(&mut dice);
        f.lose_life(&attack, Mitigation::None);
        let expected = f.current_hp() as f64 / f.max_hp() as f64;
        assert_eq!(f.character().percentage_life_points(), expected);
        if f.is_defeated() {
            break;
        }
        f.natural_healing();
    }
}
