//! Run a random duel between two builds and print each exchange.
//!
//! `RUST_LOG=arena_core=debug cargo run -p arena-core --example duel`

use arena_core::{
    resolve_exchange, roll_initiative, AttackKind, Character, CharacterAttributes, Fighter,
    LevelTable, RandomDice, Reaction, Side,
};
use tracing_subscriber::EnvFilter;

const MAX_ROUNDS: u32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table = LevelTable::default();
    let mut dice = RandomDice::new();

    let bruiser = Character::new(CharacterAttributes::new(3, 7, 2, 4));
    let duelist = Character::new(CharacterAttributes::new(3, 4, 6, 3));
    let mut fighters = [
        Fighter::new(&bruiser, &table),
        Fighter::new(&duelist, &table),
    ];
    let names = ["Bruiser", "Duelist"];

    println!("=== Duel ===\n");
    for (name, fighter) in names.iter().zip(&fighters) {
        println!("{name}: {}/{} HP", fighter.current_hp(), fighter.max_hp());
    }

    let contest = roll_initiative(&fighters[0], &fighters[1], &mut dice)?;
    println!(
        "\nInitiative {} vs {} ({} re-rolls)",
        contest.first_roll, contest.second_roll, contest.rerolls
    );
    let mut attacker = contest.winner;

    for round in 1..=MAX_ROUNDS {
        let (a, d) = match attacker {
            Side::First => (0, 1),
            Side::Second => (1, 0),
        };
        let kind = if round % 3 == 0 {
            AttackKind::Special
        } else {
            AttackKind::Normal
        };
        let reaction = if round % 2 == 0 {
            Reaction::Block
        } else {
            Reaction::Dodge
        };

        let [first, second] = &mut fighters;
        let (att, def) = if a == 0 { (&*first, second) } else { (&*second, first) };
        let exchange = resolve_exchange(att, def, kind, reaction, &mut dice);

        println!(
            "Round {round}: {} attacks ({kind:?}) {} -> {} answers {reaction:?}, takes {}{}",
            names[a],
            exchange.attack.roll,
            names[d],
            exchange.outcome.damage_taken,
            if exchange.outcome.knockdown { ", knocked down" } else { "" },
        );

        if exchange.outcome.defeated {
            println!("\n{} wins after {round} rounds", names[a]);
            return Ok(());
        }
        fighters[d].clear_knockdown();
        attacker = attacker.other();
    }

    println!("\nNo winner after {MAX_ROUNDS} rounds");
    Ok(())
}
