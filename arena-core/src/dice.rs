//! Six-sided dice.
//!
//! Every roll in the engine goes through a [`DiceSource`], so callers decide
//! where randomness comes from: a seeded generator for replays, entropy for
//! live play, or scripted faces in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of faces on the only die the rules use.
pub const D6_SIDES: u32 = 6;

/// Something that can produce uniform d6 faces.
pub trait DiceSource {
    /// Roll one die, returning a face in `1..=6`.
    fn roll_d6(&mut self) -> u32;
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll_d6(&mut self) -> u32 {
        (**self).roll_d6()
    }
}

/// Dice backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R = StdRng> {
    rng: R,
}

impl RandomDice<StdRng> {
    /// Entropy-seeded dice for live play.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible dice (useful for replays and statistical tests).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomDice<R> {
    /// Wrap an existing generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Give the generator back.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> DiceSource for RandomDice<R> {
    fn roll_d6(&mut self) -> u32 {
        self.rng.gen_range(1..=D6_SIDES)
    }
}

/// Roll a single d6.
pub fn roll_die<D: DiceSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_d6()
}

/// Roll `count` d6 and keep every face, in roll order.
pub fn roll_multiple<D: DiceSource + ?Sized>(dice: &mut D, count: u32) -> Vec<u32> {
    (0..count).map(|_| dice.roll_d6()).collect()
}

/// Sum of `count` independent d6. Zero dice sum to zero.
pub fn roll_sum<D: DiceSource + ?Sized>(dice: &mut D, count: u32) -> u32 {
    (0..count).map(|_| dice.roll_d6()).sum()
}
