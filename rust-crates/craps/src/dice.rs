use crate::error::RoundError;
use rand::{
    Rng,
    SeedableRng,
    rngs::{
        StdRng,
        ThreadRng,
    },
};
use std::{
    collections::VecDeque,
    fmt,
};

pub const DIE_FACES: u8 = 6;

/// A pair of six-sided dice as they landed.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Dice {
    die1: u8,
    die2: u8,
}

impl Dice {
    pub fn new(die1: u8, die2: u8) -> Result<Self, RoundError> {
        for face in [die1, die2] {
            if !(1..=DIE_FACES).contains(&face) {
                return Err(RoundError::InvalidDie(face));
            }
        }
        Ok(Self { die1, die2 })
    }

    pub fn die1(&self) -> u8 {
        self.die1
    }

    pub fn die2(&self) -> u8 {
        self.die2
    }

    pub fn total(&self) -> u8 {
        self.die1 + self.die2
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self { die1: 1, die2: 1 }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.die1, self.die2, self.total())
    }
}

pub trait DiceSource {
    /// Throw both dice once.
    fn roll(&mut self) -> Dice;
}

/// Two independent uniform draws over 1..=6 from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R> {
    rng: R,
}

impl RandomDice<ThreadRng> {
    pub fn new() -> Self {
        Self::from_rng(rand::rng())
    }
}

impl Default for RandomDice<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomDice<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    fn face(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_FACES)
    }
}

impl<R: Rng> DiceSource for RandomDice<R> {
    fn roll(&mut self) -> Dice {
        let die1 = self.face();
        let die2 = self.face();
        Dice { die1, die2 }
    }
}

/// Replays a fixed sequence of throws, then repeats the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    queue: VecDeque<Dice>,
    last: Dice,
}

impl ScriptedDice {
    pub fn new(throws: impl IntoIterator<Item = Dice>) -> Self {
        Self {
            queue: throws.into_iter().collect(),
            last: Dice::default(),
        }
    }

    pub fn from_faces(
        faces: impl IntoIterator<Item = (u8, u8)>,
    ) -> Result<Self, RoundError> {
        let throws = faces
            .into_iter()
            .map(|(a, b)| Dice::new(a, b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(throws))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> Dice {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new__rejects_faces_outside_one_to_six() {
        assert_eq!(Dice::new(0, 3), Err(RoundError::InvalidDie(0)));
        assert_eq!(Dice::new(4, 7), Err(RoundError::InvalidDie(7)));
        assert!(Dice::new(6, 6).is_ok());
    }

    #[test]
    fn scripted_dice__replays_in_order_then_repeats_last() {
        // given
        let mut dice = ScriptedDice::from_faces([(3, 4), (2, 2)]).unwrap();

        // when
        let first = dice.roll();
        let second = dice.roll();
        let third = dice.roll();

        // then
        assert_eq!(first.total(), 7);
        assert_eq!(second.total(), 4);
        assert_eq!(third, second);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn seeded__same_seed_gives_same_throws() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        let left: Vec<_> = (0..20).map(|_| a.roll()).collect();
        let right: Vec<_> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(left, right);
    }

    proptest! {
        #[test]
        fn random_dice__faces_stay_in_range(seed in any::<u64>()) {
            let mut dice = RandomDice::seeded(seed);
            for _ in 0..50 {
                let throw = dice.roll();
                prop_assert!((1..=6).contains(&throw.die1()));
                prop_assert!((1..=6).contains(&throw.die2()));
                prop_assert!((2..=12).contains(&throw.total()));
            }
        }
    }
}
